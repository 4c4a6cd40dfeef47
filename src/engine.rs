//! One-turn orchestration: build the model, deduce, estimate, blend
//! memory, select. Single-threaded, no suspension points, one decision
//! per call. Nothing in here may fail outward: corrupt input degrades to
//! a detectable inert answer, never a panic.

use crate::memory::MineMemory;
use crate::model::BoardModel;
use crate::probability;
use crate::rng::EngineRng;
use crate::selector::{self, FlagAction, RevealChoice};
use crate::solver;
use crate::types::{cell_key, FlaggedCell, TurnInput};
use serde::Serialize;

/// The full answer for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnDecision {
    /// Complete flag list: the host's flags plus every newly deduced one.
    pub flags: Vec<FlaggedCell>,
    /// Next cell to reveal. `None` when no hidden cell remains, or when
    /// the input was too malformed to name a cell at all.
    pub reveal: Option<RevealChoice>,
    /// Newly deduced flag placements, emitted before the reveal.
    pub flag_actions: Vec<FlagAction>,
}

/// Analyze one turn with entropy-seeded tie-breaking.
pub fn analyze_turn(input: &TurnInput, memory: Option<&MineMemory>) -> TurnDecision {
    analyze_turn_with_rng(input, memory, &mut EngineRng::new())
}

/// Analyze one turn. Pass a seeded RNG for reproducible decisions.
pub fn analyze_turn_with_rng(
    input: &TurnInput,
    memory: Option<&MineMemory>,
    rng: &mut EngineRng,
) -> TurnDecision {
    let model = BoardModel::build(input);

    if model.is_degenerate() {
        // Inert answer: echo nothing the caller could mistake for a move.
        return TurnDecision {
            flags: Vec::new(),
            reveal: None,
            flag_actions: Vec::new(),
        };
    }

    let cert = solver::deduce(&model);
    let probs = probability::estimate(&model, &cert);
    let flag_actions = selector::flag_actions(&cert);
    let reveal = selector::select_move(&model, &cert, &probs, memory, &input.history, rng);

    // Host flags (deduplicated, in-bounds) plus the new deductions.
    let mut flags: Vec<FlaggedCell> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for row in 0..model.rows {
        for col in 0..model.cols {
            if model.flags.get(row, col) && seen.insert(cell_key(row, col)) {
                flags.push(FlaggedCell { row, col });
            }
        }
    }
    for action in &flag_actions {
        if seen.insert(cell_key(action.row, action.col)) {
            flags.push(FlaggedCell {
                row: action.row,
                col: action.col,
            });
        }
    }

    TurnDecision {
        flags,
        reveal,
        flag_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::DecisionClass;
    use crate::types::{PlayerAction, RevealedCell};

    fn revealed(row: usize, col: usize, content: &str) -> RevealedCell {
        RevealedCell {
            row,
            col,
            content: content.to_string(),
        }
    }

    fn run(input: &TurnInput) -> TurnDecision {
        analyze_turn_with_rng(input, None, &mut EngineRng::from_seed(1))
    }

    #[test]
    fn test_zero_opening_reveals_certain_safe_neighbor() {
        let input = TurnInput {
            rows: 9,
            cols: 9,
            revealed: vec![revealed(4, 4, "0")],
            flagged: vec![],
            history: vec![],
        };
        let decision = run(&input);
        let reveal = decision.reveal.unwrap();
        assert_eq!(reveal.class, DecisionClass::CertainSafe);
        assert!(decision.flag_actions.is_empty());
    }

    #[test]
    fn test_saturated_two_emits_flags_before_reveal() {
        let input = TurnInput {
            rows: 9,
            cols: 9,
            revealed: vec![revealed(0, 0, "2"), revealed(0, 1, "2")],
            flagged: vec![],
            history: vec![],
        };
        let decision = run(&input);
        assert_eq!(decision.flag_actions.len(), 2);
        let flagged: Vec<(usize, usize)> = decision
            .flag_actions
            .iter()
            .map(|a| (a.row, a.col))
            .collect();
        assert!(flagged.contains(&(1, 0)));
        assert!(flagged.contains(&(1, 1)));
        // The combined flag list carries the deduced flags too.
        assert!(decision
            .flags
            .iter()
            .any(|f| (f.row, f.col) == (1, 0)));
        // And the reveal is one of the proven-safe cells, never a mine.
        let reveal = decision.reveal.unwrap();
        assert!(!flagged.contains(&(reveal.row, reveal.col)));
        assert_eq!(reveal.class, DecisionClass::CertainSafe);
    }

    #[test]
    fn test_degenerate_input_yields_inert_decision() {
        let decision = run(&TurnInput::default());
        assert!(decision.reveal.is_none());
        assert!(decision.flags.is_empty());
        assert!(decision.flag_actions.is_empty());
    }

    #[test]
    fn test_fully_revealed_board_yields_no_move() {
        let input = TurnInput {
            rows: 1,
            cols: 2,
            revealed: vec![revealed(0, 0, "0"), revealed(0, 1, "0")],
            flagged: vec![],
            history: vec![],
        };
        let decision = run(&input);
        assert!(decision.reveal.is_none());
    }

    #[test]
    fn test_corrupt_lists_still_produce_a_move() {
        // Valid size, garbage everywhere else: the engine must still name
        // some legal hidden cell.
        let input = TurnInput {
            rows: 5,
            cols: 5,
            revealed: vec![
                revealed(99, 99, "7"),
                revealed(1, 1, "not a number"),
                revealed(2, 2, "55"),
            ],
            flagged: vec![crate::types::FlaggedCell { row: 88, col: 0 }],
            history: vec![],
        };
        let decision = run(&input);
        let reveal = decision.reveal.unwrap();
        assert!(reveal.row < 5 && reveal.col < 5);
    }

    #[test]
    fn test_host_flags_are_preserved() {
        let input = TurnInput {
            rows: 9,
            cols: 9,
            revealed: vec![revealed(4, 4, "1")],
            flagged: vec![crate::types::FlaggedCell { row: 8, col: 8 }],
            history: vec![],
        };
        let decision = run(&input);
        assert!(decision
            .flags
            .iter()
            .any(|f| (f.row, f.col) == (8, 8)));
    }

    #[test]
    fn test_memory_informed_second_move_end_to_end() {
        let mut mem = MineMemory::default();
        let win = vec![
            PlayerAction::Reveal {
                row: 0,
                col: 0,
                result: "1".to_string(),
            },
            PlayerAction::Reveal {
                row: 4,
                col: 4,
                result: "2".to_string(),
            },
        ];
        mem.record_win(&win, (9, 9));
        mem.record_win(&win, (9, 9));

        let input = TurnInput {
            rows: 9,
            cols: 9,
            revealed: vec![revealed(0, 0, "1")],
            flagged: vec![],
            history: vec![PlayerAction::Reveal {
                row: 0,
                col: 0,
                result: "1".to_string(),
            }],
        };
        let decision =
            analyze_turn_with_rng(&input, Some(&mem), &mut EngineRng::from_seed(1));
        let reveal = decision.reveal.unwrap();
        assert_eq!(reveal.class, DecisionClass::MemoryInformed);
    }

    #[test]
    fn test_reveal_carries_rationale() {
        let input = TurnInput {
            rows: 9,
            cols: 9,
            revealed: vec![revealed(4, 4, "0")],
            flagged: vec![],
            history: vec![],
        };
        let decision = run(&input);
        assert!(!decision.reveal.unwrap().rationale.is_empty());
    }
}
