//! Move Selector — one ranked decision per turn.
//!
//! The decision policy is an ordered chain of strategies, each returning
//! an optional choice; the first one that produces a cell wins. Solver
//! certainties come first, then the memory's decisive second-move
//! recommendation, then probability layers blended with memory risk, and
//! finally a uniform-random last resort so the engine always answers
//! while hidden cells remain.

use crate::memory::MineMemory;
use crate::model::BoardModel;
use crate::probability::CellEstimate;
use crate::rng::EngineRng;
use crate::solver::Certainties;
use crate::types::{decode_key, manhattan, PlayerAction};
use serde::Serialize;
use std::collections::HashMap;

/// Probability below which a cell is taken immediately.
const LOW_PROBABILITY_THRESHOLD: f64 = 0.05;
/// Revealed fraction below which the game counts as the opening.
const OPENING_FRACTION: f64 = 0.15;
/// Revealed fraction below which the game counts as the midgame.
const MIDGAME_FRACTION: f64 = 0.50;
/// Opening diversification only considers cells below this blended score.
const OPENING_SCORE_CUTOFF: f64 = 0.25;
/// Weight of the memory risk factor in the blended score.
const MEMORY_WEIGHT: f64 = 0.3;
/// Revealed neighbor value considered "high" by the final fallback.
const HIGH_NUMBER: i8 = 4;

/// Why the selector picked its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionClass {
    CertainSafe,
    MemoryInformed,
    LowProbability,
    StagedHeuristic,
    Fallback,
}

/// The chosen next reveal.
#[derive(Debug, Clone, Serialize)]
pub struct RevealChoice {
    pub row: usize,
    pub col: usize,
    pub rationale: String,
    pub class: DecisionClass,
}

/// A newly deduced flag for the host to apply.
#[derive(Debug, Clone, Serialize)]
pub struct FlagAction {
    pub row: usize,
    pub col: usize,
    pub rationale: String,
}

/// Everything the strategies read.
struct SelectionCtx<'a> {
    model: &'a BoardModel,
    cert: &'a Certainties,
    probs: &'a HashMap<u32, CellEstimate>,
    /// probability + weighted memory risk, per hidden cell.
    scores: HashMap<u32, f64>,
    memory: Option<&'a MineMemory>,
    history: &'a [PlayerAction],
    last_move: Option<(usize, usize)>,
    prior_moves: Vec<(usize, usize)>,
}

/// Emit flag actions for every newly deduced mine, before the reveal is
/// chosen. Sorted for a stable emission order.
pub fn flag_actions(cert: &Certainties) -> Vec<FlagAction> {
    let mut keys: Vec<u32> = cert.mine.keys().copied().collect();
    keys.sort_unstable();
    keys.into_iter()
        .map(|key| {
            let (row, col) = decode_key(key);
            FlagAction {
                row,
                col,
                rationale: cert.mine.get(&key).cloned().unwrap_or_default(),
            }
        })
        .collect()
}

/// Pick the next cell to reveal, or `None` when no hidden cell remains.
pub fn select_move(
    model: &BoardModel,
    cert: &Certainties,
    probs: &HashMap<u32, CellEstimate>,
    memory: Option<&MineMemory>,
    history: &[PlayerAction],
    rng: &mut EngineRng,
) -> Option<RevealChoice> {
    if model.hidden.is_empty() {
        return None;
    }

    let size = (model.rows, model.cols);
    let mut scores = HashMap::with_capacity(model.hidden.len());
    for &key in &model.hidden {
        let p = probs.get(&key).map(|e| e.probability).unwrap_or(0.5);
        let risk = match memory {
            Some(mem) => mem.evaluate_cell(decode_key(key), size, history).risk,
            None => 0.0,
        };
        scores.insert(key, p + MEMORY_WEIGHT * risk);
    }

    let prior_moves: Vec<(usize, usize)> = history
        .iter()
        .filter(|a| a.is_reveal())
        .map(|a| a.cell())
        .collect();
    let ctx = SelectionCtx {
        model,
        cert,
        probs,
        scores,
        memory,
        history,
        last_move: prior_moves.last().copied(),
        prior_moves,
    };

    let strategies: [fn(&SelectionCtx, &mut EngineRng) -> Option<RevealChoice>; 4] = [
        certain_safe,
        memory_second_move,
        low_probability,
        staged_heuristic,
    ];
    for strategy in strategies {
        if let Some(choice) = strategy(&ctx, rng) {
            return Some(choice);
        }
    }

    Some(last_resort(&ctx, rng))
}

/// Distance to the previous move, for spatially coherent exploration.
fn nearness(ctx: &SelectionCtx, key: u32) -> usize {
    match ctx.last_move {
        Some(last) => manhattan(decode_key(key), last),
        None => 0,
    }
}

// ─── Layer 1: certain-safe cells ────────────────────────────────────────────

fn certain_safe(ctx: &SelectionCtx, _rng: &mut EngineRng) -> Option<RevealChoice> {
    let candidates: Vec<u32> = ctx
        .model
        .hidden
        .iter()
        .copied()
        .filter(|k| ctx.cert.safe.contains_key(k))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    // Prefer cells beside a revealed 0: revealing them keeps opening the
    // board up.
    let beside_zero: Vec<u32> = candidates
        .iter()
        .copied()
        .filter(|&k| {
            let (row, col) = decode_key(k);
            ctx.model.adjacent_to_zero(row, col)
        })
        .collect();
    let pool = if beside_zero.is_empty() {
        &candidates
    } else {
        &beside_zero
    };

    let key = pool
        .iter()
        .copied()
        .min_by_key(|&k| (nearness(ctx, k), k))?;
    let (row, col) = decode_key(key);
    Some(RevealChoice {
        row,
        col,
        rationale: format!(
            "certain safe: {}",
            ctx.cert.safe.get(&key).cloned().unwrap_or_default()
        ),
        class: DecisionClass::CertainSafe,
    })
}

// ─── Layer 2: decisive second move from memory ──────────────────────────────

fn memory_second_move(ctx: &SelectionCtx, _rng: &mut EngineRng) -> Option<RevealChoice> {
    let memory = ctx.memory?;
    let mut reveals = ctx.history.iter().filter(|a| a.is_reveal());
    let first = reveals.next()?.cell();
    if reveals.next().is_some() {
        return None; // only the game's second reveal
    }

    let size = (ctx.model.rows, ctx.model.cols);
    let (row, col) = memory.recommend_second_move(first, size)?;
    let key = crate::types::cell_key(row, col);
    if !ctx.model.hidden.contains(&key) || ctx.cert.mine.contains_key(&key) {
        return None;
    }

    Some(RevealChoice {
        row,
        col,
        rationale: "historically strong follow-up to this opening".to_string(),
        class: DecisionClass::MemoryInformed,
    })
}

// ─── Layer 3: very low probability ──────────────────────────────────────────

fn low_probability(ctx: &SelectionCtx, rng: &mut EngineRng) -> Option<RevealChoice> {
    let mut best: Option<f64> = None;
    for (&key, &score) in &ctx.scores {
        if ctx.cert.mine.contains_key(&key) {
            continue;
        }
        if score < LOW_PROBABILITY_THRESHOLD && best.map_or(true, |b| score < b) {
            best = Some(score);
        }
    }
    let best = best?;

    let mut tied: Vec<u32> = ctx
        .scores
        .iter()
        .filter(|&(k, &s)| (s - best).abs() < 1e-9 && !ctx.cert.mine.contains_key(k))
        .map(|(&k, _)| k)
        .collect();
    tied.sort_unstable();

    let key = if ctx.last_move.is_some() {
        tied.iter().copied().min_by_key(|&k| (nearness(ctx, k), k))?
    } else {
        *rng.choose(&tied)?
    };

    let (row, col) = decode_key(key);
    let p = ctx.probs.get(&key).map(|e| e.probability).unwrap_or(0.0);
    Some(RevealChoice {
        row,
        col,
        rationale: format!("low risk ({:.0}%)", p * 100.0),
        class: DecisionClass::LowProbability,
    })
}

// ─── Layer 4: game-stage heuristics ─────────────────────────────────────────

fn staged_heuristic(ctx: &SelectionCtx, rng: &mut EngineRng) -> Option<RevealChoice> {
    let fraction = ctx.model.revealed_fraction();

    let candidates: Vec<u32> = ctx
        .model
        .hidden
        .iter()
        .copied()
        .filter(|k| !ctx.cert.mine.contains_key(k))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    if fraction < OPENING_FRACTION {
        // Opening: diversify — go far from everything tried so far, but
        // only among cells that do not look risky.
        let pool: Vec<u32> = candidates
            .iter()
            .copied()
            .filter(|k| ctx.scores.get(k).copied().unwrap_or(1.0) < OPENING_SCORE_CUTOFF)
            .collect();
        if pool.is_empty() {
            return None; // fall through to the last resort
        }
        let key = if ctx.prior_moves.is_empty() {
            *rng.choose(&pool)?
        } else {
            pool.iter().copied().max_by_key(|&k| {
                let cell = decode_key(k);
                let spread = ctx
                    .prior_moves
                    .iter()
                    .map(|&m| manhattan(cell, m))
                    .min()
                    .unwrap_or(0);
                (spread, std::cmp::Reverse(k))
            })?
        };
        let (row, col) = decode_key(key);
        return Some(RevealChoice {
            row,
            col,
            rationale: "opening: diversifying away from earlier moves".to_string(),
            class: DecisionClass::StagedHeuristic,
        });
    }

    if fraction < MIDGAME_FRACTION {
        // Midgame: lowest-risk frontier cell, non-frontier as a fallback.
        let frontier: Vec<u32> = candidates
            .iter()
            .copied()
            .filter(|&k| {
                let (row, col) = decode_key(k);
                ctx.model.is_frontier(row, col)
            })
            .collect();
        let pool = if frontier.is_empty() { &candidates } else { &frontier };
        let key = lowest_score(ctx, pool)?;
        let (row, col) = decode_key(key);
        return Some(RevealChoice {
            row,
            col,
            rationale: "midgame: lowest-risk frontier cell".to_string(),
            class: DecisionClass::StagedHeuristic,
        });
    }

    // Endgame: the single globally lowest-risk cell.
    let key = lowest_score(ctx, &candidates)?;
    let (row, col) = decode_key(key);
    Some(RevealChoice {
        row,
        col,
        rationale: "endgame: globally lowest risk".to_string(),
        class: DecisionClass::StagedHeuristic,
    })
}

fn lowest_score(ctx: &SelectionCtx, pool: &[u32]) -> Option<u32> {
    pool.iter().copied().min_by(|&a, &b| {
        let sa = ctx.scores.get(&a).copied().unwrap_or(1.0);
        let sb = ctx.scores.get(&b).copied().unwrap_or(1.0);
        sa.partial_cmp(&sb)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    })
}

// ─── Last resort ────────────────────────────────────────────────────────────

/// Always produces a cell while any hidden cell exists: lowest blended
/// score, avoiding neighbors of high numbers, or a uniform-random pick
/// when nothing can be ranked.
fn last_resort(ctx: &SelectionCtx, rng: &mut EngineRng) -> RevealChoice {
    let candidates: Vec<u32> = ctx
        .model
        .hidden
        .iter()
        .copied()
        .filter(|k| !ctx.cert.mine.contains_key(k))
        .collect();
    let candidates = if candidates.is_empty() {
        ctx.model.hidden.clone()
    } else {
        candidates
    };

    let calm: Vec<u32> = candidates
        .iter()
        .copied()
        .filter(|&k| {
            let (row, col) = decode_key(k);
            ctx.model
                .max_revealed_neighbor(row, col)
                .map_or(true, |v| (v as i8) < HIGH_NUMBER)
        })
        .collect();
    let pool = if calm.is_empty() { &candidates } else { &calm };

    match lowest_score(ctx, pool) {
        Some(key) => {
            let (row, col) = decode_key(key);
            RevealChoice {
                row,
                col,
                rationale: "fallback: lowest remaining risk".to_string(),
                class: DecisionClass::Fallback,
            }
        }
        None => {
            // Unreachable with a non-empty pool, but never panic here.
            let key = *rng.choose(pool).unwrap_or(&ctx.model.hidden[0]);
            let (row, col) = decode_key(key);
            RevealChoice {
                row,
                col,
                rationale: "fallback: uniform random".to_string(),
                class: DecisionClass::Fallback,
            }
        }
    }
}
