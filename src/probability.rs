//! Probability Estimator — mine likelihood for unproven cells.
//!
//! Combines the ratios of every constraint touching a cell by taking the
//! maximum (pessimistic: never average, so risk is not under-estimated),
//! then applies adjacency, isolation and geometric adjustments. Cells
//! already proven by the solver come out as hard 0.0 / 1.0.

use crate::model::BoardModel;
use crate::solver::Certainties;
use crate::types::{decode_key, manhattan};
use serde::Serialize;
use std::collections::HashMap;

/// Conservative prior for a frontier-adjacent cell with no usable
/// constraint ratio.
pub const BASE_PROBABILITY: f64 = 0.15;
/// Prior for cells no constraint touches.
pub const ISOLATED_PROBABILITY: f64 = 0.08;
/// Per-step decay applied beyond Manhattan distance 3 from the nearest
/// revealed number.
const ISOLATION_DECAY: f64 = 0.85;
const MIN_PROBABILITY: f64 = 0.01;
const MAX_PROBABILITY: f64 = 0.99;
/// Multiplier keyed by the highest revealed numeric neighbor (1..=8).
/// A neighboring 0 forces the probability to exactly 0 instead.
const ADJACENCY_FACTOR: [f64; 8] = [1.00, 1.08, 1.16, 1.28, 1.42, 1.58, 1.76, 1.96];

/// Risk record for one hidden cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellEstimate {
    pub probability: f64,
    /// True when the value comes from the solver's certainty sets.
    pub certain: bool,
    pub provenance: String,
}

/// Estimate the mine probability of every hidden, unflagged cell.
pub fn estimate(model: &BoardModel, cert: &Certainties) -> HashMap<u32, CellEstimate> {
    let mut map = HashMap::new();
    if model.is_degenerate() {
        return map;
    }

    // Revealed numbered cells, for isolation distances.
    let mut numbers: Vec<(usize, usize)> = Vec::new();
    for row in 0..model.rows {
        for col in 0..model.cols {
            if model.revealed.is_number(row, col) {
                numbers.push((row, col));
            }
        }
    }

    for &key in &model.hidden {
        let (row, col) = decode_key(key);

        if let Some(why) = cert.mine.get(&key) {
            map.insert(
                key,
                CellEstimate {
                    probability: 1.0,
                    certain: true,
                    provenance: format!("proven mine: {why}"),
                },
            );
            continue;
        }
        if let Some(why) = cert.safe.get(&key) {
            map.insert(
                key,
                CellEstimate {
                    probability: 0.0,
                    certain: true,
                    provenance: format!("proven safe: {why}"),
                },
            );
            continue;
        }

        // A revealed 0 next door overrides every other signal.
        if model.adjacent_to_zero(row, col) {
            map.insert(
                key,
                CellEstimate {
                    probability: 0.0,
                    certain: false,
                    provenance: "adjacent to a revealed 0".to_string(),
                },
            );
            continue;
        }

        let mut provenance;
        let mut p;

        let touching = model.touching.get(&key);
        let mut best_ratio: Option<(f64, (usize, usize))> = None;
        if let Some(indices) = touching {
            for &idx in indices {
                let c = &model.constraints[idx];
                if c.unresolved.is_empty() || !c.is_feasible() {
                    continue;
                }
                let ratio = c.missing as f64 / c.unresolved.len() as f64;
                if best_ratio.map_or(true, |(r, _)| ratio > r) {
                    best_ratio = Some((ratio, c.origin));
                }
            }
        }

        if let Some((ratio, origin)) = best_ratio {
            p = ratio;
            provenance = format!(
                "{:.0}% from ({},{})",
                ratio * 100.0,
                origin.0,
                origin.1
            );

            // Adjacency adjustment: pushier next to big numbers.
            if let Some(v) = model.max_revealed_neighbor(row, col) {
                if (1..=8).contains(&v) {
                    p *= ADJACENCY_FACTOR[(v - 1) as usize];
                    if v >= 4 {
                        provenance.push_str(&format!(", beside a {v}"));
                    }
                }
            }
        } else {
            // No usable constraint: isolation prior, decaying with distance
            // from the nearest revealed number.
            let dist = numbers
                .iter()
                .map(|&n| manhattan((row, col), n))
                .min()
                .unwrap_or(usize::MAX);
            if dist == usize::MAX {
                p = ISOLATED_PROBABILITY;
                provenance = "no information".to_string();
            } else if dist > 3 {
                p = ISOLATED_PROBABILITY * ISOLATION_DECAY.powi((dist - 3) as i32);
                provenance = format!("isolated, {dist} from the frontier");
            } else if model.is_frontier(row, col) {
                // Frontier cell whose constraints were all infeasible.
                p = BASE_PROBABILITY;
                provenance = "frontier prior".to_string();
            } else {
                p = ISOLATED_PROBABILITY;
                provenance = "near the frontier".to_string();
            }
        }

        // Geometric prior: corners and edges historically carry fewer
        // mines than the interior.
        p *= match model.neighbors.get(row, col).len() {
            3 => 0.90,
            5 => 0.95,
            8 => 1.05,
            _ => 1.0,
        };

        p = p.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
        map.insert(
            key,
            CellEstimate {
                probability: p,
                certain: false,
                provenance,
            },
        );
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::deduce;
    use crate::types::{cell_key, RevealedCell, TurnInput};

    fn revealed(row: usize, col: usize, content: &str) -> RevealedCell {
        RevealedCell {
            row,
            col,
            content: content.to_string(),
        }
    }

    fn model_of(rows: usize, cols: usize, cells: Vec<RevealedCell>) -> BoardModel {
        BoardModel::build(&TurnInput {
            rows,
            cols,
            revealed: cells,
            flagged: vec![],
            history: vec![],
        })
    }

    #[test]
    fn test_zero_neighbors_probability_exactly_zero() {
        let model = model_of(9, 9, vec![revealed(4, 4, "0")]);
        let cert = deduce(&model);
        let probs = estimate(&model, &cert);
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let key = cell_key((4 + dr) as usize, (4 + dc) as usize);
                let est = probs.get(&key).unwrap();
                assert_eq!(est.probability, 0.0);
                assert!(est.certain);
            }
        }
    }

    #[test]
    fn test_zero_adjacency_without_solver_run() {
        // Even with no certainties supplied, the zero override holds.
        let model = model_of(9, 9, vec![revealed(4, 4, "0")]);
        let probs = estimate(&model, &Certainties::default());
        let est = probs.get(&cell_key(3, 3)).unwrap();
        assert_eq!(est.probability, 0.0);
        assert!(!est.certain);
    }

    #[test]
    fn test_certain_mine_probability_one() {
        let model = model_of(9, 9, vec![revealed(0, 0, "2"), revealed(0, 1, "2")]);
        let cert = deduce(&model);
        let probs = estimate(&model, &cert);
        assert_eq!(probs.get(&cell_key(1, 0)).unwrap().probability, 1.0);
        assert!(probs.get(&cell_key(1, 0)).unwrap().certain);
    }

    #[test]
    fn test_monotone_in_missing_count() {
        // Same unresolved set, higher missing count: probability must not
        // decrease for any member cell.
        let low = model_of(9, 9, vec![revealed(4, 4, "1")]);
        let high = model_of(9, 9, vec![revealed(4, 4, "3")]);
        let p_low = estimate(&low, &Certainties::default());
        let p_high = estimate(&high, &Certainties::default());
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let key = cell_key((4 + dr) as usize, (4 + dc) as usize);
                assert!(
                    p_high.get(&key).unwrap().probability
                        >= p_low.get(&key).unwrap().probability
                );
            }
        }
    }

    #[test]
    fn test_max_over_touching_constraints() {
        // (4,4)="1" and (4,6)="3" both touch (4,5): the pessimistic 3/8
        // wins over 1/8.
        let model = model_of(9, 9, vec![revealed(4, 4, "1"), revealed(4, 6, "3")]);
        let probs = estimate(&model, &Certainties::default());
        let shared = probs.get(&cell_key(4, 5)).unwrap();
        let lonely = probs.get(&cell_key(4, 3)).unwrap();
        assert!(shared.probability > lonely.probability);
    }

    #[test]
    fn test_isolation_decays_with_distance() {
        let model = model_of(9, 9, vec![revealed(0, 0, "1")]);
        let probs = estimate(&model, &Certainties::default());
        // (8,8) is far from the only number; (2,2) is just outside it.
        let far = probs.get(&cell_key(8, 8)).unwrap().probability;
        let near = probs.get(&cell_key(2, 2)).unwrap().probability;
        assert!(far < near);
        assert!(far >= MIN_PROBABILITY);
    }

    #[test]
    fn test_frontier_beats_isolated() {
        let model = model_of(9, 9, vec![revealed(4, 4, "2")]);
        let probs = estimate(&model, &Certainties::default());
        let frontier = probs.get(&cell_key(3, 3)).unwrap().probability;
        let isolated = probs.get(&cell_key(8, 8)).unwrap().probability;
        assert!(frontier > isolated);
    }

    #[test]
    fn test_probabilities_clamped() {
        let model = model_of(
            9,
            9,
            vec![revealed(4, 4, "8")], // 8/8 ratio, then multiplied up
        );
        let probs = estimate(&model, &Certainties::default());
        for est in probs.values() {
            assert!(est.probability >= 0.0 && est.probability <= 1.0);
            if !est.certain && est.probability > 0.0 {
                assert!(est.probability >= MIN_PROBABILITY);
                assert!(est.probability <= MAX_PROBABILITY);
            }
        }
    }

    #[test]
    fn test_every_hidden_cell_estimated() {
        let model = model_of(9, 9, vec![revealed(4, 4, "2")]);
        let probs = estimate(&model, &Certainties::default());
        assert_eq!(probs.len(), model.hidden.len());
    }
}
