//! Shape-pattern recognition — deduction pass 4.
//!
//! Fixed local patterns read straight off the revealed grid, each with a
//! named provenance. The patterns overlap with what the counting and
//! pairwise passes derive; running them anyway catches boards where the
//! fixed-point loop hit its iteration cap, and gives the classified cells
//! pattern-specific provenance when they fire first.

use crate::model::{BoardModel, Constraint};
use crate::solver::{mark_mine, mark_safe, Certainties};
use crate::types::cell_key;
use std::collections::HashMap;

/// Run all shape patterns once. Returns true if anything new was
/// classified.
pub fn apply(model: &BoardModel, work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;

    // Zero-adjacency runs first: a cell next to a revealed 0 is safe no
    // matter what any other rule says about it.
    progress |= zero_adjacency(model, work, cert);
    progress |= sandwich_runs(model, work, cert);
    progress |= exhausted_border_cells(model, work, cert);
    progress |= one_one_pairs(work, cert);

    progress
}

/// Every hidden, unflagged neighbor of a revealed 0 is safe.
fn zero_adjacency(model: &BoardModel, work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;

    for row in 0..model.rows {
        for col in 0..model.cols {
            if model.revealed.get(row, col) != 0 {
                continue;
            }
            for &(nr, nc) in model.neighbors.get(row, col) {
                if model.revealed.get(nr, nc) == crate::types::HIDDEN && !model.flags.get(nr, nc) {
                    let why = format!("adjacent to the revealed 0 at ({row},{col})");
                    if mark_safe(work, cert, cell_key(nr, nc), why) {
                        progress = true;
                    }
                }
            }
        }
    }

    progress
}

/// Map from origin cell to its index in the working constraint list.
fn origin_index(work: &[Constraint]) -> HashMap<u32, usize> {
    work.iter()
        .enumerate()
        .map(|(i, c)| (cell_key(c.origin.0, c.origin.1), i))
        .collect()
}

/// N,(N+1),N runs along a row or column with the outer values symmetric
/// around the center. Cells watched only by the center are forced mines
/// when their count matches the center's missing count; cells watched
/// only by an outer number are safe.
fn sandwich_runs(model: &BoardModel, work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;
    let by_origin = origin_index(work);

    let mut runs: Vec<[(usize, usize); 3]> = Vec::new();
    for row in 0..model.rows {
        for col in 0..model.cols {
            if col + 2 < model.cols {
                runs.push([(row, col), (row, col + 1), (row, col + 2)]);
            }
            if row + 2 < model.rows {
                runs.push([(row, col), (row + 1, col), (row + 2, col)]);
            }
        }
    }

    for [a, center, b] in runs {
        let va = model.revealed.get(a.0, a.1);
        let vc = model.revealed.get(center.0, center.1);
        let vb = model.revealed.get(b.0, b.1);
        if !(0..=8).contains(&va) || !(0..=8).contains(&vc) || !(0..=8).contains(&vb) {
            continue;
        }
        if va != vb || vc != va + 1 {
            continue;
        }

        let (Some(&ia), Some(&ic), Some(&ib)) = (
            by_origin.get(&cell_key(a.0, a.1)),
            by_origin.get(&cell_key(center.0, center.1)),
            by_origin.get(&cell_key(b.0, b.1)),
        ) else {
            continue;
        };
        if !work[ic].is_feasible() || !work[ia].is_feasible() || !work[ib].is_feasible() {
            continue;
        }

        let center_only: Vec<u32> = work[ic]
            .unresolved
            .iter()
            .copied()
            .filter(|&k| !work[ia].contains(k) && !work[ib].contains(k))
            .collect();
        let outer_only: Vec<u32> = work[ia]
            .unresolved
            .iter()
            .chain(work[ib].unresolved.iter())
            .copied()
            .filter(|&k| !work[ic].contains(k))
            .collect();

        let mut pending: Vec<(u32, bool)> = Vec::new();
        if !center_only.is_empty() && center_only.len() as i32 == work[ic].missing {
            for &key in &center_only {
                pending.push((key, true));
            }
        }
        for &key in &outer_only {
            pending.push((key, false));
        }

        for (key, is_mine) in pending {
            let why = format!(
                "{}-{}-{} run centered at ({},{})",
                va, vc, vb, center.0, center.1
            );
            let applied = if is_mine {
                mark_mine(work, cert, key, why)
            } else {
                mark_safe(work, cert, key, why)
            };
            if applied {
                progress = true;
            }
        }
    }

    progress
}

/// Corner cells (3 neighbors) and edge cells (5 neighbors) whose missing
/// count equals their unresolved count: all remaining neighbors are mines.
fn exhausted_border_cells(
    model: &BoardModel,
    work: &mut Vec<Constraint>,
    cert: &mut Certainties,
) -> bool {
    let mut progress = false;

    for idx in 0..work.len() {
        let c = &work[idx];
        if c.unresolved.is_empty() || !c.is_feasible() || c.missing <= 0 {
            continue;
        }
        let neighbor_count = model.neighbors.get(c.origin.0, c.origin.1).len();
        let kind = match neighbor_count {
            3 => "corner",
            5 => "edge",
            _ => continue,
        };
        if c.missing as usize != c.unresolved.len() {
            continue;
        }

        let (orow, ocol) = c.origin;
        let value = c.value;
        let cells = c.unresolved.clone();
        for key in cells {
            let why = format!("{kind} cell ({orow},{ocol})={value} is exhausted");
            if mark_mine(work, cert, key, why) {
                progress = true;
            }
        }
    }

    progress
}

/// Two adjacent revealed 1s where one is already satisfied: the other's
/// mine is forced into its single exclusive unresolved neighbor.
fn one_one_pairs(work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;
    let by_origin = origin_index(work);

    for ai in 0..work.len() {
        if work[ai].value != 1 || work[ai].missing != 0 {
            continue;
        }
        let (orow, ocol) = work[ai].origin;

        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let nr = orow as i32 + dr;
                let nc = ocol as i32 + dc;
                if nr < 0 || nc < 0 {
                    continue;
                }
                let Some(&bi) = by_origin.get(&cell_key(nr as usize, nc as usize)) else {
                    continue;
                };
                if bi == ai || work[bi].value != 1 || work[bi].missing != 1 {
                    continue;
                }

                let exclusive: Vec<u32> = work[bi]
                    .unresolved
                    .iter()
                    .copied()
                    .filter(|&k| !work[ai].contains(k))
                    .collect();
                if exclusive.len() != 1 {
                    continue;
                }

                let key = exclusive[0];
                let why = format!(
                    "1-1 pair: ({},{}) satisfied, ({},{}) forces its exclusive neighbor",
                    orow, ocol, nr, nc
                );
                if mark_mine(work, cert, key, why) {
                    progress = true;
                }
            }
        }
    }

    progress
}
