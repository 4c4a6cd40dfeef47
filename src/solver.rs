//! Deduction Solver — all certainty-extraction passes.
//!
//! Contains:
//! - Pass 1: Local counting rules
//! - Pass 2: Pairwise subset / intersection algebra
//! - Pass 3: Bounded brute-force group enumeration
//! - Pass 4: Shape-pattern recognition (delegated to patterns.rs)
//! - Pass 5: Global contradiction validation
//! - Top-level `deduce()` fixed-point driver
//!
//! The passes operate on working copies of the model's constraints: every
//! cell classified mine or safe is removed from all working constraints
//! (with `missing` decremented for mines), which is what unlocks further
//! deductions on the next round.

use crate::model::{BoardModel, Constraint};
use crate::patterns;
use crate::types::{cell_key, decode_key};
use std::collections::{HashMap, HashSet};

/// Maximum unresolved-cell count for group enumeration (2^12 = 4096
/// assignments). Larger groups fall through to probability estimation.
pub const MAX_GROUP_SIZE: usize = 12;

/// Disjoint certain-mine / certain-safe sets, each with a provenance
/// string for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Certainties {
    pub mine: HashMap<u32, String>,
    pub safe: HashMap<u32, String>,
    /// Cells claimed by both sides; resolved during validation.
    conflicts: HashSet<u32>,
}

impl Certainties {
    pub fn is_classified(&self, key: u32) -> bool {
        self.mine.contains_key(&key) || self.safe.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.mine.is_empty() && self.safe.is_empty()
    }
}

/// Record a certain-mine classification and propagate it into the working
/// constraints. Returns true if this was new information.
pub(crate) fn mark_mine(
    work: &mut [Constraint],
    cert: &mut Certainties,
    key: u32,
    why: String,
) -> bool {
    if cert.mine.contains_key(&key) {
        return false;
    }
    if cert.safe.contains_key(&key) {
        // Contradiction between passes: keep both claims for validation,
        // but do not push the disputed cell into the constraints again.
        cert.conflicts.insert(key);
        cert.mine.insert(key, why);
        return false;
    }
    cert.mine.insert(key, why);
    for c in work.iter_mut() {
        if c.unresolved_set.remove(&key) {
            c.unresolved.retain(|&k| k != key);
            c.missing -= 1;
        }
    }
    true
}

/// Record a certain-safe classification and propagate it into the working
/// constraints. Returns true if this was new information.
pub(crate) fn mark_safe(
    work: &mut [Constraint],
    cert: &mut Certainties,
    key: u32,
    why: String,
) -> bool {
    if cert.safe.contains_key(&key) {
        return false;
    }
    if cert.mine.contains_key(&key) {
        cert.conflicts.insert(key);
        cert.safe.insert(key, why);
        return false;
    }
    cert.safe.insert(key, why);
    for c in work.iter_mut() {
        if c.unresolved_set.remove(&key) {
            c.unresolved.retain(|&k| k != key);
        }
    }
    true
}

// ─── Pass 1: Local counting ─────────────────────────────────────────────────

/// If a constraint's missing count is zero, everything it still watches is
/// safe; if the missing count equals the watch count, everything is a mine.
fn pass_local_counting(work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;

    for idx in 0..work.len() {
        let c = &work[idx];
        if c.unresolved.is_empty() || !c.is_feasible() {
            continue;
        }
        let (orow, ocol) = c.origin;
        let value = c.value;

        if c.missing == 0 {
            let cells = c.unresolved.clone();
            for key in cells {
                let why = format!("({orow},{ocol})={value} is satisfied");
                if mark_safe(work, cert, key, why) {
                    progress = true;
                }
            }
        } else if c.missing as usize == c.unresolved.len() {
            let cells = c.unresolved.clone();
            for key in cells {
                let why = format!("({orow},{ocol})={value} needs every remaining neighbor");
                if mark_mine(work, cert, key, why) {
                    progress = true;
                }
            }
        }
    }

    progress
}

// ─── Pass 2: Pairwise subset / intersection algebra ─────────────────────────

/// Deduced action queued while a constraint pair is still borrowed.
struct PairAction {
    key: u32,
    is_mine: bool,
    why: String,
}

/// Analyze one overlapping constraint pair. Subset containment is checked
/// in both directions; non-containing overlaps go through the bounded
/// two-equation split (mines in A-only / shared / B-only).
fn analyze_pair(ca: &Constraint, cb: &Constraint) -> Vec<PairAction> {
    let mut actions = Vec::new();

    let shared: Vec<u32> = ca
        .unresolved
        .iter()
        .copied()
        .filter(|&k| cb.contains(k))
        .collect();
    if shared.is_empty() {
        return actions;
    }

    let a_only: Vec<u32> = ca
        .unresolved
        .iter()
        .copied()
        .filter(|&k| !cb.contains(k))
        .collect();
    let b_only: Vec<u32> = cb
        .unresolved
        .iter()
        .copied()
        .filter(|&k| !ca.contains(k))
        .collect();

    let am = ca.missing;
    let bm = cb.missing;
    let (ar, ac) = ca.origin;
    let (br, bc) = cb.origin;

    if a_only.is_empty() && !b_only.is_empty() {
        // A ⊆ B: the cells unique to B account for exactly bm - am mines.
        let diff = bm - am;
        if diff == 0 {
            for key in b_only {
                actions.push(PairAction {
                    key,
                    is_mine: false,
                    why: format!("({ar},{ac}) covers the mines of ({br},{bc})"),
                });
            }
        } else if diff == b_only.len() as i32 {
            for key in b_only {
                actions.push(PairAction {
                    key,
                    is_mine: true,
                    why: format!("({br},{bc}) forces mines outside ({ar},{ac})"),
                });
            }
        }
        // diff out of [0, |b_only|] means the pair is inconsistent;
        // no deduction is taken from it.
    } else if b_only.is_empty() && !a_only.is_empty() {
        let diff = am - bm;
        if diff == 0 {
            for key in a_only {
                actions.push(PairAction {
                    key,
                    is_mine: false,
                    why: format!("({br},{bc}) covers the mines of ({ar},{ac})"),
                });
            }
        } else if diff == a_only.len() as i32 {
            for key in a_only {
                actions.push(PairAction {
                    key,
                    is_mine: true,
                    why: format!("({ar},{ac}) forces mines outside ({br},{bc})"),
                });
            }
        }
    } else if !a_only.is_empty() && !b_only.is_empty() {
        // Two equations, three unknowns:
        //   x + y = am  (x mines in A-only, y in shared)
        //   y + z = bm  (z mines in B-only)
        // Bounded by region sizes; solvable when the shared count is pinned.
        let y_min = 0i64
            .max(am as i64 - a_only.len() as i64)
            .max(bm as i64 - b_only.len() as i64);
        let y_max = (shared.len() as i64).min(am as i64).min(bm as i64);

        if y_min == y_max && y_min >= 0 {
            let y = y_min;
            let x = am as i64 - y;
            let z = bm as i64 - y;

            if (0..=a_only.len() as i64).contains(&x) && (0..=b_only.len() as i64).contains(&z) {
                let why = format!("overlap of ({ar},{ac}) and ({br},{bc}) pins the split");
                let push = |region: &[u32], count: i64, actions: &mut Vec<PairAction>| {
                    if count == 0 {
                        for &key in region {
                            actions.push(PairAction { key, is_mine: false, why: why.clone() });
                        }
                    } else if count == region.len() as i64 {
                        for &key in region {
                            actions.push(PairAction { key, is_mine: true, why: why.clone() });
                        }
                    }
                };
                push(&a_only, x, &mut actions);
                push(&b_only, z, &mut actions);
                push(&shared, y, &mut actions);
            }
        }
    }

    actions
}

/// Compare constraints whose origins sit within a 5x5 box of each other —
/// constraints further apart cannot share unresolved cells.
fn pass_pairwise(work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;

    let origins: HashMap<u32, usize> = work
        .iter()
        .enumerate()
        .map(|(i, c)| (cell_key(c.origin.0, c.origin.1), i))
        .collect();

    for ai in 0..work.len() {
        let (orow, ocol) = work[ai].origin;
        for dr in -2i32..=2 {
            for dc in -2i32..=2 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let nr = orow as i32 + dr;
                let nc = ocol as i32 + dc;
                if nr < 0 || nc < 0 {
                    continue;
                }
                let Some(&bi) = origins.get(&cell_key(nr as usize, nc as usize)) else {
                    continue;
                };
                if bi <= ai {
                    continue; // each unordered pair once; both directions inside
                }

                let (ca, cb) = (&work[ai], &work[bi]);
                if ca.unresolved.is_empty()
                    || cb.unresolved.is_empty()
                    || !ca.is_feasible()
                    || !cb.is_feasible()
                {
                    continue;
                }

                let actions = analyze_pair(ca, cb);
                for act in actions {
                    let applied = if act.is_mine {
                        mark_mine(work, cert, act.key, act.why)
                    } else {
                        mark_safe(work, cert, act.key, act.why)
                    };
                    if applied {
                        progress = true;
                    }
                }
            }
        }
    }

    progress
}

// ─── Pass 3: Bounded brute-force group enumeration ──────────────────────────

/// Group constraints that transitively share unresolved cells, returning
/// each group's cell set (sorted for determinism).
fn collect_groups(work: &[Constraint]) -> Vec<(Vec<u32>, Vec<usize>)> {
    let mut cell_map: HashMap<u32, Vec<usize>> = HashMap::new();
    for (idx, c) in work.iter().enumerate() {
        if c.unresolved.is_empty() || !c.is_feasible() {
            continue;
        }
        for &key in &c.unresolved {
            cell_map.entry(key).or_default().push(idx);
        }
    }

    let mut groups = Vec::new();
    let mut visited: HashSet<u32> = HashSet::new();

    let mut all_cells: Vec<u32> = cell_map.keys().copied().collect();
    all_cells.sort_unstable();

    for &start in &all_cells {
        if visited.contains(&start) {
            continue;
        }
        let mut cells = Vec::new();
        let mut member_constraints: HashSet<usize> = HashSet::new();
        let mut queue = vec![start];
        visited.insert(start);

        while let Some(key) = queue.pop() {
            cells.push(key);
            if let Some(indices) = cell_map.get(&key) {
                for &idx in indices {
                    member_constraints.insert(idx);
                    for &other in &work[idx].unresolved {
                        if visited.insert(other) {
                            queue.push(other);
                        }
                    }
                }
            }
        }

        cells.sort_unstable();
        let mut indices: Vec<usize> = member_constraints.into_iter().collect();
        indices.sort_unstable();
        groups.push((cells, indices));
    }

    groups
}

/// Enumerate every mine/no-mine assignment over one group and keep the
/// assignments consistent with all member constraints. Returns cells that
/// are mines in every consistent assignment and cells that are mines in
/// none. An over-constrained group (no consistent assignment) yields
/// nothing.
fn enumerate_group(
    cells: &[u32],
    constraints: &[&Constraint],
) -> (Vec<u32>, Vec<u32>) {
    let k = cells.len();
    let index_of: HashMap<u32, usize> = cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut valid_masks: Vec<u32> = Vec::new();

    for mask in 0u32..(1u32 << k) {
        let mut ok = true;
        for c in constraints {
            let mut mines = 0i32;
            for &key in &c.unresolved {
                if let Some(&i) = index_of.get(&key) {
                    mines += ((mask >> i) & 1) as i32;
                }
            }
            if mines != c.missing {
                ok = false;
                break;
            }
        }
        if ok {
            valid_masks.push(mask);
        }
    }

    if valid_masks.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut always_mine = Vec::new();
    let mut always_safe = Vec::new();

    for i in 0..k {
        let mut mine = true;
        let mut safe = true;
        for &mask in &valid_masks {
            if (mask >> i) & 1 == 0 {
                mine = false;
            } else {
                safe = false;
            }
        }
        if mine {
            always_mine.push(cells[i]);
        }
        if safe {
            always_safe.push(cells[i]);
        }
    }

    (always_mine, always_safe)
}

fn pass_group_enumeration(work: &mut Vec<Constraint>, cert: &mut Certainties) -> bool {
    let mut progress = false;

    let mut groups = collect_groups(work);
    // Smallest groups first, matching the cheapest-win-first ordering.
    groups.sort_by_key(|(cells, _)| cells.len());

    for (cells, indices) in groups {
        if cells.len() > MAX_GROUP_SIZE {
            continue;
        }

        let refs: Vec<&Constraint> = indices.iter().map(|&i| &work[i]).collect();
        let (mines, safes) = enumerate_group(&cells, &refs);

        for key in mines {
            let (r, c) = decode_key(key);
            let why = format!("mine in every assignment of a {}-cell group ({r},{c})", cells.len());
            if mark_mine(work, cert, key, why) {
                progress = true;
            }
        }
        for key in safes {
            let (r, c) = decode_key(key);
            let why = format!("mine in no assignment of a {}-cell group ({r},{c})", cells.len());
            if mark_safe(work, cert, key, why) {
                progress = true;
            }
        }

        if progress {
            // Constraints changed under us; regrouping next round is
            // cheaper than patching the remaining groups.
            break;
        }
    }

    progress
}

// ─── Pass 5: Global contradiction validation ────────────────────────────────

/// Resolve double-classified cells and re-verify every original constraint
/// against the final classification. Any violated constraint makes the
/// whole turn's deductions unsound: they are all discarded and the caller
/// falls back to probability-based selection.
fn validate(model: &BoardModel, mut cert: Certainties) -> Certainties {
    // Cells claimed by both sides: zero-adjacency wins, otherwise both
    // claims are dropped.
    let disputed: Vec<u32> = cert
        .conflicts
        .iter()
        .copied()
        .chain(
            cert.mine
                .keys()
                .filter(|&k| cert.safe.contains_key(k))
                .copied(),
        )
        .collect();
    for key in disputed {
        let (row, col) = decode_key(key);
        if model.revealed.in_bounds(row, col) && model.adjacent_to_zero(row, col) {
            cert.mine.remove(&key);
        } else {
            cert.mine.remove(&key);
            cert.safe.remove(&key);
        }
    }
    cert.conflicts.clear();

    for c in &model.constraints {
        if (c.flagged as i32) > c.value as i32 {
            return Certainties::default();
        }
        let mines = c
            .unresolved
            .iter()
            .filter(|&k| cert.mine.contains_key(k))
            .count() as i32;
        let unclassified = c
            .unresolved
            .iter()
            .filter(|&k| !cert.mine.contains_key(k) && !cert.safe.contains_key(k))
            .count() as i32;
        if c.missing < mines || c.missing > mines + unclassified {
            return Certainties::default();
        }
    }

    cert
}

// ─── Top-level driver ───────────────────────────────────────────────────────

/// Re-run passes 1-2 until neither makes progress, under an iteration cap.
fn run_fixpoint(work: &mut Vec<Constraint>, cert: &mut Certainties, cap: usize) {
    let mut rounds = 0;
    loop {
        rounds += 1;
        if rounds > cap {
            break;
        }
        if pass_local_counting(work, cert) {
            continue;
        }
        if pass_pairwise(work, cert) {
            continue;
        }
        break;
    }
}

/// Run all five deduction passes over the model and return the validated,
/// disjoint certainty sets. Never panics on inconsistent boards; the worst
/// case is an empty result.
pub fn deduce(model: &BoardModel) -> Certainties {
    let mut cert = Certainties::default();
    if model.is_degenerate() {
        return cert;
    }

    let mut work: Vec<Constraint> = model.constraints.clone();
    let cap = (model.rows * model.cols * 2).max(16);

    run_fixpoint(&mut work, &mut cert, cap);

    if pass_group_enumeration(&mut work, &mut cert) {
        run_fixpoint(&mut work, &mut cert, cap);
    }

    if patterns::apply(model, &mut work, &mut cert) {
        run_fixpoint(&mut work, &mut cert, cap);
    }

    validate(model, cert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlaggedCell, RevealedCell, TurnInput};

    fn revealed(row: usize, col: usize, content: &str) -> RevealedCell {
        RevealedCell {
            row,
            col,
            content: content.to_string(),
        }
    }

    fn build(rows: usize, cols: usize, cells: Vec<RevealedCell>, flags: Vec<FlaggedCell>) -> BoardModel {
        BoardModel::build(&TurnInput {
            rows,
            cols,
            revealed: cells,
            flagged: flags,
            history: Vec::new(),
        })
    }

    /// Synthetic constraint for pass-level tests.
    fn synthetic(origin: (usize, usize), missing: i32, cells: &[u32]) -> Constraint {
        Constraint {
            origin,
            value: missing.max(0) as u8,
            unresolved: cells.to_vec(),
            unresolved_set: cells.iter().copied().collect(),
            flagged: 0,
            missing,
        }
    }

    #[test]
    fn test_zero_neighbors_all_safe() {
        // 9x9 with a single revealed 0 at (4,4): all 8 neighbors certain-safe.
        let model = build(9, 9, vec![revealed(4, 4, "0")], vec![]);
        let cert = deduce(&model);
        assert_eq!(cert.safe.len(), 8);
        assert!(cert.mine.is_empty());
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let key = cell_key((4 + dr) as usize, (4 + dc) as usize);
                assert!(cert.safe.contains_key(&key));
            }
        }
    }

    #[test]
    fn test_saturated_constraint_all_mines() {
        // A revealed "2" in a corner with exactly 2 unresolved neighbors:
        // (0,0)="2", (0,1)="2" revealed, leaving (1,0),(1,1) hidden for it.
        let model = build(
            9,
            9,
            vec![revealed(0, 0, "2"), revealed(0, 1, "2")],
            vec![],
        );
        let cert = deduce(&model);
        assert!(cert.mine.contains_key(&cell_key(1, 0)));
        assert!(cert.mine.contains_key(&cell_key(1, 1)));
    }

    #[test]
    fn test_subset_deduction_cascade() {
        // Row 0 revealed 1,2,1 over a fully hidden row 1 (2x3 board):
        // forced mines at (1,0),(1,2), safe at (1,1).
        let model = build(
            2,
            3,
            vec![
                revealed(0, 0, "1"),
                revealed(0, 1, "2"),
                revealed(0, 2, "1"),
            ],
            vec![],
        );
        let cert = deduce(&model);
        assert!(cert.mine.contains_key(&cell_key(1, 0)));
        assert!(cert.mine.contains_key(&cell_key(1, 2)));
        assert!(cert.safe.contains_key(&cell_key(1, 1)));
        assert_eq!(cert.mine.len(), 2);
    }

    #[test]
    fn test_pairwise_intersection_split() {
        // A: {x,y} needs 1; B: {y,z,w} needs 2; C: {x,w} needs 1.
        // The unique assignment is y,w mines and x,z safe; the A/B overlap
        // split already pins parts of it.
        let x = cell_key(1, 0);
        let y = cell_key(1, 1);
        let z = cell_key(1, 2);
        let w = cell_key(1, 3);
        let mut work = vec![
            synthetic((0, 0), 1, &[x, y]),
            synthetic((0, 1), 2, &[y, z, w]),
        ];
        let mut cert = Certainties::default();
        let progress = pass_pairwise(&mut work, &mut cert);
        // aOnly={x}, shared={y}, bOnly={z,w}: y_min=max(0,0,0)=0,
        // y_max=min(1,1,2)=1 — not pinned, so nothing fires yet.
        assert!(!progress);

        // Tighten B to need 3: y is pinned to 1 -> x safe, z,w mines.
        let mut work = vec![
            synthetic((0, 0), 1, &[x, y]),
            synthetic((0, 1), 3, &[y, z, w]),
        ];
        let mut cert = Certainties::default();
        assert!(pass_pairwise(&mut work, &mut cert));
        assert!(cert.safe.contains_key(&x));
        assert!(cert.mine.contains_key(&y));
        assert!(cert.mine.contains_key(&z));
        assert!(cert.mine.contains_key(&w));
    }

    #[test]
    fn test_enumeration_resolves_group_at_cap() {
        // x+y=1, y+z+w=2, x+w=1 has the unique solution y,w mines; a pair
        // chain w-a1-a2-...-a8 extends the group to exactly 12 cells and
        // stays uniquely solvable. Pairwise algebra alone cannot crack it.
        let base: Vec<u32> = (0..12).map(|i| cell_key(3, i)).collect();
        let (x, y, z, w) = (base[0], base[1], base[2], base[3]);
        let mut work = vec![
            synthetic((0, 0), 1, &[x, y]),
            synthetic((0, 2), 2, &[y, z, w]),
            synthetic((0, 4), 1, &[x, w]),
        ];
        for i in 3..11 {
            work.push(synthetic((0, 6 + i), 1, &[base[i], base[i + 1]]));
        }

        let mut cert = Certainties::default();
        assert!(pass_group_enumeration(&mut work, &mut cert));
        assert!(cert.mine.contains_key(&y));
        assert!(cert.safe.contains_key(&x));
    }

    #[test]
    fn test_enumeration_skips_oversized_group() {
        // Same topology extended by one more chained cell: 13 cells, above
        // the cap. The pass must emit nothing at all.
        let base: Vec<u32> = (0..13).map(|i| cell_key(3, i)).collect();
        let (x, y, z, w) = (base[0], base[1], base[2], base[3]);
        let mut work = vec![
            synthetic((0, 0), 1, &[x, y]),
            synthetic((0, 2), 2, &[y, z, w]),
            synthetic((0, 4), 1, &[x, w]),
        ];
        for i in 3..12 {
            work.push(synthetic((0, 6 + i), 1, &[base[i], base[i + 1]]));
        }

        let mut cert = Certainties::default();
        assert!(!pass_group_enumeration(&mut work, &mut cert));
        assert!(cert.is_empty());
    }

    #[test]
    fn test_enumeration_ignores_overconstrained_group() {
        // x+y=1 and x+y=2 admit no assignment: emit nothing, don't panic.
        let x = cell_key(0, 0);
        let y = cell_key(0, 1);
        let mut work = vec![
            synthetic((1, 0), 1, &[x, y]),
            synthetic((1, 1), 2, &[x, y]),
        ];
        let mut cert = Certainties::default();
        assert!(!pass_group_enumeration(&mut work, &mut cert));
        assert!(cert.is_empty());
    }

    #[test]
    fn test_contradiction_rolls_back_turn() {
        // (0,1)="0" proves row 1 safe while (2,1)="3" demands all three of
        // the same cells as mines. After the zero-priority override the
        // "3" cannot be satisfied, so the whole turn is discarded.
        let model = build(
            3,
            3,
            vec![
                revealed(0, 0, "0"),
                revealed(0, 1, "0"),
                revealed(0, 2, "0"),
                revealed(2, 0, "0"),
                revealed(2, 2, "0"),
                revealed(2, 1, "3"),
            ],
            vec![],
        );
        let cert = deduce(&model);
        assert!(cert.is_empty());
    }

    #[test]
    fn test_overflagged_constraint_discards_deductions() {
        // A "1" with two flags on its neighbors is violated outright; even
        // unrelated clean deductions are dropped for the turn.
        let model = build(
            9,
            9,
            vec![revealed(0, 0, "1"), revealed(5, 5, "0")],
            vec![
                FlaggedCell { row: 0, col: 1 },
                FlaggedCell { row: 1, col: 1 },
            ],
        );
        let cert = deduce(&model);
        assert!(cert.is_empty());
    }

    #[test]
    fn test_certainty_sets_disjoint_on_random_boards() {
        // Soundness property: whatever the (possibly inconsistent) input,
        // the two output sets never overlap.
        use crate::rng::EngineRng;
        let mut rng = EngineRng::from_seed(20260806);
        for _ in 0..40 {
            let rows = 4 + rng.pick(5);
            let cols = 4 + rng.pick(5);
            let mut cells = Vec::new();
            for row in 0..rows {
                for col in 0..cols {
                    if rng.pick(3) == 0 {
                        let v = rng.pick(4);
                        cells.push(revealed(row, col, &v.to_string()));
                    }
                }
            }
            let model = build(rows, cols, cells, vec![]);
            let cert = deduce(&model);
            for key in cert.mine.keys() {
                assert!(!cert.safe.contains_key(key));
            }
        }
    }

    #[test]
    fn test_deduction_has_provenance() {
        let model = build(9, 9, vec![revealed(4, 4, "0")], vec![]);
        let cert = deduce(&model);
        for why in cert.safe.values() {
            assert!(!why.is_empty());
        }
    }
}
