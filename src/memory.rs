//! Cross-game memory — persisted record of past mines and outcomes.
//!
//! Coordinates are normalized against the board size (one decimal of
//! row/rows and col/cols) so what was learned on a 9x9 board still biases
//! decisions on a 16x30 one. The store is an explicit, injectable state
//! object: the host loads it once per session (`from_json`), hands it to
//! the engine by reference, and persists `to_json` after every recorded
//! win, loss or mine. Unreadable stored state degrades to a fresh empty
//! store — the engine must keep working in logic-only mode.

use crate::types::{manhattan, PlayerAction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Most recent exact mine sightings kept.
pub const MINE_LOG_CAP: usize = 200;
/// Recorded losing sequences kept.
pub const LOSS_SEQUENCE_CAP: usize = 50;

const NEARBY_MINE_WEIGHT: f64 = 0.15;
const NEARBY_MINE_CAP: f64 = 0.45;
const HEAT_WEIGHT: f64 = 0.05;
const HEAT_CAP: f64 = 0.30;
const OPENING_WEIGHT: f64 = 0.25;
const SECOND_MOVE_WEIGHT: f64 = 0.25;
const SEQUENCE_WEIGHT: f64 = 0.20;

/// A second-move recommendation must clear this win rate with at least
/// this many samples before it overrides the normal analysis path.
const DECISIVE_WIN_RATE: f64 = 0.6;
const DECISIVE_MIN_SAMPLES: u32 = 2;

/// Normalize a coordinate against its board into a size-independent key,
/// discretized to one decimal per axis.
pub fn normalize_key(pos: (usize, usize), size: (usize, usize)) -> String {
    let (rows, cols) = size;
    if rows == 0 || cols == 0 {
        return "0.0,0.0".to_string();
    }
    let nr = (pos.0 as f64 / rows as f64 * 10.0).round() / 10.0;
    let nc = (pos.1 as f64 / cols as f64 * 10.0).round() / 10.0;
    format!("{nr:.1},{nc:.1}")
}

/// Map a normalized key back onto a concrete board. Returns `None` for a
/// malformed key.
pub fn denormalize_key(key: &str, size: (usize, usize)) -> Option<(usize, usize)> {
    let (rows, cols) = size;
    if rows == 0 || cols == 0 {
        return None;
    }
    let (r, c) = key.split_once(',')?;
    let nr: f64 = r.parse().ok()?;
    let nc: f64 = c.parse().ok()?;
    if !(0.0..=1.0).contains(&nr) || !(0.0..=1.0).contains(&nc) {
        return None;
    }
    let row = ((nr * rows as f64).round() as usize).min(rows - 1);
    let col = ((nc * cols as f64).round() as usize).min(cols - 1);
    Some((row, col))
}

fn pair_key(first: &str, second: &str) -> String {
    format!("{first}>{second}")
}

/// Win/loss tally for one outcome-table entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub wins: u32,
    pub losses: u32,
}

impl OutcomeTally {
    pub fn samples(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        if self.samples() == 0 {
            0.0
        } else {
            self.wins as f64 / self.samples() as f64
        }
    }

    pub fn loss_rate(&self) -> f64 {
        if self.samples() == 0 {
            0.0
        } else {
            self.losses as f64 / self.samples() as f64
        }
    }
}

/// One exact mine sighting, with the board it was seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineSighting {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Aggregate counters across every recorded game.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub games: u64,
    pub wins: u64,
    pub losses: u64,
    pub mines_hit: u64,
    pub moves: u64,
}

/// How strongly a risk assessment is backed by recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    High,
    Extreme,
}

/// Result of evaluating one cell against the memory.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Accumulated risk in [0, 1]. 1.0 means a mine was recorded here.
    pub risk: f64,
    pub reasoning: String,
    pub confidence: Confidence,
}

/// The persisted store. Everything here is monotonic except the two
/// bounded logs, which evict oldest-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MineMemory {
    #[serde(default)]
    heat_map: HashMap<String, u32>,
    #[serde(default)]
    mine_log: Vec<MineSighting>,
    #[serde(default)]
    openings: HashMap<String, OutcomeTally>,
    #[serde(default)]
    second_moves: HashMap<String, OutcomeTally>,
    #[serde(default)]
    losing_sequences: Vec<Vec<String>>,
    #[serde(default)]
    stats: MemoryStats,
}

impl MineMemory {
    /// Load from the stored JSON document. Unreadable input yields a fresh
    /// empty store rather than an error.
    pub fn from_json(json: &str) -> MineMemory {
        serde_json::from_str(json).unwrap_or_default()
    }

    /// Serialize to the flat JSON document the host persists wholesale.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    /// Record a mine discovered at `pos` on a `size` board.
    pub fn record_mine(&mut self, pos: (usize, usize), size: (usize, usize)) {
        let key = normalize_key(pos, size);
        *self.heat_map.entry(key).or_insert(0) += 1;

        self.mine_log.push(MineSighting {
            row: pos.0,
            col: pos.1,
            rows: size.0,
            cols: size.1,
        });
        if self.mine_log.len() > MINE_LOG_CAP {
            let excess = self.mine_log.len() - MINE_LOG_CAP;
            self.mine_log.drain(..excess);
        }

        self.stats.mines_hit += 1;
    }

    /// Record a finished, lost game from its move history.
    pub fn record_loss(&mut self, history: &[PlayerAction], size: (usize, usize)) {
        let seq = self.normalized_reveals(history, size);
        self.stats.games += 1;
        self.stats.losses += 1;
        self.stats.moves += seq.len() as u64;
        self.tally(&seq, false);

        if !seq.is_empty() {
            self.losing_sequences.push(seq);
            if self.losing_sequences.len() > LOSS_SEQUENCE_CAP {
                let excess = self.losing_sequences.len() - LOSS_SEQUENCE_CAP;
                self.losing_sequences.drain(..excess);
            }
        }
    }

    /// Record a finished, won game from its move history.
    pub fn record_win(&mut self, history: &[PlayerAction], size: (usize, usize)) {
        let seq = self.normalized_reveals(history, size);
        self.stats.games += 1;
        self.stats.wins += 1;
        self.stats.moves += seq.len() as u64;
        self.tally(&seq, true);
    }

    fn normalized_reveals(&self, history: &[PlayerAction], size: (usize, usize)) -> Vec<String> {
        history
            .iter()
            .filter(|a| a.is_reveal())
            .map(|a| normalize_key(a.cell(), size))
            .collect()
    }

    fn tally(&mut self, seq: &[String], won: bool) {
        if let Some(first) = seq.first() {
            let entry = self.openings.entry(first.clone()).or_default();
            if won {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
        }
        if seq.len() >= 2 {
            let entry = self
                .second_moves
                .entry(pair_key(&seq[0], &seq[1]))
                .or_default();
            if won {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
        }
    }

    /// Evaluate how risky revealing `pos` looks given recorded history.
    ///
    /// A recorded mine at the same exact or normalized position is the
    /// strongest possible signal and short-circuits to risk 1.0.
    pub fn evaluate_cell(
        &self,
        pos: (usize, usize),
        size: (usize, usize),
        history: &[PlayerAction],
    ) -> RiskAssessment {
        let key = normalize_key(pos, size);

        let exact_hit = self
            .mine_log
            .iter()
            .any(|s| (s.rows, s.cols) == size && (s.row, s.col) == pos);
        if exact_hit || self.heat_map.get(&key).copied().unwrap_or(0) > 0 {
            return RiskAssessment {
                risk: 1.0,
                reasoning: format!("a mine was recorded at {key}"),
                confidence: Confidence::Extreme,
            };
        }

        let mut risk = 0.0;
        let mut reasons: Vec<String> = Vec::new();

        // Nearby exact sightings, rescaled onto the current board.
        let nearby = self
            .mine_log
            .iter()
            .filter_map(|s| self.rescale(s, size))
            .filter(|&p| manhattan(p, pos) <= 2)
            .count();
        if nearby > 0 {
            risk += (nearby as f64 * NEARBY_MINE_WEIGHT).min(NEARBY_MINE_CAP);
            reasons.push(format!("{nearby} recorded mines nearby"));
        }

        // Heat in the normalized neighborhood of this cell.
        let heat = self.neighborhood_heat(&key);
        if heat > 0 {
            risk += (heat as f64 * HEAT_WEIGHT).min(HEAT_CAP);
            reasons.push(format!("{heat} mines at similar positions"));
        }

        let reveals_so_far = history.iter().filter(|a| a.is_reveal()).count();

        // Opening-move record, when this would be the first reveal.
        if reveals_so_far == 0 {
            if let Some(t) = self.openings.get(&key) {
                if t.samples() > 0 && t.loss_rate() > 0.0 {
                    risk += t.loss_rate() * OPENING_WEIGHT;
                    reasons.push(format!(
                        "opening here lost {}/{} games",
                        t.losses,
                        t.samples()
                    ));
                }
            }
        }

        // (first, second) pair record, when this would be the second reveal.
        if reveals_so_far == 1 {
            let first = history
                .iter()
                .find(|a| a.is_reveal())
                .map(|a| normalize_key(a.cell(), size));
            if let Some(first) = first {
                if let Some(t) = self.second_moves.get(&pair_key(&first, &key)) {
                    if t.samples() > 0 && t.loss_rate() > 0.0 {
                        risk += t.loss_rate() * SECOND_MOVE_WEIGHT;
                        reasons.push(format!(
                            "this follow-up lost {}/{} games",
                            t.losses,
                            t.samples()
                        ));
                    }
                }
            }
        }

        // Would this move continue a recorded losing line?
        let mut line = self.normalized_reveals(history, size);
        line.push(key);
        let continues = self
            .losing_sequences
            .iter()
            .any(|s| s.len() >= line.len() && s[..line.len()] == line[..]);
        if continues {
            risk += SEQUENCE_WEIGHT;
            reasons.push("continues a recorded losing sequence".to_string());
        }

        let confidence = if reasons.is_empty() {
            Confidence::Low
        } else {
            Confidence::High
        };

        RiskAssessment {
            risk: risk.clamp(0.0, 1.0),
            reasoning: if reasons.is_empty() {
                "no recorded history for this position".to_string()
            } else {
                reasons.join("; ")
            },
            confidence,
        }
    }

    /// Recommend a second move after `first`, but only when the record is
    /// decisive — otherwise defer to the normal analysis path.
    pub fn recommend_second_move(
        &self,
        first: (usize, usize),
        size: (usize, usize),
    ) -> Option<(usize, usize)> {
        let fk = normalize_key(first, size);
        let prefix = format!("{fk}>");

        let mut candidates: Vec<(&str, OutcomeTally)> = self
            .second_moves
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(k, t)| (&k[prefix.len()..], *t))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by(|a, b| {
            b.1.win_rate()
                .partial_cmp(&a.1.win_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.samples().cmp(&a.1.samples()))
                .then(a.0.cmp(b.0))
        });

        let (second_key, tally) = candidates[0];
        if tally.win_rate() < DECISIVE_WIN_RATE || tally.samples() < DECISIVE_MIN_SAMPLES {
            return None;
        }

        let cell = denormalize_key(second_key, size)?;
        if cell == first {
            return None;
        }
        Some(cell)
    }

    /// Rescale an exact sighting onto another board size.
    fn rescale(&self, s: &MineSighting, size: (usize, usize)) -> Option<(usize, usize)> {
        if s.rows == 0 || s.cols == 0 || size.0 == 0 || size.1 == 0 {
            return None;
        }
        let row = ((s.row as f64 / s.rows as f64) * size.0 as f64).round() as usize;
        let col = ((s.col as f64 / s.cols as f64) * size.1 as f64).round() as usize;
        Some((row.min(size.0 - 1), col.min(size.1 - 1)))
    }

    /// Total recorded mines at the key and its 8 normalized neighbors.
    fn neighborhood_heat(&self, key: &str) -> u32 {
        let Some((r, c)) = key.split_once(',') else {
            return 0;
        };
        let (Ok(nr), Ok(nc)) = (r.parse::<f64>(), c.parse::<f64>()) else {
            return 0;
        };

        let mut total = 0;
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                let kr = (nr * 10.0).round() as i32 + dr;
                let kc = (nc * 10.0).round() as i32 + dc;
                if !(0..=10).contains(&kr) || !(0..=10).contains(&kc) {
                    continue;
                }
                let k = format!("{:.1},{:.1}", kr as f64 / 10.0, kc as f64 / 10.0);
                total += self.heat_map.get(&k).copied().unwrap_or(0);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal(row: usize, col: usize) -> PlayerAction {
        PlayerAction::Reveal {
            row,
            col,
            result: "1".to_string(),
        }
    }

    fn flag(row: usize, col: usize) -> PlayerAction {
        PlayerAction::Flag { row, col }
    }

    #[test]
    fn test_normalize_is_size_independent() {
        // The board center normalizes to the same key on any size.
        assert_eq!(
            normalize_key((4, 4), (9, 9)),
            normalize_key((6, 12), (16, 30))
        );
    }

    #[test]
    fn test_denormalize_roundtrip() {
        let key = normalize_key((4, 4), (9, 9));
        let cell = denormalize_key(&key, (9, 9)).unwrap();
        assert!(manhattan(cell, (4, 4)) <= 1);
        assert!(denormalize_key("bad", (9, 9)).is_none());
        assert!(denormalize_key(&key, (0, 9)).is_none());
    }

    #[test]
    fn test_recorded_mine_is_extreme_risk() {
        let mut mem = MineMemory::default();
        mem.record_mine((3, 3), (9, 9));

        let hit = mem.evaluate_cell((3, 3), (9, 9), &[]);
        assert_eq!(hit.risk, 1.0);
        assert_eq!(hit.confidence, Confidence::Extreme);

        // Strict ordering over any cell without a recorded mine.
        let other = mem.evaluate_cell((8, 0), (9, 9), &[]);
        assert!(other.risk < hit.risk);
        assert_ne!(other.confidence, Confidence::Extreme);
    }

    #[test]
    fn test_normalized_hit_crosses_board_sizes() {
        let mut mem = MineMemory::default();
        mem.record_mine((4, 4), (9, 9));
        // Same normalized position on a 16x30 board.
        let hit = mem.evaluate_cell((6, 12), (16, 30), &[]);
        assert_eq!(hit.risk, 1.0);
        assert_eq!(hit.confidence, Confidence::Extreme);
    }

    #[test]
    fn test_mine_log_eviction_oldest_first() {
        let mut mem = MineMemory::default();
        for i in 0..(MINE_LOG_CAP + 5) {
            mem.record_mine((i % 50, i / 50), (64, 64));
        }
        assert_eq!(mem.mine_log.len(), MINE_LOG_CAP);
        // The first five sightings are gone.
        assert!(!mem
            .mine_log
            .iter()
            .any(|s| (s.row, s.col) == (0, 0)));
        assert_eq!(mem.stats.mines_hit, (MINE_LOG_CAP + 5) as u64);
    }

    #[test]
    fn test_loss_updates_tables_and_sequences() {
        let mut mem = MineMemory::default();
        let history = vec![reveal(0, 0), flag(5, 5), reveal(2, 2), reveal(4, 4)];
        mem.record_loss(&history, (9, 9));

        assert_eq!(mem.stats.games, 1);
        assert_eq!(mem.stats.losses, 1);
        // The flag is not part of the move sequence.
        assert_eq!(mem.stats.moves, 3);
        assert_eq!(mem.losing_sequences.len(), 1);
        assert_eq!(mem.losing_sequences[0].len(), 3);

        let opening = mem.openings.get(&normalize_key((0, 0), (9, 9))).unwrap();
        assert_eq!(opening.losses, 1);
        assert_eq!(opening.wins, 0);
    }

    #[test]
    fn test_sequence_overlap_raises_risk() {
        let mut mem = MineMemory::default();
        mem.record_loss(&[reveal(0, 0), reveal(2, 2), reveal(4, 4)], (9, 9));

        // After the same two opening reveals, the recorded third move
        // carries sequence risk; an unrelated cell does not.
        let history = vec![reveal(0, 0), reveal(2, 2)];
        let risky = mem.evaluate_cell((4, 4), (9, 9), &history);
        let neutral = mem.evaluate_cell((8, 0), (9, 9), &history);
        assert!(risky.risk > neutral.risk);
        assert_eq!(risky.confidence, Confidence::High);
    }

    #[test]
    fn test_second_move_recommendation_requires_decisive_record() {
        let mut mem = MineMemory::default();
        let winning = vec![reveal(0, 0), reveal(4, 4)];

        mem.record_win(&winning, (9, 9));
        // One sample is not decisive.
        assert!(mem.recommend_second_move((0, 0), (9, 9)).is_none());

        mem.record_win(&winning, (9, 9));
        let rec = mem.recommend_second_move((0, 0), (9, 9)).unwrap();
        assert!(manhattan(rec, (4, 4)) <= 1);

        // A majority-losing follow-up is never recommended.
        mem.record_loss(&winning, (9, 9));
        mem.record_loss(&winning, (9, 9));
        assert!(mem.recommend_second_move((0, 0), (9, 9)).is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_tables() {
        let mut mem = MineMemory::default();
        mem.record_mine((3, 3), (9, 9));
        mem.record_loss(&[reveal(0, 0), reveal(1, 1)], (9, 9));
        mem.record_win(&[reveal(0, 0), reveal(4, 4)], (9, 9));

        let restored = MineMemory::from_json(&mem.to_json());
        assert_eq!(restored.stats.games, 2);
        assert_eq!(restored.stats.mines_hit, 1);
        assert_eq!(restored.mine_log, mem.mine_log);
        assert_eq!(restored.losing_sequences, mem.losing_sequences);
        assert_eq!(
            restored.evaluate_cell((3, 3), (9, 9), &[]).risk,
            1.0
        );
    }

    #[test]
    fn test_unreadable_store_degrades_to_empty() {
        let mem = MineMemory::from_json("not json at all");
        assert_eq!(mem.stats.games, 0);
        let assessment = mem.evaluate_cell((1, 1), (9, 9), &[]);
        assert_eq!(assessment.risk, 0.0);
        assert_eq!(assessment.confidence, Confidence::Low);
    }
}
