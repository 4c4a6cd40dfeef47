//! WebAssembly decision engine for Reverse Minesweeper.
//!
//! The automated player's brain: given the revealed board, it flags cells
//! it can prove are mines and picks the next cell to reveal. Exports
//! high-level functions callable from JavaScript via wasm-bindgen;
//! structured values cross the boundary through serde-wasm-bindgen.

pub mod engine;
pub mod memory;
pub mod model;
pub mod patterns;
pub mod probability;
pub mod rng;
pub mod selector;
pub mod solver;
pub mod types;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use crate::engine;
    use crate::memory::MineMemory;
    use crate::types::{FlaggedCell, PlayerAction, TurnInput};
    use wasm_bindgen::prelude::*;

    /// Analyze one turn: deduce flags and pick the next reveal.
    ///
    /// `input` is a JS object matching `TurnInput`; `memory_json` is the
    /// persisted memory document, or absent for pure logic mode. Returns
    /// a JS object matching `TurnDecision`, or `null` on interop failure.
    #[wasm_bindgen(js_name = "analyzeBoard")]
    pub fn wasm_analyze_board(input: JsValue, memory_json: Option<String>) -> JsValue {
        let input: TurnInput = serde_wasm_bindgen::from_value(input).unwrap_or_default();
        let memory = memory_json.map(|json| MineMemory::from_json(&json));

        let decision = engine::analyze_turn(&input, memory.as_ref());
        serde_wasm_bindgen::to_value(&decision).unwrap_or(JsValue::NULL)
    }

    /// Evaluate one cell against the persisted memory.
    /// Returns `{ risk, reasoning, confidence }`.
    #[wasm_bindgen(js_name = "evaluateCellRisk")]
    pub fn wasm_evaluate_cell_risk(
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        memory_json: Option<String>,
        history: JsValue,
    ) -> JsValue {
        let memory = match memory_json {
            Some(json) => MineMemory::from_json(&json),
            None => MineMemory::default(),
        };
        let history: Vec<PlayerAction> =
            serde_wasm_bindgen::from_value(history).unwrap_or_default();

        let assessment = memory.evaluate_cell((row, col), (rows, cols), &history);
        serde_wasm_bindgen::to_value(&assessment).unwrap_or(JsValue::NULL)
    }

    /// Fold a finished game into the memory and return the updated
    /// document for the host to persist.
    #[wasm_bindgen(js_name = "recordGameOutcome")]
    pub fn wasm_record_game_outcome(
        memory_json: Option<String>,
        rows: usize,
        cols: usize,
        won: bool,
        history: JsValue,
        mines: JsValue,
    ) -> String {
        let mut memory = match memory_json {
            Some(json) => MineMemory::from_json(&json),
            None => MineMemory::default(),
        };
        let history: Vec<PlayerAction> =
            serde_wasm_bindgen::from_value(history).unwrap_or_default();
        let mines: Vec<FlaggedCell> =
            serde_wasm_bindgen::from_value(mines).unwrap_or_default();

        for mine in &mines {
            memory.record_mine((mine.row, mine.col), (rows, cols));
        }
        if won {
            memory.record_win(&history, (rows, cols));
        } else {
            memory.record_loss(&history, (rows, cols));
        }

        memory.to_json()
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM engine ready".to_string()
    }
}
