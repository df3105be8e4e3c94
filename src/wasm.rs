//! WASM bindings: a thin marshalling adapter over `Solver`/`SolveConfig` for
//! a browser-based caller. Carries no solving logic of its own, every call
//! here just parses JS-side JSON, drives the same `Solver` the CLI and
//! library consumers use, and serializes the result back out.

use serde_derive::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::grid::Grid;
use crate::solver::{SolveConfig, Solver};
use crate::word_list::WordList;

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn initialize() {
    set_panic_hook();
}

/// Install `console_error_panic_hook` in debug builds so a Rust panic
/// surfaces as a readable browser console message instead of an opaque
/// "unreachable executed" trap.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// The subset of `SolveConfig` exposed across the wasm boundary; `cancel`
/// has no meaning for a single synchronous call from JS, so it's omitted
/// here and always constructed fresh.
#[derive(Debug, Deserialize)]
struct WasmSolveConfig {
    #[serde(default = "default_max_solutions")]
    max_solutions: u32,
    #[serde(default)]
    rng_seed: Option<u64>,
}

fn default_max_solutions() -> u32 {
    1
}

impl From<WasmSolveConfig> for SolveConfig {
    fn from(cfg: WasmSolveConfig) -> SolveConfig {
        SolveConfig {
            max_solutions: cfg.max_solutions,
            rng_seed: cfg.rng_seed,
            yield_every: None,
            cancel: crate::util::CancellationToken::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WasmSolveResult {
    solution: crate::report::Solution,
    additional_solutions: Vec<crate::report::Solution>,
    recursive_calls: u64,
    backtracks: u64,
    elapsed_ms: u128,
}

/// Solve a grid against a word list entirely within one call, returning the
/// serialized `SolveResult` as a JSON string.
///
/// - `grid_text`: the textual grid encoding (see `grid::Grid::parse`).
/// - `words_json`: a JSON array of dictionary words.
/// - `config_json`: a JSON object with optional `max_solutions` and
///   `rng_seed` fields; `null` or `"{}"` selects the defaults.
///
/// # Errors
/// Returns a `JsError` if the grid, word list, or config JSON fails to
/// parse, or if the solve itself fails (no slots, no solution, etc).
#[wasm_bindgen]
pub fn solve_wasm(grid_text: &str, words_json: &str, config_json: &str) -> Result<String, JsError> {
    let grid = Grid::parse(grid_text).map_err(|err| JsError::new(&err.to_string()))?;

    let words: Vec<String> =
        serde_json::from_str(words_json).map_err(|err| JsError::new(&format!("invalid words JSON: {err}")))?;
    let word_list = WordList::from_words(words);

    let wasm_config: WasmSolveConfig = if config_json.trim().is_empty() {
        WasmSolveConfig {
            max_solutions: default_max_solutions(),
            rng_seed: None,
        }
    } else {
        serde_json::from_str(config_json)
            .map_err(|err| JsError::new(&format!("invalid config JSON: {err}")))?
    };

    let solver = Solver::new(word_list);
    let config: SolveConfig = wasm_config.into();
    let result = solver
        .solve(&grid, &config)
        .map_err(|err| JsError::new(&err.to_string()))?;

    let out = WasmSolveResult {
        solution: result.solution,
        additional_solutions: result.additional_solutions,
        recursive_calls: result.statistics.recursive_calls,
        backtracks: result.statistics.backtracks,
        elapsed_ms: result.statistics.elapsed.as_millis(),
    };
    serde_json::to_string(&out).map_err(|err| JsError::new(&format!("failed to serialize result: {err}")))
}
