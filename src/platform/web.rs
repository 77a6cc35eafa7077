//! Browser binding
//!
//! JavaScript owns a `WebBoard` and talks to it in JSON: one command object
//! (or an array of them) in, one response object (or array) out. Errors come
//! back as thrown strings.

use wasm_bindgen::prelude::*;

use crate::challenges;
use crate::sim::{BoardState, Command, MarbleColor, MatchMode, parse_script};

#[wasm_bindgen]
pub struct WebBoard {
    state: BoardState,
    expected: Vec<MarbleColor>,
    match_mode: MatchMode,
}

#[wasm_bindgen]
impl WebBoard {
    /// Fresh reference board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebBoard {
        super::init_logging(log::Level::Info);
        WebBoard {
            state: BoardState::new(),
            expected: Vec::new(),
            match_mode: MatchMode::default(),
        }
    }

    /// Board preset for a built-in challenge
    #[wasm_bindgen(js_name = fromChallenge)]
    pub fn from_challenge(id: &str) -> Result<WebBoard, JsValue> {
        super::init_logging(log::Level::Info);
        let challenge = challenges::find(id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown challenge '{id}'")))?;
        let state = challenge.build().map_err(to_js)?;
        Ok(WebBoard {
            state,
            expected: challenge.expected,
            match_mode: MatchMode::default(),
        })
    }

    /// Apply one JSON command, returning the JSON response
    pub fn apply(&mut self, json: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(json).map_err(to_js)?;
        let response = self.state.apply(&command).map_err(to_js)?;
        serde_json::to_string(&response).map_err(to_js)
    }

    /// Apply a JSON array of commands, stopping at the first failure
    #[wasm_bindgen(js_name = runScript)]
    pub fn run_script(&mut self, json: &str) -> Result<String, JsValue> {
        let script = parse_script(json).map_err(to_js)?;
        let responses = self.state.run_script(&script).map_err(to_js)?;
        serde_json::to_string(&responses).map_err(to_js)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(to_js)
    }

    /// ASCII rendering of the board
    pub fn render(&self) -> String {
        self.state.snapshot().to_string()
    }

    /// `contains`, `prefix` or `exact`; used by `solved`
    #[wasm_bindgen(js_name = setMatchMode)]
    pub fn set_match_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        self.match_mode = MatchMode::from_tag(mode)
            .ok_or_else(|| JsValue::from_str(&format!("unknown match mode '{mode}'")))?;
        Ok(())
    }

    /// Whether the output log satisfies the loaded challenge
    pub fn solved(&self) -> bool {
        self.match_mode.matches(self.state.output(), &self.expected)
    }
}

impl Default for WebBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
