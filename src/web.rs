//! Browser bindings
//!
//! The page owns the canvas and the animation frame loop; it calls `step`
//! once per frame and draws whatever `snapshot_json` returns.

use wasm_bindgen::prelude::*;

use crate::config::{CombatConfig, EliminationConfig};
use crate::consts::MAX_STEP_MS;
use crate::sim::{Candidate, CombatSim, EliminationSim, RoundPhase, Session};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Flag Royale starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_candidates(json: &str) -> Result<Vec<Candidate>, JsValue> {
    serde_json::from_str(json).map_err(to_js)
}

/// Seed from the JS clock unless the page supplies one
fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| js_sys::Date::now() as u64)
}

fn phase_name(phase: RoundPhase) -> &'static str {
    match phase {
        RoundPhase::Idle => "idle",
        RoundPhase::Playing => "playing",
        RoundPhase::Finished => "finished",
    }
}

/// Gap arena elimination game
#[wasm_bindgen]
pub struct WebElimination {
    session: Session<EliminationSim>,
}

#[wasm_bindgen]
impl WebElimination {
    /// `config_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, seed: Option<u64>) -> Result<WebElimination, JsValue> {
        let config = if config_json.trim().is_empty() {
            EliminationConfig::default()
        } else {
            EliminationConfig::from_json(config_json).map_err(to_js)?
        };
        let sim = EliminationSim::new(config, seed_or_clock(seed)).map_err(to_js)?;
        Ok(Self {
            session: Session::new(sim),
        })
    }

    /// Restart rounds automatically `delay_ms` after each finish
    pub fn set_auto_restart(&mut self, delay_ms: f32) {
        self.session.set_auto_restart(Some(delay_ms));
    }

    /// `candidates_json` is an array of `{id, name, glyph}`
    pub fn start_round(&mut self, candidates_json: &str, count: usize) -> Result<(), JsValue> {
        let candidates = parse_candidates(candidates_json)?;
        self.session.start(candidates, count).map_err(to_js)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(to_js)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn step(&mut self, dt_ms: f32) {
        self.session.step(dt_ms.clamp(0.0, MAX_STEP_MS));
    }

    pub fn phase(&self) -> String {
        phase_name(self.session.phase()).to_string()
    }

    pub fn winner(&self) -> Option<String> {
        self.session.sim().winner().map(str::to_string)
    }

    pub fn wins_for(&self, id: &str) -> u32 {
        self.session.wins_for(id)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.sim().snapshot()).map_err(to_js)
    }

    pub fn wins_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.wins()).map_err(to_js)
    }
}

/// Sword combat battle royale
#[wasm_bindgen]
pub struct WebCombat {
    session: Session<CombatSim>,
}

#[wasm_bindgen]
impl WebCombat {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, seed: Option<u64>) -> Result<WebCombat, JsValue> {
        let config = if config_json.trim().is_empty() {
            CombatConfig::default()
        } else {
            CombatConfig::from_json(config_json).map_err(to_js)?
        };
        let sim = CombatSim::new(config, seed_or_clock(seed)).map_err(to_js)?;
        Ok(Self {
            session: Session::new(sim),
        })
    }

    pub fn set_auto_restart(&mut self, delay_ms: f32) {
        self.session.set_auto_restart(Some(delay_ms));
    }

    pub fn start_round(&mut self, candidates_json: &str, count: usize) -> Result<(), JsValue> {
        let candidates = parse_candidates(candidates_json)?;
        self.session.start(candidates, count).map_err(to_js)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(to_js)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn step(&mut self, dt_ms: f32) {
        self.session.step(dt_ms.clamp(0.0, MAX_STEP_MS));
    }

    pub fn phase(&self) -> String {
        phase_name(self.session.phase()).to_string()
    }

    pub fn winner(&self) -> Option<String> {
        self.session.sim().winner().map(str::to_string)
    }

    pub fn wins_for(&self, id: &str) -> u32 {
        self.session.wins_for(id)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.sim().snapshot()).map_err(to_js)
    }

    pub fn wins_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.wins()).map_err(to_js)
    }
}
