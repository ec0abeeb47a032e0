//! Archery Range core crate.
//!
//! Drag the bow, release to loose an arrow, score on the target's rings. The
//! gesture → shot → scoring pipeline lives in plain Rust modules that build and
//! test natively; `web` wires it to a browser canvas.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod gesture;
pub mod render;
pub mod scoring;
pub mod session;
pub mod shot;
pub mod web;

pub use config::{ConfigError, GameConfig, Ring};
pub use render::RenderEvent;
pub use scoring::Outcome;
pub use session::{GameSession, GameState, InputEvent, Layout, Phase};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. module re-instantiated) is harmless.
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())
}

/// Start with a JSON config; missing fields take their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(config)
}
