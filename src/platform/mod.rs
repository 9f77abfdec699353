//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard codes to logical inputs
//! - Wall-clock time
//! - Logger setup

use crate::sim::InputCode;

/// Map a `KeyboardEvent.code` to a logical input
pub fn key_to_input(code: &str) -> Option<InputCode> {
    match code {
        "KeyA" | "ArrowLeft" => Some(InputCode::Left),
        "KeyD" | "ArrowRight" => Some(InputCode::Right),
        "KeyW" | "ArrowUp" => Some(InputCode::Up),
        "KeyS" | "ArrowDown" => Some(InputCode::Down),
        "Space" => Some(InputCode::Fire),
        "KeyP" => Some(InputCode::Pause),
        _ => None,
    }
}

/// Keys whose browser default (scrolling) should be suppressed while playing
pub fn suppresses_default(code: &str) -> bool {
    matches!(
        code,
        "Space" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
    )
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new engine RNG
pub fn entropy_seed() -> u64 {
    now_ms() as u64
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
