//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (pool order is spawn order)
//! - No rendering or platform dependencies

pub mod board;
pub mod collision;
pub mod entities;
pub mod input;
pub mod puzzle;
pub mod shooter;
pub mod state;
pub mod tetromino;

pub use board::{Board, Cell};
pub use collision::{Bounds, Rect, colliding, overlaps};
pub use entities::{Bullet, Enemy, Particle, Player, PowerUp, PowerUpKind, Star};
pub use input::{InputCode, InputSet};
pub use puzzle::PuzzleState;
pub use shooter::ShooterState;
pub use state::{Color, GameEvent, GamePhase};
pub use tetromino::{Piece, Shape, TetrominoKind};
