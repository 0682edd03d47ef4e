use wasm_bindgen::prelude::*;

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod state;
pub mod types;

pub use config::RuleSet;
pub use error::{ConfigError, InvalidMove, InvariantError, MatchError, RejectReason};
pub use game::GameInstance;
pub use moves::{Move, MoveOutcome, apply_move};
pub use state::MatchState;
pub use types::{GameResult, GameSnapshot, PlayerId};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
