//! Rule parameters for a match.
//!
//! The UI may pass a partial object; missing fields fall back to the
//! standard 7×7 board with 15 dice per player and a 10 point cap.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_BOARD_SIZE: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Width and height of the square board.
    #[serde(default = "default_board_size")]
    pub board_size: u8,
    /// Dice created per player at setup, all starting in the reserve.
    #[serde(default = "default_dice_per_player")]
    pub dice_per_player: u8,
    /// Upper clamp for trigger and victory points; reaching it in victory
    /// points wins the match.
    #[serde(default = "default_max_points")]
    pub max_points: u8,
}

fn default_board_size() -> u8 {
    7
}

fn default_dice_per_player() -> u8 {
    15
}

fn default_max_points() -> u8 {
    10
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            dice_per_player: default_dice_per_player(),
            max_points: default_max_points(),
        }
    }
}

impl RuleSet {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize {
                got: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        if self.max_points == 0 {
            return Err(ConfigError::MaxPoints);
        }
        Ok(())
    }
}
