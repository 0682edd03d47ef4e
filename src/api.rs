//! JavaScript-facing handle around a [`GameInstance`].
//!
//! Every move method returns the fresh snapshot on success and throws an
//! `Error` carrying the rejection message otherwise.

use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::RuleSet;
use crate::game::GameInstance;
use crate::moves::Move;
use crate::types::PlayerId;

/// Routes `log` records to the browser console. `level` is one of
/// `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"` (default `"info"`).
/// Calling it again only changes the level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsValue> {
    let level = parse_level(level.as_deref()).map_err(to_js_error)?;
    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(level).is_ok() {
            return Ok(());
        }
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}

fn parse_level(level: Option<&str>) -> Result<log::Level, log::ParseLevelError> {
    level.map_or(Ok(log::Level::Info), log::Level::from_str)
}

#[wasm_bindgen]
pub struct DiceGame {
    game: GameInstance,
    /// Local seat. `None` plays as whoever holds the turn (hot-seat).
    seat: Option<PlayerId>,
}

#[wasm_bindgen]
impl DiceGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seat: Option<String>, rules: JsValue) -> Result<DiceGame, JsValue> {
        let seat = seat
            .map(|s| s.parse::<PlayerId>())
            .transpose()
            .map_err(to_js_error)?;
        let rules: RuleSet = if rules.is_undefined() || rules.is_null() {
            RuleSet::default()
        } else {
            serde_wasm_bindgen::from_value(rules)?
        };

        Ok(Self {
            game: GameInstance::new_with_default_turn_order(rules).map_err(to_js_error)?,
            seat,
        })
    }

    #[wasm_bindgen(js_name = clickBoard)]
    pub fn click_board(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        self.dispatch(Move::ClickBoard { row, col })
    }

    #[wasm_bindgen(js_name = clickReserve)]
    pub fn click_reserve(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::ClickReserve {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = clickExile)]
    pub fn click_exile(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::ClickExile {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = rotatePlus)]
    pub fn rotate_plus(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Move::RotatePlus)
    }

    #[wasm_bindgen(js_name = rotateMinus)]
    pub fn rotate_minus(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Move::RotateMinus)
    }

    #[wasm_bindgen(js_name = incTrigger)]
    pub fn inc_trigger(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::IncTrigger {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = decTrigger)]
    pub fn dec_trigger(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::DecTrigger {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = incVictory)]
    pub fn inc_victory(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::IncVictory {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = decVictory)]
    pub fn dec_victory(&mut self, player: &str) -> Result<JsValue, JsValue> {
        self.dispatch(Move::DecVictory {
            player: seat_arg(player),
        })
    }

    #[wasm_bindgen(js_name = endTurn)]
    pub fn end_turn(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Move::EndTurn)
    }

    /// Applies a move relayed by the peer, e.g.
    /// `{ move: "clickBoard", row: 3, col: 3 }`, on behalf of `player`.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, player: &str, mv: JsValue) -> Result<JsValue, JsValue> {
        let by = player.parse::<PlayerId>().map_err(to_js_error)?;
        let mv: Move = serde_wasm_bindgen::from_value(mv)?;
        self.game.make_move(by, mv).map_err(to_js_error)?;
        self.state()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.game.to_snapshot())
    }

    /// `null` while the match runs, `{ winner }` afterwards.
    pub fn gameover(&self) -> Result<JsValue, JsValue> {
        match self.game.game_result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> String {
        self.game.current_player.to_string()
    }

    pub fn digest(&self) -> u32 {
        self.game.digest()
    }
}

impl DiceGame {
    fn dispatch(&mut self, mv: Move) -> Result<JsValue, JsValue> {
        let by = self.seat.unwrap_or(self.game.current_player);
        self.game.make_move(by, mv).map_err(to_js_error)?;
        self.state()
    }
}

fn seat_arg(player: &str) -> Option<PlayerId> {
    player.parse().ok()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_maps_as_objects(true)
        .serialize_missing_as_null(true);
    Ok(value.serialize(&serializer)?)
}

fn to_js_error(err: impl Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(parse_level(None), Ok(log::Level::Info));
        assert_eq!(parse_level(Some("debug")), Ok(log::Level::Debug));
        assert_eq!(parse_level(Some("WARN")), Ok(log::Level::Warn));
        assert!(parse_level(Some("loud")).is_err());
    }
}
