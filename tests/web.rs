//! Exercises the wasm-bindgen surface. Run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use dice_game::api::DiceGame;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

fn at(arr: &JsValue, idx: u32) -> JsValue {
    Reflect::get(arr, &JsValue::from(idx)).unwrap()
}

#[wasm_bindgen_test]
fn wasm_ready_is_true() {
    assert!(dice_game::wasm_ready());
}

#[wasm_bindgen_test]
fn init_logging_accepts_levels_and_rejects_unknown_ones() {
    assert!(dice_game::api::init_logging(None).is_ok());
    assert!(dice_game::api::init_logging(Some("debug".to_string())).is_ok());
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    assert!(dice_game::api::init_logging(Some("loud".to_string())).is_err());
}

#[wasm_bindgen_test]
fn zero_point_cap_is_refused() {
    let rules = Object::new();
    Reflect::set(&rules, &"max_points".into(), &JsValue::from(0)).unwrap();

    assert!(DiceGame::new(None, rules.into()).is_err());
}

#[wasm_bindgen_test]
fn click_reserve_then_board_places_die() {
    let mut game = DiceGame::new(None, JsValue::UNDEFINED).unwrap();

    let state = game.click_reserve("0").unwrap();
    let selected = get(&state, "selected");
    assert_eq!(get(&selected, "source").as_string().as_deref(), Some("reserve"));
    assert_eq!(get(&selected, "die").as_string().as_deref(), Some("0-0"));

    let state = game.click_board(3, 3).unwrap();
    let cell = at(&at(&get(&state, "cells"), 3), 3);
    assert_eq!(get(&cell, "die_id").as_string().as_deref(), Some("0-0"));
    assert!(get(&state, "selected").is_null());
}

#[wasm_bindgen_test]
fn rejected_move_throws_and_keeps_digest() {
    let mut game = DiceGame::new(Some("0".to_string()), JsValue::UNDEFINED).unwrap();
    game.click_reserve("0").unwrap();
    game.click_board(1, 1).unwrap();
    game.click_reserve("0").unwrap();
    let before = game.digest();

    assert!(game.click_board(1, 1).is_err());
    assert_eq!(game.digest(), before);
}

#[wasm_bindgen_test]
fn seat_cannot_move_out_of_turn() {
    let mut game = DiceGame::new(Some("1".to_string()), JsValue::UNDEFINED).unwrap();

    assert!(game.rotate_plus().is_err());
    assert_eq!(game.current_player(), "0");
}

#[wasm_bindgen_test]
fn apply_move_accepts_relayed_peer_moves() {
    let mut game = DiceGame::new(Some("0".to_string()), JsValue::UNDEFINED).unwrap();
    game.end_turn().unwrap();

    let mv = Object::new();
    Reflect::set(&mv, &"move".into(), &"incVictory".into()).unwrap();
    Reflect::set(&mv, &"playerID".into(), &"1".into()).unwrap();
    let state = game.apply_move("1", mv.into()).unwrap();

    let players = get(&state, "players");
    assert_eq!(get(&at(&players, 1), "victory_points").as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn partial_rules_fall_back_to_defaults_and_win_is_reported() {
    let rules = Object::new();
    Reflect::set(&rules, &"max_points".into(), &JsValue::from(2)).unwrap();
    let mut game = DiceGame::new(None, rules.into()).unwrap();
    assert!(game.gameover().unwrap().is_null());

    game.inc_victory("0").unwrap();
    let state = game.inc_victory("0").unwrap();

    assert_eq!(get(&state, "board_size").as_f64(), Some(7.0));
    let over = game.gameover().unwrap();
    assert_eq!(get(&over, "winner").as_string().as_deref(), Some("0"));
}

#[wasm_bindgen_test]
fn invalid_rules_are_refused() {
    let rules = Object::new();
    Reflect::set(&rules, &"board_size".into(), &JsValue::from(0)).unwrap();

    assert!(DiceGame::new(None, rules.into()).is_err());
}
