//! Move handlers: the only code that mutates a [`MatchState`].
//!
//! Every handler validates before it mutates, so an `Err(InvalidMove)`
//! always leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidMove, RejectReason};
use crate::state::{MatchState, Pool, Selection, SelectionSource};
use crate::types::{PlayerId, Position, deserialize_seat};

/// A player action, as dispatched by the UI or received from the peer.
///
/// Player arguments are optional: an id other than `"0"` / `"1"` arrives
/// as `None` and is handled per move (ignored or rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "move", rename_all = "camelCase")]
pub enum Move {
    ClickBoard {
        row: u8,
        col: u8,
    },
    ClickReserve {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    ClickExile {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    RotatePlus,
    RotateMinus,
    IncTrigger {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    DecTrigger {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    IncVictory {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    DecVictory {
        #[serde(rename = "playerID", default, deserialize_with = "deserialize_seat")]
        player: Option<PlayerId>,
    },
    EndTurn,
}

impl Move {
    pub fn name(&self) -> &'static str {
        match self {
            Move::ClickBoard { .. } => "clickBoard",
            Move::ClickReserve { .. } => "clickReserve",
            Move::ClickExile { .. } => "clickExile",
            Move::RotatePlus => "rotatePlus",
            Move::RotateMinus => "rotateMinus",
            Move::IncTrigger { .. } => "incTrigger",
            Move::DecTrigger { .. } => "decTrigger",
            Move::IncVictory { .. } => "incVictory",
            Move::DecVictory { .. } => "decVictory",
            Move::EndTurn => "endTurn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    /// No local change; the turn-order collaborator must advance the turn.
    TurnEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Trigger,
    Victory,
}

pub fn apply_move(state: &mut MatchState, mv: Move) -> Result<MoveOutcome, InvalidMove> {
    let result = match mv {
        Move::ClickBoard { row, col } => click_board(state, row, col),
        Move::ClickReserve { player } => click_reserve(state, player),
        Move::ClickExile { player } => click_exile(state, player),
        Move::RotatePlus => {
            rotate_selected(state, 1);
            Ok(())
        }
        Move::RotateMinus => {
            rotate_selected(state, -1);
            Ok(())
        }
        Move::IncTrigger { player } => {
            adjust_points(state, player, Counter::Trigger, 1);
            Ok(())
        }
        Move::DecTrigger { player } => {
            adjust_points(state, player, Counter::Trigger, -1);
            Ok(())
        }
        Move::IncVictory { player } => {
            adjust_points(state, player, Counter::Victory, 1);
            Ok(())
        }
        Move::DecVictory { player } => {
            adjust_points(state, player, Counter::Victory, -1);
            Ok(())
        }
        Move::EndTurn => return Ok(MoveOutcome::TurnEnded),
    };

    match result {
        Ok(()) => {
            log::trace!("applied {}", mv.name());
            debug_assert_eq!(state.check_invariants(), Ok(()));
            Ok(MoveOutcome::Applied)
        }
        Err(err) => {
            log::debug!("rejected {}: {}", mv.name(), err.reason);
            Err(err)
        }
    }
}

/// Board click, resolved over (target occupant, selection, selection source).
pub fn click_board(state: &mut MatchState, row: u8, col: u8) -> Result<(), InvalidMove> {
    let target = Position::new(row, col);
    let cell = state
        .board
        .cell(target)
        .copied()
        .ok_or(RejectReason::OutOfBounds { row, col })?;

    match (cell.die, state.selection) {
        (None, Some(sel)) => drop_selected(state, sel, target),
        (None, None) => {
            if let Some(cell) = state.board.cell_mut(target) {
                cell.kind = cell.kind.next();
            }
            Ok(())
        }
        (Some(_), Some(sel)) if sel.source == SelectionSource::Board(target) => {
            state.selection = None;
            Ok(())
        }
        (Some(die), None) => {
            state.selection = Some(Selection {
                source: SelectionSource::Board(target),
                player: die.owner,
                die,
            });
            Ok(())
        }
        // A different die is selected and the target is taken: always rejected.
        (Some(_), Some(sel)) => match sel.source {
            SelectionSource::Reserve | SelectionSource::Exile => {
                Err(RejectReason::OccupiedTarget.into())
            }
            SelectionSource::Board(origin) if state.board.occupant(origin) != Some(sel.die) => {
                Err(RejectReason::StaleSelection.into())
            }
            SelectionSource::Board(_) => Err(RejectReason::OccupiedTarget.into()),
        },
    }
}

/// Moves the selected die onto the empty `target` cell.
fn drop_selected(
    state: &mut MatchState,
    sel: Selection,
    target: Position,
) -> Result<(), InvalidMove> {
    match sel.source {
        SelectionSource::Board(origin) => {
            if state.board.occupant(origin) != Some(sel.die) {
                return Err(RejectReason::StaleSelection.into());
            }
            state.board.take(origin);
        }
        SelectionSource::Reserve | SelectionSource::Exile => {
            let pool = if sel.source == SelectionSource::Reserve {
                Pool::Reserve
            } else {
                Pool::Exile
            };
            let idx = state
                .player(sel.player)
                .pool(pool)
                .iter()
                .position(|&id| id == sel.die)
                .ok_or(RejectReason::StaleSelection)?;
            state.player_mut(sel.player).pool_mut(pool).remove(idx);
        }
    }

    state.board.put(target, sel.die);
    state.selection = None;
    Ok(())
}

pub fn click_reserve(state: &mut MatchState, player: Option<PlayerId>) -> Result<(), InvalidMove> {
    click_pool(state, player, Pool::Reserve)
}

pub fn click_exile(state: &mut MatchState, player: Option<PlayerId>) -> Result<(), InvalidMove> {
    click_pool(state, player, Pool::Exile)
}

/// Click on a player's reserve or exile.
///
/// Without a selection this picks up the head of that pool. With one, it
/// drops the selected die into the pool, or toggles the selection off when
/// it was picked from this same pool.
fn click_pool(
    state: &mut MatchState,
    player: Option<PlayerId>,
    pool: Pool,
) -> Result<(), InvalidMove> {
    let Some(sel) = state.selection else {
        if let Some(id) = player {
            if let Some(&head) = state.player(id).pool(pool).first() {
                state.selection = Some(Selection {
                    source: pool.into(),
                    player: id,
                    die: head,
                });
            }
        }
        return Ok(());
    };

    if player != Some(sel.player) {
        return Err(RejectReason::NotOwner.into());
    }

    match sel.source {
        SelectionSource::Board(origin) => {
            if state.board.occupant(origin) != Some(sel.die) {
                return Err(RejectReason::StaleSelection.into());
            }
            state.board.take(origin);
        }
        source if source == SelectionSource::from(pool) => {}
        _ => {
            let from = pool.other();
            let idx = state
                .player(sel.player)
                .pool(from)
                .iter()
                .position(|&id| id == sel.die)
                .ok_or(RejectReason::StaleSelection)?;
            state.player_mut(sel.player).pool_mut(from).remove(idx);
        }
    }

    if sel.source != SelectionSource::from(pool) {
        state.player_mut(sel.player).pool_mut(pool).push(sel.die);
    }
    state.selection = None;
    Ok(())
}

/// Turns the selected die by `delta`. No-op without a selection.
pub fn rotate_selected(state: &mut MatchState, delta: i8) {
    let Some(sel) = state.selection else {
        return;
    };
    if let Some(die) = state.dice.get_mut(&sel.die) {
        die.rotate(delta);
    }
}

/// Adds `delta` to a counter, clamped to `[0, max_points]`. Unknown
/// players are ignored.
pub fn adjust_points(
    state: &mut MatchState,
    player: Option<PlayerId>,
    counter: Counter,
    delta: i8,
) {
    let Some(id) = player else {
        return;
    };
    let max = state.rules.max_points;
    let p = state.player_mut(id);
    let slot = match counter {
        Counter::Trigger => &mut p.trigger_points,
        Counter::Victory => &mut p.victory_points,
    };
    *slot = (*slot as i16 + delta as i16).clamp(0, max as i16) as u8;
}
