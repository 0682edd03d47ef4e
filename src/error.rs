use thiserror::Error;

use crate::types::{DieId, PlayerId};

/// Why a move was refused. Carried by [`InvalidMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("target cell is already occupied")]
    OccupiedTarget,
    #[error("selected die belongs to another player")]
    NotOwner,
    #[error("selected die is no longer at its recorded location")]
    StaleSelection,
}

/// The only error a move handler returns.
///
/// Contract: when a handler returns `InvalidMove` the match state is
/// exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid move: {reason}")]
pub struct InvalidMove {
    pub reason: RejectReason,
}

impl From<RejectReason> for InvalidMove {
    fn from(reason: RejectReason) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Invalid(#[from] InvalidMove),
    #[error("match is already over")]
    GameOver,
    #[error("player {player} cannot move during player {current}'s turn")]
    NotYourTurn { player: PlayerId, current: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size must be between 1 and {max}, got {got}")]
    BoardSize { got: u8, max: u8 },
    #[error("max points must be at least 1")]
    MaxPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown player id {0:?}")]
pub struct ParsePlayerIdError(pub String);

/// A broken ownership or range invariant of a match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("cell ({row}, {col}) references unknown die {die}")]
    UnknownDieOnCell { row: u8, col: u8, die: DieId },
    #[error("die {die} is held by player {holder}")]
    ForeignDie { die: DieId, holder: PlayerId },
    #[error("player {player} points exceed the cap")]
    PointsOverCap { player: PlayerId },
    #[error("die {die} found in {count} locations")]
    Misplaced { die: DieId, count: usize },
    #[error("die {die} has face {value}")]
    FaceOutOfRange { die: DieId, value: u8 },
    #[error("a location references a die outside the arena")]
    DieOutsideArena,
    #[error("selection of {die} credited to player {player}")]
    SelectionOwner { die: DieId, player: PlayerId },
    #[error("selected die {die} is not at its source")]
    SelectionNotAtSource { die: DieId },
}
