use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParsePlayerIdError;
use crate::state::Selection;

/// One of the two seats. Crosses the JS boundary as `"0"` / `"1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::Zero, PlayerId::One];

    pub fn index(self) -> usize {
        match self {
            PlayerId::Zero => 0,
            PlayerId::One => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::Zero => PlayerId::One,
            PlayerId::One => PlayerId::Zero,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::Zero => "0",
            PlayerId::One => "1",
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerId {
    type Err = ParsePlayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(PlayerId::Zero),
            "1" => Ok(PlayerId::One),
            other => Err(ParsePlayerIdError(other.to_string())),
        }
    }
}

/// Reads a player id coming from the UI. Anything other than `"0"` / `"1"`
/// (including `null`) becomes `None` instead of failing the whole move.
pub(crate) fn deserialize_seat<'de, D>(deserializer: D) -> Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Identity of a die: owning player plus creation sequence number.
/// Rendered as `"<player>-<seq>"`, e.g. `"0-14"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DieId {
    pub owner: PlayerId,
    pub seq: u8,
}

impl DieId {
    pub fn new(owner: PlayerId, seq: u8) -> Self {
        Self { owner, seq }
    }
}

impl fmt::Display for DieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.seq)
    }
}

impl Serialize for DieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Terrain of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    #[default]
    Neutral,
    Castle,
    Camp,
    RedPortal,
    BluePortal,
    Demon,
}

impl CellType {
    /// Click order on an empty cell.
    pub const CYCLE: [CellType; 6] = [
        CellType::Neutral,
        CellType::Castle,
        CellType::Camp,
        CellType::RedPortal,
        CellType::BluePortal,
        CellType::Demon,
    ];

    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|&t| t == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            CellType::Neutral => 0,
            CellType::Castle => 1,
            CellType::Camp => 2,
            CellType::RedPortal => 3,
            CellType::BluePortal => 4,
            CellType::Demon => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub kind: CellType,
    pub die_id: Option<DieId>,
    pub die_value: Option<u8>,
    pub die_owner: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub reserve: Vec<DieId>,
    pub exile: Vec<DieId>,
    pub trigger_points: u8,
    pub victory_points: u8,
}

/// Public match state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board_size: u8,
    /// Row-major: `cells[row][col]`.
    pub cells: Vec<Vec<CellView>>,
    /// Indexed by seat: `players[0]` is player `"0"`.
    pub players: Vec<PlayerView>,
    pub selected: Option<Selection>,
    /// Face value of the selected die, if any.
    pub selected_value: Option<u8>,
    pub current_player: PlayerId,
    pub turn: u32,
    pub gameover: Option<GameResult>,
}

/// Final result once a player reaches the victory threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: PlayerId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_type_cycles_through_all_kinds_and_wraps() {
        let mut kind = CellType::Neutral;
        let mut seen = Vec::new();
        for _ in 0..CellType::CYCLE.len() {
            kind = kind.next();
            seen.push(kind);
        }

        assert_eq!(
            seen,
            vec![
                CellType::Castle,
                CellType::Camp,
                CellType::RedPortal,
                CellType::BluePortal,
                CellType::Demon,
                CellType::Neutral,
            ]
        );
    }

    #[test]
    fn player_id_parses_only_known_seats() {
        assert_eq!("0".parse::<PlayerId>(), Ok(PlayerId::Zero));
        assert_eq!("1".parse::<PlayerId>(), Ok(PlayerId::One));

        let err = "2".parse::<PlayerId>().unwrap_err();
        assert!(err.to_string().contains("\"2\""));
    }

    #[test]
    fn die_id_displays_owner_and_sequence() {
        assert_eq!(DieId::new(PlayerId::One, 14).to_string(), "1-14");
        assert_eq!(DieId::new(PlayerId::Zero, 0).to_string(), "0-0");
    }

    #[test]
    fn die_ids_order_by_owner_then_sequence() {
        let a = DieId::new(PlayerId::Zero, 14);
        let b = DieId::new(PlayerId::One, 0);
        assert!(a < b);
        assert!(DieId::new(PlayerId::Zero, 2) < DieId::new(PlayerId::Zero, 10));
    }
}
