use std::collections::BTreeMap;

use serde::Serialize;

use crate::board::Board;
use crate::config::RuleSet;
use crate::error::{ConfigError, InvariantError};
use crate::types::{DieId, GameResult, PlayerId, Position};

pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Die {
    pub id: DieId,
    pub value: u8,
}

impl Die {
    pub fn owner(&self) -> PlayerId {
        self.id.owner
    }

    /// Turns the die one step, wrapping 6 -> 1 and 1 -> 6.
    pub fn rotate(&mut self, delta: i8) {
        let span = (MAX_FACE - MIN_FACE + 1) as i16;
        let zero_based = (self.value as i16 - MIN_FACE as i16 + delta as i16).rem_euclid(span);
        self.value = zero_based as u8 + MIN_FACE;
    }
}

/// Off-board holding areas of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Reserve,
    Exile,
}

impl Pool {
    pub fn other(self) -> Self {
        match self {
            Pool::Reserve => Pool::Exile,
            Pool::Exile => Pool::Reserve,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Player {
    pub reserve: Vec<DieId>,
    pub exile: Vec<DieId>,
    pub trigger_points: u8,
    pub victory_points: u8,
}

impl Player {
    pub fn pool(&self, pool: Pool) -> &[DieId] {
        match pool {
            Pool::Reserve => &self.reserve,
            Pool::Exile => &self.exile,
        }
    }

    pub(crate) fn pool_mut(&mut self, pool: Pool) -> &mut Vec<DieId> {
        match pool {
            Pool::Reserve => &mut self.reserve,
            Pool::Exile => &mut self.exile,
        }
    }
}

/// Where the selected die was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum SelectionSource {
    Board(Position),
    Reserve,
    Exile,
}

impl From<Pool> for SelectionSource {
    fn from(pool: Pool) -> Self {
        match pool {
            Pool::Reserve => SelectionSource::Reserve,
            Pool::Exile => SelectionSource::Exile,
        }
    }
}

/// The die currently "picked up". At most one exists per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    #[serde(flatten)]
    pub source: SelectionSource,
    pub player: PlayerId,
    pub die: DieId,
}

/// Canonical state of one match.
///
/// Dice live in an arena keyed by id; board cells and player pools only
/// hold ids. Every die id is in exactly one place at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub(crate) rules: RuleSet,
    pub(crate) board: Board,
    pub(crate) dice: BTreeMap<DieId, Die>,
    pub(crate) players: [Player; 2],
    pub(crate) selection: Option<Selection>,
}

impl MatchState {
    /// Creates the initial state: empty neutral board, every die in its
    /// owner's reserve with face 1, no points, no selection.
    pub fn new(rules: RuleSet) -> Result<Self, ConfigError> {
        rules.validate()?;

        let mut dice = BTreeMap::new();
        let mut players: [Player; 2] = Default::default();

        for owner in PlayerId::ALL {
            for seq in 0..rules.dice_per_player {
                let id = DieId::new(owner, seq);
                dice.insert(
                    id,
                    Die {
                        id,
                        value: MIN_FACE,
                    },
                );
                players[owner.index()].reserve.push(id);
            }
        }

        Ok(Self {
            rules,
            board: Board::new(rules.board_size),
            dice,
            players,
            selection: None,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.get(&id)
    }

    pub fn dice(&self) -> impl Iterator<Item = &Die> + '_ {
        self.dice.values()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Face value of the selected die.
    pub fn selected_value(&self) -> Option<u8> {
        self.selection
            .and_then(|sel| self.dice.get(&sel.die))
            .map(|die| die.value)
    }

    /// Returns the winner once a player's victory points reach the cap.
    /// Player "0" is checked first.
    pub fn winner(&self) -> Option<GameResult> {
        PlayerId::ALL
            .into_iter()
            .find(|&id| self.player(id).victory_points >= self.rules.max_points)
            .map(|winner| GameResult { winner })
    }

    /// Checks the ownership and range invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen: BTreeMap<DieId, usize> = BTreeMap::new();

        for (pos, cell) in self.board.iter() {
            if let Some(die) = cell.die {
                if !self.dice.contains_key(&die) {
                    return Err(InvariantError::UnknownDieOnCell {
                        row: pos.row,
                        col: pos.col,
                        die,
                    });
                }
                *seen.entry(die).or_default() += 1;
            }
        }

        for owner in PlayerId::ALL {
            let player = self.player(owner);
            for &die in player.reserve.iter().chain(player.exile.iter()) {
                if die.owner != owner {
                    return Err(InvariantError::ForeignDie { die, holder: owner });
                }
                *seen.entry(die).or_default() += 1;
            }
            if player.trigger_points > self.rules.max_points
                || player.victory_points > self.rules.max_points
            {
                return Err(InvariantError::PointsOverCap { player: owner });
            }
        }

        for die in self.dice.values() {
            match seen.get(&die.id).copied().unwrap_or(0) {
                1 => {}
                count => {
                    return Err(InvariantError::Misplaced { die: die.id, count });
                }
            }
            if !(MIN_FACE..=MAX_FACE).contains(&die.value) {
                return Err(InvariantError::FaceOutOfRange {
                    die: die.id,
                    value: die.value,
                });
            }
        }
        if seen.len() != self.dice.len() {
            return Err(InvariantError::DieOutsideArena);
        }

        if let Some(sel) = self.selection {
            if sel.player != sel.die.owner {
                return Err(InvariantError::SelectionOwner {
                    die: sel.die,
                    player: sel.player,
                });
            }
            let in_place = match sel.source {
                SelectionSource::Board(pos) => self.board.occupant(pos) == Some(sel.die),
                SelectionSource::Reserve => self.player(sel.player).reserve.contains(&sel.die),
                SelectionSource::Exile => self.player(sel.player).exile.contains(&sel.die),
            };
            if !in_place {
                return Err(InvariantError::SelectionNotAtSource { die: sel.die });
            }
        }

        Ok(())
    }

    /// CRC32 over a canonical encoding of the whole state. Peers compare
    /// this to detect divergence.
    pub fn digest(&self) -> u32 {
        crc32fast::hash(&self.encode_canonical())
    }

    fn encode_canonical(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(self.rules.board_size);
        out.push(self.rules.dice_per_player);
        out.push(self.rules.max_points);

        for (_, cell) in self.board.iter() {
            out.push(cell.kind.code());
            push_die_ref(&mut out, cell.die);
        }

        for die in self.dice.values() {
            push_die_ref(&mut out, Some(die.id));
            out.push(die.value);
        }

        for player in &self.players {
            for list in [&player.reserve, &player.exile] {
                out.extend_from_slice(&(list.len() as u16).to_le_bytes());
                for id in list {
                    push_die_ref(&mut out, Some(*id));
                }
            }
            out.push(player.trigger_points);
            out.push(player.victory_points);
        }

        match self.selection {
            None => out.push(0),
            Some(sel) => {
                match sel.source {
                    SelectionSource::Board(pos) => out.extend_from_slice(&[1, pos.row, pos.col]),
                    SelectionSource::Reserve => out.push(2),
                    SelectionSource::Exile => out.push(3),
                }
                out.push(sel.player.index() as u8);
                push_die_ref(&mut out, Some(sel.die));
            }
        }

        out
    }
}

fn push_die_ref(out: &mut Vec<u8>, die: Option<DieId>) {
    match die {
        Some(id) => out.extend_from_slice(&[id.owner.index() as u8, id.seq]),
        None => out.extend_from_slice(&[0xFF, 0xFF]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellType;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn initial_state_is_correct() {
        let state = MatchState::new(RuleSet::default()).unwrap();

        assert_eq!(state.dice().count(), 30);
        assert!(state.dice().all(|die| die.value == 1));
        for owner in PlayerId::ALL {
            let player = state.player(owner);
            assert_eq!(player.reserve.len(), 15);
            assert!(player.exile.is_empty());
            assert_eq!(player.trigger_points, 0);
            assert_eq!(player.victory_points, 0);
            assert_eq!(player.reserve[0], DieId::new(owner, 0));
            assert_eq!(player.reserve[14], DieId::new(owner, 14));
        }
        assert_eq!(state.board().occupied_count(), 0);
        assert!(state.selection().is_none());
        assert!(state.winner().is_none());
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn new_refuses_invalid_rules() {
        let no_points = RuleSet {
            max_points: 0,
            ..RuleSet::default()
        };
        let no_board = RuleSet {
            board_size: 0,
            ..RuleSet::default()
        };

        assert_eq!(MatchState::new(no_points), Err(ConfigError::MaxPoints));
        assert!(matches!(
            MatchState::new(no_board),
            Err(ConfigError::BoardSize { got: 0, .. })
        ));
    }

    #[test]
    fn invariants_detect_die_in_wrong_players_pool() {
        let mut state = MatchState::new(RuleSet::default()).unwrap();
        let die = state.players[0].reserve.remove(0);
        state.players[1].exile.push(die);

        assert_eq!(
            state.check_invariants(),
            Err(InvariantError::ForeignDie {
                die,
                holder: PlayerId::One
            })
        );
    }

    #[test]
    fn rotate_wraps_at_both_ends() {
        let mut die = Die {
            id: DieId::new(PlayerId::Zero, 0),
            value: 6,
        };
        die.rotate(1);
        assert_eq!(die.value, 1);
        die.rotate(-1);
        assert_eq!(die.value, 6);

        for _ in 0..6 {
            die.rotate(-1);
        }
        assert_eq!(die.value, 6);
    }

    #[test]
    fn winner_checks_player_zero_first() {
        let mut state = MatchState::new(RuleSet::default()).unwrap();
        state.player_mut(PlayerId::One).victory_points = 10;
        assert_eq!(
            state.winner(),
            Some(GameResult {
                winner: PlayerId::One
            })
        );

        state.player_mut(PlayerId::Zero).victory_points = 10;
        assert_eq!(
            state.winner(),
            Some(GameResult {
                winner: PlayerId::Zero
            })
        );
    }

    #[test]
    fn invariants_detect_duplicated_die() {
        let mut state = MatchState::new(RuleSet::default()).unwrap();
        let id = DieId::new(PlayerId::Zero, 0);
        if let Some(cell) = state.board.cell_mut(pos(0, 0)) {
            cell.die = Some(id);
        }

        let err = state.check_invariants().unwrap_err();
        assert_eq!(err, InvariantError::Misplaced { die: id, count: 2 });
    }

    #[test]
    fn invariants_detect_stale_selection() {
        let mut state = MatchState::new(RuleSet::default()).unwrap();
        state.selection = Some(Selection {
            source: SelectionSource::Board(pos(3, 3)),
            player: PlayerId::Zero,
            die: DieId::new(PlayerId::Zero, 0),
        });

        let err = state.check_invariants().unwrap_err();
        assert_eq!(
            err,
            InvariantError::SelectionNotAtSource {
                die: DieId::new(PlayerId::Zero, 0)
            }
        );
    }

    #[test]
    fn digest_tracks_state_changes() {
        let a = MatchState::new(RuleSet::default()).unwrap();
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());

        if let Some(cell) = b.board.cell_mut(pos(1, 2)) {
            cell.kind = CellType::Castle;
        }
        assert_ne!(a.digest(), b.digest());

        let mut c = a.clone();
        c.player_mut(PlayerId::One).trigger_points = 1;
        assert_ne!(a.digest(), c.digest());
    }
}
