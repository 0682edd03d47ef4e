use crate::config::RuleSet;
use crate::error::{ConfigError, MatchError};
use crate::moves::{Move, MoveOutcome, apply_move};
use crate::state::MatchState;
use crate::types::{CellView, GameResult, GameSnapshot, PlayerId, PlayerView};

/// Decides who plays next when a turn ends.
pub trait TurnOrder: Send + Sync {
    fn next_player(&self, current: PlayerId, turn: u32) -> PlayerId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlternatingTurns;

impl TurnOrder for AlternatingTurns {
    fn next_player(&self, current: PlayerId, _turn: u32) -> PlayerId {
        current.opponent()
    }
}

/// One running match: the reducer state plus turn bookkeeping and the
/// latched result.
pub struct GameInstance {
    state: MatchState,
    pub current_player: PlayerId,
    pub turn: u32,
    pub result: Option<GameResult>,
    turn_order: Box<dyn TurnOrder>,
}

impl GameInstance {
    /// Starts a match. Fails when `rules` do not pass [`RuleSet::validate`].
    pub fn new(rules: RuleSet, turn_order: Box<dyn TurnOrder>) -> Result<Self, ConfigError> {
        let state = MatchState::new(rules)?;
        Ok(Self {
            state,
            current_player: PlayerId::Zero,
            turn: 1,
            result: None,
            turn_order,
        })
    }

    pub fn new_with_default_turn_order(rules: RuleSet) -> Result<Self, ConfigError> {
        Self::new(rules, Box::new(AlternatingTurns))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Applies `mv` on behalf of `by`, then evaluates the win condition.
    pub fn make_move(&mut self, by: PlayerId, mv: Move) -> Result<MoveOutcome, MatchError> {
        if self.is_game_over() {
            return Err(MatchError::GameOver);
        }
        if by != self.current_player {
            return Err(MatchError::NotYourTurn {
                player: by,
                current: self.current_player,
            });
        }

        let outcome = apply_move(&mut self.state, mv)?;

        if outcome == MoveOutcome::TurnEnded {
            self.end_turn();
        }

        if let Some(result) = self.state.winner() {
            log::info!("match over: player {} wins", result.winner);
            self.result = Some(result);
        }

        Ok(outcome)
    }

    /// Moves on behalf of whoever holds the turn.
    pub fn make_move_as_current(&mut self, mv: Move) -> Result<MoveOutcome, MatchError> {
        self.make_move(self.current_player, mv)
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        let board = self.state.board();
        let size = board.size() as usize;
        let mut cells: Vec<Vec<CellView>> = (0..size).map(|_| Vec::with_capacity(size)).collect();

        for (pos, cell) in board.iter() {
            let die = cell.die.and_then(|id| self.state.die(id));
            cells[pos.row as usize].push(CellView {
                kind: cell.kind,
                die_id: cell.die,
                die_value: die.map(|d| d.value),
                die_owner: die.map(|d| d.owner()),
            });
        }

        let players = PlayerId::ALL
            .into_iter()
            .map(|id| {
                let player = self.state.player(id);
                PlayerView {
                    id,
                    reserve: player.reserve.clone(),
                    exile: player.exile.clone(),
                    trigger_points: player.trigger_points,
                    victory_points: player.victory_points,
                }
            })
            .collect();

        GameSnapshot {
            board_size: board.size(),
            cells,
            players,
            selected: self.state.selection().copied(),
            selected_value: self.state.selected_value(),
            current_player: self.current_player,
            turn: self.turn,
            gameover: self.result,
        }
    }

    pub fn game_result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn digest(&self) -> u32 {
        self.state.digest()
    }

    fn end_turn(&mut self) {
        let next = self.turn_order.next_player(self.current_player, self.turn);
        log::debug!(
            "turn {} ends: player {} -> player {}",
            self.turn,
            self.current_player,
            next
        );
        self.current_player = next;
        self.turn += 1;
    }
}
