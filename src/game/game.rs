use tracing::warn;
use uuid::Uuid;

use crate::game::action::GameAction;
use crate::game::{GameConfig, GameError, GameState, StepOutcome};
use crate::players::BaseSeat;
use crate::types::{Actor, Verdict};

/// Upper bound on accepted actions in one automated game.
pub const ACTIONS_LIMIT: usize = 10_000;

pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            seed: config.seed,
            id: Uuid::new_v4(),
            state: GameState::new(config),
        }
    }

    /// Drives both seats until the game ends, a seat passes, or the action
    /// limit is hit.
    pub fn play<M: BaseSeat, P: BaseSeat>(&mut self, moderator: &M, player: &P) -> Verdict {
        let mut accepted = 0;
        while !self.state.is_over() && accepted < ACTIONS_LIMIT {
            match self.play_tick(moderator, player) {
                Some(_) => accepted += 1,
                None => break,
            }
        }
        self.verdict()
    }

    pub fn play_tick<M: BaseSeat, P: BaseSeat>(
        &mut self,
        moderator: &M,
        player: &P,
    ) -> Option<GameAction> {
        let legal_actions = self.state.legal_actions();
        if legal_actions.is_empty() {
            return None;
        }

        let action = match self.state.current_actor() {
            Actor::Moderator => moderator.decide(self, legal_actions),
            Actor::Player => player.decide(self, legal_actions),
        }?;

        match self.execute(action.clone()) {
            Ok(_) => Some(action),
            Err(err) => {
                warn!(%err, action = ?action.action_type, "seat chose a rejected action");
                None
            }
        }
    }

    pub fn execute(&mut self, action: GameAction) -> Result<StepOutcome, GameError> {
        self.state.step(action)
    }

    pub fn verdict(&self) -> Verdict {
        self.state.verdict()
    }

    pub fn copy(&self) -> Self {
        Self {
            seed: self.seed,
            id: self.id,
            state: self.state.clone(),
        }
    }
}
