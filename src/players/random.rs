use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::game::action::GameAction;
use crate::game::game::Game;
use crate::players::BaseSeat;
use crate::types::ActionType;

#[derive(Debug, Clone)]
pub struct RandomSeat {
    rng: RefCell<StdRng>,
    spare_demon: bool,
}

impl RandomSeat {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
            spare_demon: false,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            spare_demon: false,
        }
    }

    /// A moderator that never kills its own demon unless nothing else is left.
    pub fn sparing_demon(mut self) -> Self {
        self.spare_demon = true;
        self
    }
}

impl Default for RandomSeat {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseSeat for RandomSeat {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction> {
        let mut rng = self.rng.borrow_mut();
        if self.spare_demon {
            let demon = game.state.ring().demon().map(|token| token.id);
            let spared: Vec<&GameAction> = actions
                .iter()
                .filter(|action| !(action.action_type == ActionType::Kill && action.target() == demon))
                .collect();
            if let Some(action) = spared.choose(&mut *rng) {
                return Some((*action).clone());
            }
        }
        actions.choose(&mut *rng).cloned()
    }
}
