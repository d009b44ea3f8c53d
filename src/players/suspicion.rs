use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::game::action::GameAction;
use crate::game::game::Game;
use crate::players::BaseSeat;
use crate::snapshot::{TokenSnapshot, observation_from_state};
use crate::types::{ActionType, Actor};

/// Player seat that executes whoever its neighbours accuse the most.
///
/// Works from the player view only: alive flags and displayed counts. A token
/// scores the sum of the counts shown by its nearest living neighbours, so a
/// red token wedged between two honest empaths scores at least 2.
#[derive(Debug, Clone)]
pub struct SuspicionSeat {
    rng: RefCell<StdRng>,
    epsilon: Option<f64>,
}

impl SuspicionSeat {
    /// An `epsilon` outside `0.0..=1.0` (or NaN) disables exploration.
    pub fn new(seed: u64, epsilon: Option<f64>) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            epsilon: epsilon.filter(|e| (0.0..=1.0).contains(e)),
        }
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.epsilon
    }
}

fn living_neighbors(tokens: &[TokenSnapshot], idx: usize) -> SmallVec<[usize; 2]> {
    let len = tokens.len();
    let left = (1..len)
        .map(|step| (idx + len - step) % len)
        .find(|&i| tokens[i].alive);
    let right = (1..len).map(|step| (idx + step) % len).find(|&i| tokens[i].alive);

    let mut out = SmallVec::new();
    out.extend(left);
    if right != left {
        out.extend(right);
    }
    out
}

pub fn suspicion(tokens: &[TokenSnapshot], idx: usize) -> u32 {
    living_neighbors(tokens, idx)
        .into_iter()
        .map(|i| u32::from(tokens[i].displayed_count))
        .sum()
}

impl BaseSeat for SuspicionSeat {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction> {
        if actions.len() == 1 {
            return actions.first().cloned();
        }

        let mut rng = self.rng.borrow_mut();
        if let Some(epsilon) = self.epsilon {
            if rng.gen_bool(epsilon) {
                return actions.choose(&mut *rng).cloned();
            }
        }

        let view = observation_from_state(&game.state, Actor::Player);
        let executions: Vec<(u32, &GameAction)> = actions
            .iter()
            .filter(|action| action.action_type == ActionType::Execute)
            .filter_map(|action| {
                let id = action.target()?;
                let idx = view.tokens.iter().position(|token| token.id == id)?;
                Some((suspicion(&view.tokens, idx), action))
            })
            .collect();

        let Some(best) = executions.iter().map(|(score, _)| *score).max() else {
            return actions.choose(&mut *rng).cloned();
        };
        let leaders: Vec<&GameAction> = executions
            .iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, action)| *action)
            .collect();
        leaders.choose(&mut *rng).map(|action| (*action).clone())
    }
}
