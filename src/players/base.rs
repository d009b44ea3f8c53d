use crate::game::{action::GameAction, game::Game};

/// One side of the table. The engine asks the moderator seat or the player
/// seat depending on the phase, and only ever offers legal actions.
pub trait BaseSeat {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction>;
}
