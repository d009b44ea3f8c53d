pub mod action;
pub mod game;
pub mod info;
pub mod roles;
pub mod state;
pub mod win;

pub use action::{ActionPayload, GameAction};
pub use game::Game;
pub use info::{DisinformationQueue, MAX_NEIGHBOR_COUNT, ValueError};
pub use roles::{RoleAssignment, SelectionError};
pub use state::{
    GameConfig, GameError, GameEvent, GamePhase, GameState, Reentry, RoundOutcome, SetupError,
    StepOutcome, TokenError,
};
