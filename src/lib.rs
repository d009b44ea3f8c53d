#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod game;
pub mod players;
pub mod ring;
pub mod snapshot;
pub mod types;

pub use config::{ConfigError, EngineConfig, SimConfig};
pub use game::{Game, GameConfig, GameError, GameState, RoundOutcome};
pub use ring::{Token, TokenId, TokenRing};
pub use snapshot::{Observation, TokenSnapshot, VisibleAlignment, observation_from_state};
pub use types::{Actor, Alignment, Character, Phase, Verdict};
