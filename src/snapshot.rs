use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::game::GameState;
use crate::ring::{Token, TokenId, TokenRing};
use crate::types::{Actor, Alignment, Character, Phase, Verdict};

/// Alignment as far as the viewer is allowed to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibleAlignment {
    Blue,
    Red,
    Unknown,
}

impl From<Alignment> for VisibleAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Blue => VisibleAlignment::Blue,
            Alignment::Red => VisibleAlignment::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub id: TokenId,
    pub alive: bool,
    pub alignment: VisibleAlignment,
    /// `None` for the player view.
    pub character: Option<Character>,
    pub displayed_count: u8,
    /// `None` for the player view.
    pub intoxicated: Option<bool>,
}

impl TokenSnapshot {
    fn for_moderator(token: &Token) -> Self {
        Self {
            id: token.id,
            alive: token.alive,
            alignment: token.alignment.into(),
            character: Some(token.character),
            displayed_count: token.displayed_count,
            intoxicated: Some(token.intoxicated),
        }
    }

    fn for_player(token: &Token) -> Self {
        Self {
            id: token.id,
            alive: token.alive,
            alignment: VisibleAlignment::Unknown,
            character: None,
            displayed_count: token.displayed_count,
            intoxicated: None,
        }
    }
}

/// Projects the ring for `viewer`. The player view never carries alignment,
/// character or intoxication, for living or dead tokens, and shows the
/// `concealed` night victim as still alive. The moderator always sees the truth.
pub fn project(ring: &TokenRing, viewer: Actor, concealed: Option<TokenId>) -> Vec<TokenSnapshot> {
    match viewer {
        Actor::Moderator => ring.iter().map(TokenSnapshot::for_moderator).collect(),
        Actor::Player => ring
            .iter()
            .map(|token| {
                let mut snapshot = TokenSnapshot::for_player(token);
                if concealed == Some(token.id) {
                    snapshot.alive = true;
                }
                snapshot
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub session_id: Uuid,
    pub viewer: Actor,
    pub phase: Phase,
    pub round: u32,
    pub verdict: Verdict,
    pub pending_red: Option<TokenId>,
    pub tokens: Vec<TokenSnapshot>,
}

pub fn observation_from_state(state: &GameState, viewer: Actor) -> Observation {
    let pending_red = match viewer {
        Actor::Moderator => state.pending_red(),
        Actor::Player => None,
    };
    Observation {
        session_id: state.session_id(),
        viewer,
        phase: state.phase(),
        round: state.round(),
        verdict: state.verdict(),
        pending_red,
        tokens: state.snapshot(viewer),
    }
}
