use serde::{Deserialize, Serialize};

use crate::ring::TokenId;
use crate::types::{ActionType, Actor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameAction {
    pub actor: Actor,
    pub action_type: ActionType,
    pub payload: ActionPayload,
}

impl GameAction {
    /// Builds an action issued by the actor that owns `action_type`.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            actor: action_type.actor(),
            action_type,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn by(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    pub fn start_setup(tokens_count: usize, red_count: usize) -> Self {
        Self::new(ActionType::StartSetup).with_payload(ActionPayload::Counts {
            tokens_count,
            red_count,
        })
    }

    pub fn select_red(id: TokenId) -> Self {
        Self::new(ActionType::SelectRed).with_payload(ActionPayload::Token(id))
    }

    pub fn select_demon(id: TokenId) -> Self {
        Self::new(ActionType::SelectDemon).with_payload(ActionPayload::Token(id))
    }

    pub fn set_disinformation(id: TokenId, value: u8) -> Self {
        Self::new(ActionType::SetDisinformation)
            .with_payload(ActionPayload::Disinformation { token: id, value })
    }

    pub fn execute(id: TokenId) -> Self {
        Self::new(ActionType::Execute).with_payload(ActionPayload::Token(id))
    }

    pub fn kill(id: TokenId) -> Self {
        Self::new(ActionType::Kill).with_payload(ActionPayload::Token(id))
    }

    pub fn set_intoxicated(id: TokenId, intoxicated: bool) -> Self {
        Self::new(ActionType::SetIntoxicated).with_payload(ActionPayload::Intoxication {
            token: id,
            intoxicated,
        })
    }

    pub fn target(&self) -> Option<TokenId> {
        match self.payload {
            ActionPayload::Token(id)
            | ActionPayload::Disinformation { token: id, .. }
            | ActionPayload::Intoxication { token: id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionPayload {
    #[default]
    None,
    Token(TokenId),
    Counts {
        tokens_count: usize,
        red_count: usize,
    },
    Disinformation {
        token: TokenId,
        value: u8,
    },
    Intoxication {
        token: TokenId,
        intoxicated: bool,
    },
}
