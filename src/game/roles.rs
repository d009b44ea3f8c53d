use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};
use tracing::info;

use crate::ring::{TokenId, TokenRing};
use crate::types::{Character, Phase};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("token {id} is outside the table (1..={tokens_count})")]
    OutOfRange { id: TokenId, tokens_count: usize },
    #[error("token {0} was already selected as red")]
    Duplicate(TokenId),
    #[error("red count {red_count} exceeds token count {tokens_count}")]
    TooManyRed {
        red_count: usize,
        tokens_count: usize,
    },
    #[error("all {0} red tokens are already selected")]
    RedSelectionComplete(usize),
    #[error("{remaining} red tokens still need to be selected before the demon")]
    RedSelectionIncomplete { remaining: usize },
    #[error("token {0} is not one of the selected red tokens")]
    DemonNotRed(TokenId),
    #[error("role selection is not accepted during {phase}")]
    WrongPhase { phase: Phase },
}

/// Progress of the one-shot role assignment for a freshly seated table.
///
/// Red tokens are written to the ring as minions the moment they are chosen;
/// the demon is promoted from that set once every red seat is filled.
#[derive(Debug, Clone)]
pub struct RoleAssignment {
    tokens_count: usize,
    red_count: usize,
    selected: Vec<TokenId>,
}

impl RoleAssignment {
    pub fn new(tokens_count: usize, red_count: usize) -> Result<Self, SelectionError> {
        if red_count > tokens_count {
            return Err(SelectionError::TooManyRed {
                red_count,
                tokens_count,
            });
        }
        Ok(Self {
            tokens_count,
            red_count,
            selected: Vec::with_capacity(red_count),
        })
    }

    pub fn red_count(&self) -> usize {
        self.red_count
    }

    pub fn selected(&self) -> &[TokenId] {
        &self.selected
    }

    pub fn remaining(&self) -> usize {
        self.red_count - self.selected.len()
    }

    pub fn awaiting_demon(&self) -> bool {
        self.remaining() == 0
    }

    /// Ids that may still be picked as red, in seating order.
    pub fn candidates(&self) -> impl Iterator<Item = TokenId> + '_ {
        (1..=self.tokens_count as TokenId).filter(|id| !self.selected.contains(id))
    }

    pub fn validate_red(&self, id: TokenId) -> Result<(), SelectionError> {
        if id == 0 || id as usize > self.tokens_count {
            return Err(SelectionError::OutOfRange {
                id,
                tokens_count: self.tokens_count,
            });
        }
        if self.selected.contains(&id) {
            return Err(SelectionError::Duplicate(id));
        }
        if self.awaiting_demon() {
            return Err(SelectionError::RedSelectionComplete(self.red_count));
        }
        Ok(())
    }

    pub fn select_red(&mut self, ring: &mut TokenRing, id: TokenId) -> Result<(), SelectionError> {
        self.validate_red(id)?;
        ring.assign(id, Character::Minion);
        self.selected.push(id);
        info!(token = id, remaining = self.remaining(), "red token selected");
        Ok(())
    }

    pub fn validate_demon(&self, id: TokenId) -> Result<(), SelectionError> {
        if !self.awaiting_demon() {
            return Err(SelectionError::RedSelectionIncomplete {
                remaining: self.remaining(),
            });
        }
        if !self.selected.contains(&id) {
            return Err(SelectionError::DemonNotRed(id));
        }
        Ok(())
    }

    pub fn select_demon(&self, ring: &mut TokenRing, id: TokenId) -> Result<(), SelectionError> {
        self.validate_demon(id)?;
        ring.assign(id, Character::Demon);
        info!(token = id, "demon selected");
        Ok(())
    }

    /// Fills the remaining red seats at random and promotes one red token to
    /// demon. Returns the demon's id.
    pub fn assign_random(
        &mut self,
        ring: &mut TokenRing,
        rng: &mut impl Rng,
    ) -> Result<TokenId, SelectionError> {
        let remaining = self.remaining();
        let mut picks = self.candidates().choose_multiple(rng, remaining);
        picks.shuffle(rng);
        for id in picks {
            self.select_red(ring, id)?;
        }
        let demon = *self
            .selected
            .choose(rng)
            .ok_or(SelectionError::RedSelectionIncomplete { remaining: 0 })?;
        self.select_demon(ring, demon)?;
        Ok(demon)
    }
}
