use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::ring::{TokenId, TokenRing};
use crate::types::Phase;

/// Largest value a token can show: both neighbours red.
pub const MAX_NEIGHBOR_COUNT: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("value {0} is outside 0..=2")]
    OutOfRange(u8),
    #[error("token {0} is not seated at this table")]
    UnknownToken(TokenId),
    #[error("token {0} is not red; its information is computed")]
    NotRed(TokenId),
    #[error("token {0} is not waiting for information")]
    NotPending(TokenId),
    #[error("information entry is not accepted during {phase}")]
    WrongPhase { phase: Phase },
}

pub fn validate_value(value: u8) -> Result<u8, ValueError> {
    if value > MAX_NEIGHBOR_COUNT {
        return Err(ValueError::OutOfRange(value));
    }
    Ok(value)
}

/// Number of red tokens among the nearest living neighbours of `id`.
pub fn true_red_neighbors(ring: &TokenRing, id: TokenId) -> Option<u8> {
    let neighbors = ring.nearest_living_neighbors(id)?;
    let count = neighbors
        .distinct()
        .iter()
        .filter_map(|neighbor| ring.get(*neighbor))
        .filter(|token| token.is_red())
        .count();
    Some(count as u8)
}

/// Brings every blue, living, sober token in line with the ring. Red and
/// intoxicated tokens keep whatever they were last given. Returns the ids
/// whose value changed.
pub fn recompute(ring: &mut TokenRing) -> Vec<TokenId> {
    let view: &TokenRing = ring;
    let updates: Vec<(TokenId, u8)> = view
        .iter()
        .filter(|token| token.shows_true_info())
        .filter_map(|token| {
            let count = true_red_neighbors(view, token.id)?;
            (count != token.displayed_count).then_some((token.id, count))
        })
        .collect();

    let mut changed = Vec::with_capacity(updates.len());
    for (id, count) in updates {
        if let Some(token) = ring.get_mut(id) {
            token.displayed_count = count;
            changed.push(id);
        }
    }
    debug!(changed = ?changed, "neighbour information recomputed");
    changed
}

/// Ids whose displayed value disagrees with a fresh recomputation. Empty in
/// every reachable state.
pub fn stale_tokens(ring: &TokenRing) -> Vec<TokenId> {
    ring.iter()
        .filter(|token| token.shows_true_info())
        .filter(|token| true_red_neighbors(ring, token.id) != Some(token.displayed_count))
        .map(|token| token.id)
        .collect()
}

/// Red tokens still owed a value from the moderator, in seating order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisinformationQueue {
    pending: VecDeque<TokenId>,
}

impl DisinformationQueue {
    pub fn for_living_reds(ring: &TokenRing) -> Self {
        Self {
            pending: ring.living_red_ids().into(),
        }
    }

    pub fn next(&self) -> Option<TokenId> {
        self.pending.front().copied()
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.pending.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.pending.iter().copied()
    }

    /// Checks that `id` may receive `value` right now, without touching anything.
    pub fn validate(&self, ring: &TokenRing, id: TokenId, value: u8) -> Result<(), ValueError> {
        validate_value(value)?;
        let token = ring.get(id).ok_or(ValueError::UnknownToken(id))?;
        if !token.is_red() {
            return Err(ValueError::NotRed(id));
        }
        if !self.contains(id) {
            return Err(ValueError::NotPending(id));
        }
        Ok(())
    }

    pub fn submit(&mut self, ring: &mut TokenRing, id: TokenId, value: u8) -> Result<(), ValueError> {
        self.validate(ring, id, value)?;
        if let Some(token) = ring.get_mut(id) {
            token.displayed_count = value;
        }
        self.pending.retain(|pending| *pending != id);
        Ok(())
    }

    /// Gives every pending token a uniformly random value. Returns the
    /// assignments in the order they were made.
    pub fn fill_random(&mut self, ring: &mut TokenRing, rng: &mut impl Rng) -> Vec<(TokenId, u8)> {
        let mut assigned = Vec::with_capacity(self.pending.len());
        while let Some(id) = self.pending.pop_front() {
            let value = rng.gen_range(0..=MAX_NEIGHBOR_COUNT);
            if let Some(token) = ring.get_mut(id) {
                token.displayed_count = value;
            }
            assigned.push((id, value));
        }
        assigned
    }
}
