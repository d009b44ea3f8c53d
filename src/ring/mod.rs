use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{Alignment, Character};

pub type TokenId = u16;

/// Largest table the ring can seat; ids must fit in a `TokenId`.
pub const MAX_TOKENS: usize = TokenId::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub alignment: Alignment,
    pub character: Character,
    pub alive: bool,
    pub displayed_count: u8,
    pub intoxicated: bool,
}

impl Token {
    pub fn new(id: TokenId) -> Self {
        Self {
            id,
            alignment: Alignment::Blue,
            character: Character::Townsfolk,
            alive: true,
            displayed_count: 0,
            intoxicated: false,
        }
    }

    pub fn is_red(&self) -> bool {
        self.alignment == Alignment::Red
    }

    pub fn is_demon(&self) -> bool {
        self.character == Character::Demon
    }

    /// Blue, living and sober: the tokens whose information must track the ring.
    pub fn shows_true_info(&self) -> bool {
        self.alignment == Alignment::Blue && self.alive && !self.intoxicated
    }
}

/// Nearest living tokens on either side of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub left: Option<TokenId>,
    pub right: Option<TokenId>,
}

impl Neighbors {
    /// Neighbours with the two-survivor case collapsed, so a token that is
    /// both left and right is only reported once.
    pub fn distinct(&self) -> SmallVec<[TokenId; 2]> {
        let mut out = SmallVec::new();
        if let Some(left) = self.left {
            out.push(left);
        }
        if let Some(right) = self.right {
            if self.left != Some(right) {
                out.push(right);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum Walk {
    CounterClockwise,
    Clockwise,
}

/// Tokens seated in id order; id `n` sits between `n - 1` and `n + 1`, and the
/// last id wraps around to 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRing {
    tokens: Vec<Token>,
}

impl TokenRing {
    pub fn new(count: usize) -> Self {
        debug_assert!(count <= MAX_TOKENS);
        let tokens = (1..=count as TokenId).map(Token::new).collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.index_of(id).map(|idx| &self.tokens[idx])
    }

    pub(crate) fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.index_of(id).map(move |idx| &mut self.tokens[idx])
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| token.alive)
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn demon(&self) -> Option<&Token> {
        self.tokens.iter().find(|token| token.is_demon())
    }

    pub fn red_count(&self) -> usize {
        self.tokens.iter().filter(|token| token.is_red()).count()
    }

    /// Living red ids in seating order.
    pub fn living_red_ids(&self) -> Vec<TokenId> {
        self.living()
            .filter(|token| token.is_red())
            .map(|token| token.id)
            .collect()
    }

    /// Returns `None` when `id` is not seated at this table. A direction is
    /// `None` when every other token is dead.
    pub fn nearest_living_neighbors(&self, id: TokenId) -> Option<Neighbors> {
        let start = self.index_of(id)?;
        Some(Neighbors {
            left: self.walk(start, Walk::CounterClockwise),
            right: self.walk(start, Walk::Clockwise),
        })
    }

    pub(crate) fn assign(&mut self, id: TokenId, character: Character) -> bool {
        let Some(token) = self.get_mut(id) else {
            return false;
        };
        token.character = character;
        token.alignment = character.alignment();
        true
    }

    /// Marks a living token dead. Returns false if it was unknown or already dead.
    pub(crate) fn mark_dead(&mut self, id: TokenId) -> bool {
        match self.get_mut(id) {
            Some(token) if token.alive => {
                token.alive = false;
                true
            }
            _ => false,
        }
    }

    fn index_of(&self, id: TokenId) -> Option<usize> {
        let idx = (id as usize).checked_sub(1)?;
        (idx < self.tokens.len()).then_some(idx)
    }

    fn walk(&self, start: usize, walk: Walk) -> Option<TokenId> {
        let len = self.tokens.len();
        for step in 1..len {
            let idx = match walk {
                Walk::CounterClockwise => (start + len - step) % len,
                Walk::Clockwise => (start + step) % len,
            };
            let token = &self.tokens[idx];
            if token.alive {
                return Some(token.id);
            }
        }
        None
    }
}
