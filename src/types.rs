use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Blue,
    Red,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Character {
    Townsfolk,
    Minion,
    Demon,
}

impl Character {
    pub const fn alignment(self) -> Alignment {
        match self {
            Character::Townsfolk => Alignment::Blue,
            Character::Minion | Character::Demon => Alignment::Red,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    None,
    BlueWin,
    RedWin,
}

impl Verdict {
    pub fn is_decided(self) -> bool {
        !matches!(self, Verdict::None)
    }
}

/// Who is looking at, or acting on, the table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Moderator,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeathCause {
    Execution,
    Kill,
}

/// Resting phases of a session. The win check runs inside the transition that
/// removed a token, so it never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Setup,
    AssigningRoles,
    AssigningInfo,
    AwaitingPlayerExecution,
    AwaitingModeratorNeighborReentry,
    AwaitingModeratorKill,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    StartSetup,
    SelectRed,
    SelectDemon,
    RandomRoles,
    SetDisinformation,
    RandomDisinformation,
    SkipReentry,
    Execute,
    Kill,
    SetIntoxicated,
    Reset,
}

impl ActionType {
    /// The only actor allowed to issue this action.
    pub const fn actor(self) -> Actor {
        match self {
            ActionType::Execute => Actor::Player,
            _ => Actor::Moderator,
        }
    }
}
