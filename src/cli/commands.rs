use std::str::FromStr;

use crate::game::action::GameAction;
use crate::ring::TokenId;
use crate::types::{ActionType, Actor};

/// One console line, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Setup { tokens_count: usize, red_count: usize },
    Red(TokenId),
    RandomRoles,
    Demon(TokenId),
    Info { token: TokenId, value: u8 },
    RandomInfo,
    Exec(TokenId),
    Kill(TokenId),
    Skip,
    Drunk(TokenId),
    Sober(TokenId),
    Show(Actor),
    Json(Actor),
    Log,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a valid number")]
    BadNumber(String),
    #[error("`{0}` is not a viewer; use `player` or `moderator`")]
    BadViewer(String),
    #[error("`{0}` takes fewer arguments")]
    TooManyArguments(&'static str),
}

pub const HELP: &str = "\
setup N R        seat N tokens, R of them red
red ID           pick a red token
random-roles     pick the remaining red tokens and the demon at random
demon ID         promote a red token to demon
info ID V        give red token ID the value V (0-2)
random-info      give every waiting red token a random value
exec ID          players execute token ID
kill ID          moderator kills token ID
skip             keep red information as it is after a death
drunk ID         freeze a token's information
sober ID         unfreeze a token's information
show [player|moderator]
json [player|moderator]
log              list what happened this game
reset            drop the game and start over
help             this text
quit             leave";

struct Args<'a> {
    command: &'static str,
    rest: std::str::SplitWhitespace<'a>,
}

impl Args<'_> {
    fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, CommandError> {
        let raw = self.rest.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            expected,
        })?;
        raw.parse()
            .map_err(|_| CommandError::BadNumber(raw.to_string()))
    }

    fn viewer(&mut self) -> Result<Actor, CommandError> {
        match self.rest.next().map(str::to_lowercase).as_deref() {
            None | Some("moderator") | Some("mod") => Ok(Actor::Moderator),
            Some("player") | Some("players") => Ok(Actor::Player),
            Some(other) => Err(CommandError::BadViewer(other.to_string())),
        }
    }

    fn finish(mut self, command: Command) -> Result<Command, CommandError> {
        match self.rest.next() {
            Some(_) => Err(CommandError::TooManyArguments(self.command)),
            None => Ok(command),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?.to_lowercase();
        let command: &'static str = match word.as_str() {
            "setup" => "setup",
            "red" => "red",
            "random-roles" => "random-roles",
            "demon" => "demon",
            "info" => "info",
            "random-info" => "random-info",
            "exec" | "execute" => "exec",
            "kill" => "kill",
            "skip" => "skip",
            "drunk" => "drunk",
            "sober" => "sober",
            "show" => "show",
            "json" => "json",
            "log" => "log",
            "reset" => "reset",
            "help" | "?" => "help",
            "quit" | "exit" => "quit",
            _ => return Err(CommandError::Unknown(word)),
        };
        let mut args = Args {
            command,
            rest: words,
        };

        let parsed = match command {
            "setup" => Command::Setup {
                tokens_count: args.next("a token count")?,
                red_count: args.next("a red count")?,
            },
            "red" => Command::Red(args.next("a token id")?),
            "random-roles" => Command::RandomRoles,
            "demon" => Command::Demon(args.next("a token id")?),
            "info" => Command::Info {
                token: args.next("a token id")?,
                value: args.next("a value")?,
            },
            "random-info" => Command::RandomInfo,
            "exec" => Command::Exec(args.next("a token id")?),
            "kill" => Command::Kill(args.next("a token id")?),
            "skip" => Command::Skip,
            "drunk" => Command::Drunk(args.next("a token id")?),
            "sober" => Command::Sober(args.next("a token id")?),
            "show" => Command::Show(args.viewer()?),
            "json" => Command::Json(args.viewer()?),
            "log" => Command::Log,
            "reset" => Command::Reset,
            "help" => Command::Help,
            _ => Command::Quit,
        };
        args.finish(parsed)
    }
}

impl Command {
    /// The engine action this command stands for; `None` for console-only
    /// commands such as `show` or `quit`.
    pub fn to_action(self) -> Option<GameAction> {
        let action = match self {
            Command::Setup {
                tokens_count,
                red_count,
            } => GameAction::start_setup(tokens_count, red_count),
            Command::Red(id) => GameAction::select_red(id),
            Command::RandomRoles => GameAction::new(ActionType::RandomRoles),
            Command::Demon(id) => GameAction::select_demon(id),
            Command::Info { token, value } => GameAction::set_disinformation(token, value),
            Command::RandomInfo => GameAction::new(ActionType::RandomDisinformation),
            Command::Exec(id) => GameAction::execute(id),
            Command::Kill(id) => GameAction::kill(id),
            Command::Skip => GameAction::new(ActionType::SkipReentry),
            Command::Drunk(id) => GameAction::set_intoxicated(id, true),
            Command::Sober(id) => GameAction::set_intoxicated(id, false),
            Command::Reset => GameAction::new(ActionType::Reset),
            Command::Show(_) | Command::Json(_) | Command::Log | Command::Help | Command::Quit => return None,
        };
        Some(action)
    }
}
