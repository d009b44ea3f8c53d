use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use empath_ring::cli::render::{render_events, render_json, render_observation, render_ring};
use empath_ring::cli::{Command, HELP};
use empath_ring::game::{GameConfig, GameState};
use empath_ring::types::{ActionType, Actor, Phase};
use empath_ring::{EngineConfig, observation_from_state};
use tracing::{debug, warn};

#[derive(Debug, Parser, Clone)]
#[command(name = "empath-moderate")]
#[command(about = "Run an empath ring game from the console, as moderator and players")]
struct Args {
    /// TOML file with a [game] table; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seat the table right away with this many tokens
    #[arg(short, long)]
    tokens: Option<usize>,

    /// Red tokens for the immediate setup
    #[arg(short, long)]
    red: Option<usize>,

    /// Random seed for role and information draws
    #[arg(long)]
    seed: Option<u64>,

    /// Pick red tokens and the demon at random
    #[arg(long)]
    random_roles: bool,

    /// Give red tokens random information
    #[arg(long)]
    random_info: bool,

    /// Skip the red information refresh after executions
    #[arg(long)]
    no_reentry: bool,

    /// Skip the red information refresh after night kills
    #[arg(long)]
    no_night_reentry: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = EngineConfig::load_or_default(self.config.as_deref())
            .context("loading console configuration")?
            .game;
        if let Some(tokens) = self.tokens {
            config.tokens_count = tokens;
        }
        if let Some(red) = self.red {
            config.red_count = red;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.random_roles |= self.random_roles;
        config.random_disinformation |= self.random_info;
        if self.no_reentry {
            config.reentry_after_execution = false;
        }
        if self.no_night_reentry {
            config.reentry_after_kill = false;
        }
        Ok(config)
    }
}

fn prompt(state: &GameState) -> String {
    match state.phase() {
        Phase::Setup => "setup N R".to_string(),
        Phase::AssigningRoles => "red ID / demon ID / random-roles".to_string(),
        Phase::AssigningInfo | Phase::AwaitingModeratorNeighborReentry => {
            match state.pending_red() {
                Some(id) => format!("info {id} V (0-2) / random-info"),
                None => "info ID V".to_string(),
            }
        }
        Phase::AwaitingPlayerExecution => "players: exec ID".to_string(),
        Phase::AwaitingModeratorKill => "moderator: kill ID".to_string(),
        Phase::GameOver => format!("{}; setup N R or reset", state.verdict()),
    }
}

/// Runs one command against the session. Returns false when the console
/// should close.
fn handle(state: &mut GameState, command: Command, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Quit => return Ok(false),
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Show(viewer) => {
            writeln!(out, "{}", render_observation(&observation_from_state(state, viewer)))?
        }
        Command::Json(viewer) => {
            let json = render_json(&observation_from_state(state, viewer))
                .context("encoding observation")?;
            writeln!(out, "{json}")?
        }
        Command::Log => writeln!(out, "{}", render_events(state.events()))?,
        _ => {
            let Some(action) = command.to_action() else {
                return Ok(true);
            };
            let action_type = action.action_type;
            match state.step(action) {
                Ok(outcome) => {
                    debug!(events = outcome.events.len(), "command applied");
                    let viewer = match action_type {
                        ActionType::Execute => Some(Actor::Player),
                        ActionType::Kill => Some(Actor::Moderator),
                        _ => None,
                    };
                    if let Some(viewer) = viewer {
                        writeln!(out, "{}", render_ring(&state.snapshot(viewer)))?;
                    }
                    if outcome.done {
                        writeln!(out, "GAME OVER: {}", outcome.verdict)?;
                    }
                }
                Err(err) => {
                    warn!(%err, ?action_type, "command rejected");
                    writeln!(out, "rejected: {err}")?;
                }
            }
        }
    }
    Ok(true)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.game_config()?;
    let auto_setup = args.tokens.is_some() || args.red.is_some();
    let (tokens_count, red_count) = (config.tokens_count, config.red_count);
    let mut state = GameState::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Empath ring console. Type `help` for commands.")?;

    if auto_setup {
        if let Err(err) = state.start_setup(tokens_count, red_count) {
            writeln!(out, "rejected: {err}")?;
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "[{}] {} > ", state.phase(), prompt(&state))?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading console input")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !handle(&mut state, command, &mut out)? {
                    break;
                }
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }
    Ok(())
}
