use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use empath_ring::cli::{GameStats, StatisticsAccumulator, create_seat, print_seat_help};
use empath_ring::game::{Game, GameConfig};
use empath_ring::{EngineConfig, Verdict};
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[command(name = "empath-sim")]
#[command(about = "Empath ring simulator - play many automated games and report win rates")]
struct Args {
    /// TOML file with [game] and [sim] tables; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(short = 'n', long)]
    num: Option<u32>,

    /// Tokens at the table
    #[arg(short, long)]
    tokens: Option<usize>,

    /// Red tokens, demon included
    #[arg(short, long)]
    red: Option<usize>,

    /// Moderator seat code; use ':' for params (see --help-seats)
    #[arg(long)]
    moderator: Option<String>,

    /// Player seat code; use ':' for params, e.g. H:0.1
    #[arg(long)]
    player: Option<String>,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the red information refresh after executions
    #[arg(long)]
    no_reentry: bool,

    /// Skip the red information refresh after night kills
    #[arg(long)]
    no_night_reentry: bool,

    /// Show seat codes and exit
    #[arg(long)]
    help_seats: bool,

    /// Silence per-game output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads; 0 uses every available core
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone)]
struct Plan {
    game: GameConfig,
    num_games: u32,
    workers: usize,
    moderator: String,
    player: String,
    quiet: bool,
}

impl Plan {
    fn from_args(args: Args) -> Result<Self> {
        let file = EngineConfig::load_or_default(args.config.as_deref())
            .context("loading simulator configuration")?;
        let mut game = file.game;
        let mut sim = file.sim;

        if let Some(tokens) = args.tokens {
            game.tokens_count = tokens;
        }
        if let Some(red) = args.red {
            game.red_count = red;
        }
        if let Some(seed) = args.seed {
            game.seed = seed;
        }
        if args.no_reentry {
            game.reentry_after_execution = false;
        }
        if args.no_night_reentry {
            game.reentry_after_kill = false;
        }
        if let Some(num) = args.num {
            sim.num_games = num;
        }
        if let Some(workers) = args.workers {
            sim.workers = workers;
        }
        if let Some(moderator) = args.moderator {
            sim.moderator = moderator;
        }
        if let Some(player) = args.player {
            sim.player = player;
        }

        for spec in [&sim.moderator, &sim.player] {
            if create_seat(spec, 0).is_none() {
                bail!("unknown seat code '{spec}'; use --help-seats to see available codes");
            }
        }

        let workers = match sim.workers {
            0 => thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };

        Ok(Self {
            game,
            num_games: sim.num_games,
            workers,
            moderator: sim.moderator,
            player: sim.player,
            quiet: args.quiet,
        })
    }

    fn config_for(&self, game_idx: u64) -> GameConfig {
        GameConfig {
            seed: self.game.seed.wrapping_add(game_idx),
            ..self.game.clone()
        }
    }

    fn play_one(&self, game_idx: u64) -> Result<(Game, std::time::Duration)> {
        let config = self.config_for(game_idx);
        let seed = config.seed;
        let moderator = create_seat(&self.moderator, seed).context("moderator seat")?;
        let player = create_seat(&self.player, seed.wrapping_mul(31).wrapping_add(7))
            .context("player seat")?;

        let start = Instant::now();
        let mut game = Game::new(config);
        game.play(&moderator, &player);
        Ok((game, start.elapsed()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if args.help_seats {
        print_seat_help();
        return Ok(());
    }

    let plan = Plan::from_args(args)?;
    info!(
        games = plan.num_games,
        workers = plan.workers,
        tokens = plan.game.tokens_count,
        red = plan.game.red_count,
        "starting simulation"
    );

    let stats = if plan.workers > 1 {
        run_parallel_simulations(plan.clone())?
    } else {
        run_sequential_simulations(&plan)?
    };

    if !plan.quiet {
        print_summary(&plan, &stats);
    }
    Ok(())
}

fn run_sequential_simulations(plan: &Plan) -> Result<GameStats> {
    let mut stats = StatisticsAccumulator::new();
    for game_idx in 0..plan.num_games {
        let (game, duration) = plan.play_one(u64::from(game_idx))?;
        stats.after(&game, duration);

        if !plan.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= plan.num_games.saturating_sub(last_n) {
                println!(
                    "Game {:>4}: Verdict={:>8}, Rounds={:>3}, Survivors={:>3}, Actions={:>4}, Duration={:?}",
                    game_idx + 1,
                    game.verdict(),
                    game.state.round(),
                    game.state.ring().living_count(),
                    game.state.action_log().len(),
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                use std::io::Write;
                print!(".");
                std::io::stdout().flush()?;
            }
        }
    }
    Ok(stats.stats)
}

fn run_parallel_simulations(plan: Plan) -> Result<GameStats> {
    let plan = Arc::new(plan);
    let num_games = plan.num_games as usize;
    let games_per_worker = num_games / plan.workers;
    let remainder = num_games % plan.workers;

    let mut handles = Vec::with_capacity(plan.workers);
    for worker_id in 0..plan.workers {
        let plan = Arc::clone(&plan);
        let count = games_per_worker + usize::from(worker_id < remainder);
        let start_idx = worker_id * games_per_worker + worker_id.min(remainder);

        handles.push(thread::spawn(move || -> Result<GameStats> {
            let mut local = StatisticsAccumulator::new();
            for game_idx in start_idx..start_idx + count {
                let (game, duration) = plan.play_one(game_idx as u64)?;
                local.after(&game, duration);
            }
            Ok(local.stats)
        }));
    }

    let mut stats = GameStats::new();
    for handle in handles {
        let worker_stats = handle
            .join()
            .map_err(|_| anyhow::anyhow!("simulation worker panicked"))??;
        stats.merge(&worker_stats);
    }
    Ok(stats)
}

fn print_summary(plan: &Plan, stats: &GameStats) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));
    println!(
        "\nTable: {} tokens, {} red | Moderator: {} | Player: {}",
        plan.game.tokens_count, plan.game.red_count, plan.moderator, plan.player
    );

    println!("\n{:<12} {:<10} {:<10}", "Verdict", "Games", "Rate");
    println!("{}", "-".repeat(34));
    for (verdict, count) in [
        (Verdict::BlueWin, stats.blue_wins),
        (Verdict::RedWin, stats.red_wins),
        (Verdict::None, stats.undecided),
    ] {
        let rate = if stats.games > 0 {
            f64::from(count) / f64::from(stats.games) * 100.0
        } else {
            0.0
        };
        println!("{:<12} {:<10} {:<9.1}%", verdict.to_string(), count, rate);
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Avg Rounds: {:.2}", stats.get_avg_rounds());
    println!("  Avg Actions: {:.2}", stats.get_avg_actions());
    println!("  Avg Survivors: {:.2}", stats.get_avg_survivors());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
