//! Knight-Isolation: an alpha-beta agent for knight's Isolation.
//!
//! ## Usage
//!
//! - `knight-isolation` - Play one demo game against the random player
//! - `knight-isolation match` - Run a match against a sample opponent
//! - `knight-isolation protocol` - Start the text protocol on stdin/stdout
//!
//! Set `RUST_LOG=info` (or `debug`) for game and search logs.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use knight_isolation::agent::AgentConfig;
use knight_isolation::constants::{NUM_ROUNDS, SEARCH_DEPTH, TIME_LIMIT_MS};
use knight_isolation::heuristics::HeuristicKind;
use knight_isolation::isolation::{Isolation, PlayerId};
use knight_isolation::play::{MatchConfig, play, run_matches};
use knight_isolation::players::{Player, PlayerKind};
use knight_isolation::protocol::Engine;

/// Knight-Isolation: a fixed-depth alpha-beta agent
#[derive(Parser)]
#[command(name = "knight-isolation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the custom agent against a sample opponent and report the win rate
    Match(MatchArgs),
    /// Start the text command protocol for use with a GUI or by hand
    Protocol(AgentArgs),
    /// Play one game against the random player and print the final board
    Demo(AgentArgs),
}

/// Settings of the custom agent.
#[derive(Args, Clone)]
struct AgentArgs {
    /// Evaluation function (basic, aggressive, central, build)
    #[arg(long, default_value_t = HeuristicKind::Basic)]
    heuristic: HeuristicKind,
    /// Search depth in plies
    #[arg(long, default_value_t = SEARCH_DEPTH)]
    depth: u32,
    /// Seed for all random choices
    #[arg(long)]
    seed: Option<u64>,
}

impl AgentArgs {
    fn config(&self) -> Result<AgentConfig> {
        if self.depth == 0 {
            bail!("--depth must be at least 1");
        }
        Ok(AgentConfig {
            depth: self.depth,
            heuristic: self.heuristic,
            seed: self.seed,
            ..AgentConfig::default()
        })
    }
}

impl Default for AgentArgs {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::Basic,
            depth: SEARCH_DEPTH,
            seed: None,
        }
    }
}

#[derive(Args)]
struct MatchArgs {
    /// Opponent (random, greedy, minimax, custom)
    #[arg(long, default_value_t = PlayerKind::Minimax)]
    opponent: PlayerKind,
    /// Number of rounds; each round is two games with alternating first player
    #[arg(long, default_value_t = NUM_ROUNDS)]
    rounds: usize,
    /// Time limit per move in milliseconds
    #[arg(long, default_value_t = TIME_LIMIT_MS)]
    time_limit: u64,
    /// Start both games of a round from the same random placements
    #[arg(long)]
    fair: bool,
    #[command(flatten)]
    agent: AgentArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Match(args)) => run_match(&args),
        Some(Commands::Protocol(args)) => {
            let mut engine = Engine::with_config(args.config()?);
            engine
                .run(io::stdin().lock(), io::stdout())
                .context("protocol I/O failed")
        }
        Some(Commands::Demo(args)) => run_demo(&args),
        None => run_demo(&AgentArgs::default()),
    }
}

fn run_match(args: &MatchArgs) -> Result<()> {
    if args.time_limit == 0 {
        bail!("--time-limit must be positive");
    }
    let config = MatchConfig {
        opponent: args.opponent,
        rounds: args.rounds,
        time_limit: Duration::from_millis(args.time_limit),
        agent: args.agent.config()?,
        fair: args.fair,
        seed: args.agent.seed.unwrap_or_else(|| fastrand::u64(..)),
    };
    info!("starting {} rounds against {}", config.rounds, config.opponent);

    let summary = run_matches(&config);
    println!(
        "custom ({}, depth {}) vs {}",
        config.agent.heuristic, config.agent.depth, config.opponent
    );
    println!(
        "won {} / {} games ({:.1}%), {} timeouts, {} forfeits",
        summary.custom_wins,
        summary.games,
        summary.win_rate() * 100.0,
        summary.timeouts,
        summary.forfeits
    );
    Ok(())
}

fn run_demo(args: &AgentArgs) -> Result<()> {
    println!("Knight-Isolation: custom agent vs random\n");

    let config = args.config()?;
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut players: [Box<dyn Player>; 2] = [
        PlayerKind::Custom.build(PlayerId::FIRST, seed, &config),
        PlayerKind::Random.build(PlayerId::SECOND, seed, &config),
    ];
    let record = play(
        &mut players,
        Isolation::new(),
        Duration::from_millis(TIME_LIMIT_MS),
    );

    println!("{}", record.final_state);
    let moves: Vec<String> = record.history.iter().map(|a| a.to_string()).collect();
    println!("Moves: {}", moves.join(" "));
    println!(
        "Winner: player {} ({}) after {} plies ({:?})",
        record.winner.index() + 1,
        players[record.winner.index()].name(),
        record.final_state.ply_count(),
        record.reason
    );
    Ok(())
}
