//! Gomoku command line and GUI launcher
//!
//! Seats are filled per colour with a human, the AI or a random player.
//! Humans type `x y` on stdin, or click the board with `--gui`.

use std::io::{self, BufReader};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gomoku::ui::{self, Visualizer};
use gomoku::{
    AIEngine, AbortHandle, ConsoleReporter, Gomoku, LinePlayer, Player, RandomPlayer,
    StateObserver, Stone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Controller {
    Human,
    Ai,
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "gomoku", about = "Gomoku with Ninuki-renju captures")]
struct Args {
    /// Who plays Black
    #[arg(long, value_enum, default_value_t = Controller::Human)]
    black: Controller,

    /// Who plays White
    #[arg(long, value_enum, default_value_t = Controller::Ai)]
    white: Controller,

    /// AI lookahead depth (0 = heuristic only, max 4)
    #[arg(long, default_value_t = 1)]
    depth: u8,

    /// Candidates the AI replays at each lookahead level
    #[arg(long, default_value_t = 4)]
    branching: usize,

    /// Seed for AI and random players
    #[arg(long)]
    seed: Option<u64>,

    /// Play in a window instead of the terminal
    #[arg(long)]
    gui: bool,

    /// Pause after each placement in the window, in milliseconds
    #[arg(long, default_value_t = 300)]
    pace_ms: u64,

    /// Do not print the board after every turn
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn seed_for(&self, stone: Stone) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(stone.index() as u64))
    }

    fn machine(&self, controller: Controller, stone: Stone) -> Option<Box<dyn Player>> {
        match (controller, self.seed_for(stone)) {
            (Controller::Human, _) => None,
            (Controller::Ai, seed) => {
                let engine = AIEngine::with_config(self.branching, self.depth);
                Some(Box::new(match seed {
                    Some(seed) => engine.with_seed(seed),
                    None => engine,
                }))
            }
            (Controller::Random, Some(seed)) => Some(Box::new(RandomPlayer::with_seed(seed))),
            (Controller::Random, None) => Some(Box::new(RandomPlayer::new())),
        }
    }

    fn controller(&self, stone: Stone) -> Controller {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }
}

fn play_in_terminal(args: &Args) -> anyhow::Result<()> {
    let abort = AbortHandle::default();
    let players = Stone::ALL
        .into_iter()
        .map(|stone| {
            args.machine(args.controller(stone), stone).unwrap_or_else(|| {
                // Both seats may read stdin; a one-byte buffer keeps either from
                // swallowing the other's lines
                let input = BufReader::with_capacity(1, io::stdin());
                let human: Box<dyn Player> =
                    Box::new(LinePlayer::new(input, io::stderr()).with_abort(abort.clone()));
                human
            })
        })
        .collect();
    let observer: Option<Box<dyn StateObserver>> = if args.quiet {
        None
    } else {
        Some(Box::new(ConsoleReporter::stdout()))
    };

    let mut gomoku = Gomoku::new(players, observer)?.with_abort_handle(abort);
    match gomoku.run()? {
        Some(winner) => println!("{} ({winner}) wins!", gomoku.player_name(winner)),
        None => println!("Game aborted."),
    }
    Ok(())
}

fn play_in_window(args: &Args) -> anyhow::Result<()> {
    let visualizer = Visualizer::new();
    let players = Stone::ALL
        .into_iter()
        .map(|stone| {
            args.machine(args.controller(stone), stone).unwrap_or_else(|| {
                let human: Box<dyn Player> = Box::new(visualizer.clone());
                human
            })
        })
        .collect();

    let gomoku = Gomoku::new(players, Some(Box::new(visualizer.clone())))?;
    ui::run(gomoku, visualizer, Duration::from_millis(args.pace_ms))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.gui {
        play_in_window(&args)
    } else {
        play_in_terminal(&args)
    }
}
