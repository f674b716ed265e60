//! Terminal interface to play, replay and save games against the Sparring engine.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shakmaty::Square;
use sparring_engine::coretypes::{parse_side, side_name};
use sparring_engine::evaluation;
use sparring_engine::record;
use sparring_engine::{Difficulty, Session, SessionConfig, Tick};

#[derive(Debug, Parser)]
#[command(name = "sparring", version, about = "Play chess against a small alpha-beta engine")]
struct Args {
    /// Side the human plays, white or black.
    #[arg(long, default_value = "white")]
    side: String,

    /// Engine difficulty, low, medium or high. Overrides the config file.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// JSON session config.
    #[arg(long)]
    config: Option<PathBuf>,
}

enum InputKind {
    Exit,
    Help,
    Newgame(Option<String>),
    First,
    Previous,
    Next,
    Last,
    GoTo(isize),
    Save(String),
    Load(usize),
    LoadRecord(String),
    List,
    Record,
    Ai(bool),
    Level(Difficulty),
    Moves(Square),
    GameMove(Square, Square),
    Error,
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let (command, rest) = match s.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (s, ""),
        };

        match (command, rest) {
            ("exit" | "quit", _) => Self::Exit,
            ("help", _) => Self::Help,
            ("newgame" | "ng", "") => Self::Newgame(None),
            ("newgame" | "ng", side) => Self::Newgame(Some(side.to_string())),
            ("first", _) => Self::First,
            ("prev", _) => Self::Previous,
            ("next", _) => Self::Next,
            ("last", _) => Self::Last,
            ("goto", index) => index.parse().map_or(Self::Error, Self::GoTo),
            ("save", name) => Self::Save(name.to_string()),
            ("load", index) => index.parse().map_or(Self::Error, Self::Load),
            ("loadpgn", record) => Self::LoadRecord(record.to_string()),
            ("list", _) => Self::List,
            ("pgn", _) => Self::Record,
            ("ai", "on") => Self::Ai(true),
            ("ai", "off") => Self::Ai(false),
            ("level", level) => level.parse().map_or(Self::Error, Self::Level),
            ("moves", square) => square.parse().map_or(Self::Error, Self::Moves),
            (coords, "") if coords.len() == 4 && coords.is_ascii() => {
                match (coords[..2].parse(), coords[2..].parse()) {
                    (Ok(from), Ok(to)) => Self::GameMove(from, to),
                    _ => Self::Error,
                }
            }
            _ => Self::Error,
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("newgame | ng [white|black] => Begin a new game against the engine.");
    println!("first | prev | next | last => Navigate the move history.");
    println!("goto N => Show the position after move N, -1 for the start.");
    println!("save NAME => Save the game. list => List saved games.");
    println!("load N => Load saved game N. loadpgn MOVES => Load a game record.");
    println!("pgn => Print the game record.");
    println!("ai on | ai off => Play against the engine, or move both sides.");
    println!("level low|medium|high => Set engine difficulty.");
    println!("moves SQUARE => List legal destinations of a piece.");
    println!("help => Print this help text.");
    println!("exit => end CLI.");
    println!("\nTo make a move, enter a move in algebraic coordinate form.");
    println!("Examples: d2d4 -> Move piece on D2 to D4. e1g1 -> Castle king side.");
}

fn print_status(session: &Session) {
    let board = session.board();
    println!("{board}");
    println!(
        "Move {} of {} | {} to move | material {} | clock {} | {}",
        session.cursor() + 1,
        session.history().len(),
        side_name(board.turn()),
        evaluation::material(board.pieces()),
        session.formatted_time(),
        session.tally(),
    );
    if let Some(outcome) = board.outcome() {
        println!("Game over: {}", record::result_token(outcome));
    }
}

/// Let the engine reply if it is its turn.
fn engine_reply(session: &mut Session) {
    if session.trigger_ai_move_if_due() {
        println!("thinking...");
        if let Some(san) = session.await_ai_move() {
            println!("Sparring played {san}.");
        }
    }
}

/// Feed whole elapsed seconds to the session clock.
fn tick_clock(session: &mut Session, last_tick: &mut Instant) {
    let seconds = last_tick.elapsed().as_secs();
    for _ in 0..seconds {
        if session.tick() == Tick::Expired {
            println!("Time is up.");
        }
    }
    *last_tick += Duration::from_secs(seconds);
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_path(path)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?,
        None => SessionConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config = config.difficulty(difficulty);
    }
    let side = parse_side(&args.side)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    info!(?config, side = side_name(side), "config loaded");

    println!("Sparring CLI 0.1.0\n");
    let mut session = Session::new(config);
    session.start_game(side);
    info!("session started");
    engine_reply(&mut session);

    let mut input = String::new();
    let mut last_tick = Instant::now();

    loop {
        print_status(&session);
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        tick_clock(&mut session, &mut last_tick);

        let outcome = match InputKind::from(input.trim()) {
            InputKind::Exit => break,
            InputKind::Help => {
                print_help();
                Ok(())
            }
            InputKind::Newgame(maybe_side) => {
                let side = match maybe_side {
                    Some(text) => parse_side(&text),
                    None => Ok(session.human_side()),
                };
                side.map(|side| {
                    session.start_game(side);
                    println!("Starting new game as {}...", side_name(side));
                })
            }
            InputKind::First => session.go_to_start(),
            InputKind::Previous => session.go_to_previous(),
            InputKind::Next => session.go_to_next(),
            InputKind::Last => session.go_to_end(),
            InputKind::GoTo(index) => session.go_to_move(index),
            InputKind::Save(name) => session
                .save_current_game(&name)
                .map(|index| println!("Saved as game {index}.")),
            InputKind::Load(index) => session.load_saved_game(index),
            InputKind::LoadRecord(text) => session.load_record(&text),
            InputKind::List => {
                for (index, name) in session.saved_game_names().iter().enumerate() {
                    println!("{index}: {name}");
                }
                Ok(())
            }
            InputKind::Record => session.game().record().map(|text| println!("{text}")),
            InputKind::Ai(enabled) => session.set_ai_enabled(enabled),
            InputKind::Level(difficulty) => {
                session.set_difficulty(difficulty);
                Ok(())
            }
            InputKind::Moves(from) => {
                let destinations: Vec<String> = session
                    .legal_destinations(from)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("{from}: {}", destinations.join(" "));
                Ok(())
            }
            InputKind::GameMove(from, to) => session
                .apply_human_move(from, to)
                .map(|san| println!("You played {san}.")),
            InputKind::Error => {
                println!("Invalid command: {}", input.trim());
                continue;
            }
        };

        match outcome {
            Ok(()) => engine_reply(&mut session),
            Err(err) => {
                warn!(%err, "command rejected");
                println!("{err}");
            }
        }
    }
    Ok(())
}
