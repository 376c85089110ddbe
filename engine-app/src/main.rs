use std::{io::Write, time::Instant};

use chess::Color::{Black, White};
use chess3d::{
    format_time, parse_promotion, parse_square, Mode, MoveError, OpponentKind, Outcome, Session,
    Settings,
};
use clap::{Parser, ValueEnum};

const INSTRUCTIONS: &str = "\
    Please enter your move in coordinate notation:\n    \
      <from><to>[promotion]\n      \
      For promotion: q, r, b or n. A queen is used if none is given.\n  \
      Example: \n    \
        - the opening move 1. e4 would be entered as \"e2e4\".\n    \
        - pushing a pawn to the last rank as a knight would be \"a7a8n\".\n  \
    Enter \"quit\" to leave.\n\
";

/// Arguments to the terminal game
#[derive(Parser, Debug)]
#[command(
    name = "chess3d - terminal",
    about = "Play White against the built-in opponent, or both sides yourself."
)]
struct Cli {
    /// Opponent strength, or pvp for two players at one keyboard
    #[arg(short, long)]
    level: Option<ArgLevel>,
    /// JSON settings file, with the same fields as the browser settings
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Seed for the opponent's random choices
    #[arg(long)]
    seed: Option<u64>,
    /// Whether to prevent the game board, clocks, and prompts from being
    /// printed
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum ArgLevel {
    Pvp,
    Easy,
    Medium,
    Hard,
}

impl ArgLevel {
    fn to_mode(self) -> Mode {
        match self {
            ArgLevel::Pvp => Mode::Pvp,
            ArgLevel::Easy => Mode::BotEasy,
            ArgLevel::Medium => Mode::BotMedium,
            ArgLevel::Hard => Mode::BotHard,
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let mut settings = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
            Settings::from_json(&text).map_err(|e| format!("bad settings in {}: {}", path.display(), e))?
        }
        None => Settings::default(),
    };
    if let Some(level) = cli.level {
        settings.mode = level.to_mode();
    }
    if settings.opponent == OpponentKind::Engine {
        eprintln!("No external engine is available in the terminal, using the built-in opponent.");
        settings.opponent = OpponentKind::Minimax;
    }
    Ok(settings)
}

fn read_move(text: &str) -> Result<(chess::Square, chess::Square, Option<chess::Piece>), MoveError> {
    let bad = || MoveError::BadSquare { notation: text.to_string() };
    let from = parse_square(text.get(0..2).ok_or_else(bad)?)?;
    let to = parse_square(text.get(2..4).ok_or_else(bad)?)?;
    let promotion = match text.get(4..) {
        None | Some("") => None,
        Some(p) => Some(parse_promotion(p).ok_or_else(bad)?),
    };
    Ok((from, to, promotion))
}

fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut session = Session::new(settings);
    if let Some(seed) = cli.seed {
        session = session.with_seed(seed);
    }
    session.start();

    while !session.is_over() {
        if !session.is_human_turn() {
            let Some(turn) = session.opponent_move() else { break };
            println!("{} played: {}", session.settings().player_black, turn.applied.mv());
            continue;
        }

        if !cli.quiet {
            println!("{}", session.board());
            println!(
                "White {}  Black {}",
                format_time(session.clock().remaining(White)),
                format_time(session.clock().remaining(Black)),
            );
            print!("{} to move: ", session.settings().player_name(session.board().side_to_move()));
            std::io::stdout().flush().unwrap();
        }

        let thinking = Instant::now();
        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).unwrap() == 0 {
            break;
        }
        for _ in 0..thinking.elapsed().as_secs() {
            session.tick();
        }
        if session.is_over() {
            break;
        }

        let input = input.trim();
        if input == "quit" {
            break;
        }
        let played = read_move(input).and_then(|(from, to, promotion)| session.play(from, to, promotion));
        if let Err(e) = played {
            println!("{}.", e);
            println!("{}", INSTRUCTIONS);
        }
    }

    if !cli.quiet {
        println!("{}", session.board());
    }
    match session.outcome() {
        Some(Outcome::Checkmate { winner }) => {
            println!("{} wins by checkmate", session.settings().player_name(winner));
        }
        Some(Outcome::Timeout { winner }) => {
            println!("{} wins on time", session.settings().player_name(winner));
        }
        Some(Outcome::Draw(reason)) => {
            println!("draw ({:?})", reason);
        }
        None => {
            println!("game abandoned");
        }
    }
}
