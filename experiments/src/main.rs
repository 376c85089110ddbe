use chess::Color;
use chess3d::{
    easy_skip_chance, AlphaBeta, Difficulty, Engine, GameBoard, Logger, MaterialCount,
    RandomMover, Status,
};
use rand::{thread_rng, Rng};
use serde::Serialize;

const LOG_LEVEL: u8 = 1;
const MATCHES: usize = 10;
const MAX_PLIES: usize = 300;
const SKIP_TRIALS: usize = 1000;

#[derive(Serialize, Default)]
struct Tally {
    difficulty: String,
    wins: usize,
    losses: usize,
    draws: usize,
    unfinished: usize,
    plies: usize,
}

#[derive(Serialize)]
struct Report {
    matches: Vec<Tally>,
    skip_rate: f64,
    expected_skip_rate: f64,
}

fn main() {
    let mut logger = Logger::new(LOG_LEVEL);
    let mut rng = thread_rng();

    let mut matches = Vec::new();
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        logger.time_start(1, "difficulty");
        let mut tally = Tally { difficulty: format!("{:?}", difficulty), ..Tally::default() };
        for _ in 0..MATCHES {
            let seed = rng.gen();
            let mut white = RandomMover::with_seed(seed, 0);
            let mut black = AlphaBeta::for_difficulty(difficulty, 0).with_seed(seed);
            let (status, plies) = run_single_match(&mut white, &mut black);
            tally.plies += plies;
            match status {
                Status::Checkmate { winner: Color::Black } => tally.wins += 1,
                Status::Checkmate { winner: Color::White } => tally.losses += 1,
                Status::Draw(_) => tally.draws += 1,
                Status::InProgress => tally.unfinished += 1,
            }
        }
        logger.time_end(1, "difficulty");
        matches.push(tally);
    }

    let report = Report {
        matches,
        skip_rate: measure_skip_rate(rng.gen()),
        expected_skip_rate: easy_skip_chance().to_num(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("could not write the report: {}", e),
    }
}

/// Plays until the game ends or `MAX_PLIES` is reached.
fn run_single_match(white_player: &mut dyn Engine, black_player: &mut dyn Engine)
    -> (Status, usize)
{
    let mut board = GameBoard::initial_board();
    let mut plies = 0;
    while board.status().is_in_progress() && plies < MAX_PLIES {
        let player = match board.side_to_move() {
            Color::White => &mut *white_player,
            Color::Black => &mut *black_player,
        };
        let Some(mv) = player.get_move(&mut board) else { break };
        if let Err(e) = board.apply(mv) {
            player.get_logger().warn(&format!("{} could not be played: {}", mv, e));
            break;
        }
        plies += 1;
    }
    (board.status(), plies)
}

/// Share of easy choices that skipped the search, from the opening position.
fn measure_skip_rate(seed: u64) -> f64 {
    let mut engine =
        AlphaBeta::new(MaterialCount::default(), 1, Some(easy_skip_chance()), 0).with_seed(seed);
    let mut board = GameBoard::initial_board();
    let skipped = (0..SKIP_TRIALS)
        .filter_map(|_| engine.choose(&mut board))
        .filter(|choice| choice.is_random())
        .count();
    skipped as f64 / SKIP_TRIALS as f64
}
