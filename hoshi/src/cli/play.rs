use anyhow::anyhow;
use board::board::Board;
use board::rules::{check_forbidden, check_win};
use board::square::Square;
use board::stone::Stone;
use colored::Colorize;
use hoshi::{EvalOptions, SearchLimits, Searcher};
use std::io::{self, Write};
use std::time::Duration;

pub fn run_play(depth: usize, time: u64, engine_plays_black: bool) -> anyhow::Result<()> {
    let mut board = Board::new();
    let mut searcher = Searcher::new();

    let engine_side = if engine_plays_black {
        Stone::Black
    } else {
        Stone::White
    };

    let limits = SearchLimits {
        depth,
        time_limit: Some(Duration::from_millis(time)),
        ..SearchLimits::default()
    };

    let mut to_move = Stone::Black;

    loop {
        println!("{board}");

        let mv = if to_move == engine_side {
            let outcome =
                searcher.find_best_move(&board, to_move, &limits, &EvalOptions::default());

            let Some(mv) = outcome.position else {
                println!("{}", "The engine resigns.".yellow());
                return Ok(());
            };

            println!(
                "{} {} ({}, depth {})",
                "Engine plays".bright_cyan(),
                mv,
                outcome.score,
                outcome.completed_depth
            );

            mv
        } else {
            match get_move(&board, to_move) {
                Ok(mv) => mv,
                Err(error) => {
                    eprintln!("[{}]: {error}", "Error".red());
                    continue;
                }
            }
        };

        board.place(mv, to_move);

        if check_win(&board, mv, to_move) {
            println!("{board}");
            println!("{} {:?} wins!", "Five!".bright_green(), to_move);
            return Ok(());
        }

        to_move = !to_move;
    }
}

/// Prompt until the human enters a legal move.
fn get_move(board: &Board, stone: Stone) -> anyhow::Result<Square> {
    let mut input = String::default();

    print!("Your move ({stone}) > ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut input)?;

    let sq: Square = input.trim().parse()?;

    if !board.is_empty(sq) {
        Err(anyhow!("{sq} is occupied"))?;
    }

    if stone.is_black() && !check_win(board, sq, stone) {
        if let Some(kind) = check_forbidden(board, sq) {
            Err(anyhow!("{sq} is forbidden: {kind:?}"))?;
        }
    }

    Ok(sq)
}
