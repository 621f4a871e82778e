use board::board::Board;
use board::stone::Stone;
use colored::Colorize;
use hoshi::{EvalOptions, SearchLimits, Searcher};
use std::io::Read;
use std::time::Duration;

pub fn run_analyze(
    board_arg: String,
    side: String,
    depth: usize,
    time: Option<u64>,
    nodes: Option<u64>,
) -> anyhow::Result<()> {
    let diagram = if board_arg == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        input
    } else {
        std::fs::read_to_string(&board_arg)?
    };

    let board: Board = diagram.parse()?;
    let stone: Stone = side.parse()?;

    let limits = SearchLimits {
        depth,
        time_limit: time.map(Duration::from_millis),
        max_nodes: nodes,
        ..SearchLimits::default()
    };

    let mut searcher = Searcher::new();
    let outcome = searcher.find_best_move(&board, stone, &limits, &EvalOptions::default());

    println!("{board}");
    println!("{:17} {:?}", "Side to move:".green(), stone);
    println!("{:17} {}", "Depth:".green(), depth);
    println!();

    match outcome.position {
        Some(mv) => println!("{:17} {}", "Best move:".bright_cyan(), mv),
        None => println!("{:17} {}", "Best move:".bright_cyan(), "none (lost)"),
    }
    println!("{:17} {}", "Score:".bright_cyan(), outcome.score);
    println!("{:17} {}", "Completed depth:".bright_cyan(), outcome.completed_depth);

    if outcome.interrupted {
        println!("{:17} {}", "Interrupted:".yellow(), "yes");
    }

    if outcome.time_pressure_fallback {
        println!(
            "{:17} from depth {}",
            "Fallback:".yellow(),
            outcome.fallback_from_depth.unwrap_or_default()
        );
    }

    println!();
    for record in &outcome.depth_history {
        println!(
            "{:17} {} ({})",
            format!("Depth {}:", record.depth).blue(),
            record.best_move,
            record.score
        );
    }

    if !outcome.candidates.is_empty() {
        println!();
        println!("{}", "Candidates:".blue());

        for candidate in outcome.candidates.iter().take(8) {
            println!(
                "  {:4} {:>8} ({} nodes)",
                candidate.position.to_string(),
                candidate.score,
                candidate.nodes
            );
        }
    }

    println!();
    println!("{:17} {}", "Nodes:".red(), outcome.stats.nodes);
    println!("{:17} {}", "Solver nodes:".red(), outcome.stats.solver_nodes);
    println!("{:17} {}ms", "Duration:".red(), outcome.elapsed.as_millis());
    println!(
        "{:17} {:.1}%",
        "TT hit rate:".purple(),
        100.0 * outcome.stats.tt_hit_rate()
    );
    println!(
        "{:17} {:.1}%",
        "TT occupancy:".purple(),
        100.0 * outcome.stats.tt_occupancy
    );

    Ok(())
}
