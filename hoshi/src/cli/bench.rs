use super::presets::Preset;
use anyhow::anyhow;
use board::board::Board;
use colored::Colorize;
use hoshi::{EvalOptions, SearchLimits, Searcher};

pub fn run_bench(depth: usize, preset: Option<String>) -> anyhow::Result<()> {
    let presets: Vec<&Preset> = match preset {
        Some(name) => {
            let preset =
                Preset::by_name(&name).ok_or(anyhow!("No preset named {name:?}"))?;
            vec![preset]
        }
        None => Preset::all_presets().iter().collect(),
    };

    let mut total_nodes = 0u64;
    let mut total_millis = 0u128;

    for preset in presets {
        let board: Board = preset.diagram.parse()?;
        let limits = SearchLimits {
            depth,
            ..SearchLimits::default()
        };

        let mut searcher = Searcher::new();
        let outcome =
            searcher.find_best_move(&board, preset.side, &limits, &EvalOptions::default());

        let millis = outcome.elapsed.as_millis();
        let knps = outcome.stats.nodes as u128 / millis.max(1);

        total_nodes += outcome.stats.nodes;
        total_millis += millis;

        println!("{:12} {}", "Preset:".green(), preset.name);
        println!(
            "{:12} {}",
            "Best move:".bright_cyan(),
            outcome
                .position
                .map(|mv| mv.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        println!("{:12} {}", "Score:".bright_cyan(), outcome.score);
        println!("{:12} {}", "Nodes:".blue(), outcome.stats.nodes);
        println!("{:12} {}ms", "Duration:".red(), millis);
        println!("{:12} {}knps", "Speed:".red(), knps);
        println!(
            "{:12} {:.1}%",
            "TT hits:".purple(),
            100.0 * outcome.stats.tt_hit_rate()
        );
        println!();
    }

    println!(
        "{:12} {} nodes in {}ms ({}knps)",
        "Total:".green(),
        total_nodes,
        total_millis,
        total_nodes as u128 / total_millis.max(1)
    );

    Ok(())
}
