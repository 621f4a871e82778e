use clap::Subcommand;

use self::{analyze::run_analyze, bench::run_bench, play::run_play};

pub mod analyze;
pub mod bench;
pub mod play;
pub mod presets;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a position and print the engine's choice with its work.
    Analyze {
        /// Path to a 15-line board diagram, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        board: String,

        /// The side to move
        #[arg(short, long, default_value = "black")]
        side: String,

        /// Set the search depth
        #[arg(short, long, value_name = "DEPTH", default_value = "6")]
        depth: usize,

        /// Soft time budget in milliseconds
        #[arg(short, long, value_name = "MS")]
        time: Option<u64>,

        /// Node budget
        #[arg(short, long, value_name = "NODES")]
        nodes: Option<u64>,
    },

    /// Play a game against the engine in the terminal.
    Play {
        /// Set the engine's search depth
        #[arg(short, long, value_name = "DEPTH", default_value = "6")]
        depth: usize,

        /// Engine time budget per move, in milliseconds
        #[arg(short, long, value_name = "MS", default_value = "2000")]
        time: u64,

        /// Let the engine take black (you play white)
        #[arg(long)]
        white: bool,
    },

    /// Run the built-in benchmark positions.
    Bench {
        /// Set the search depth
        #[arg(short, long, value_name = "DEPTH", default_value = "5")]
        depth: usize,

        /// Only run the named preset
        #[arg(short, long, value_name = "PRESET_NAME")]
        preset: Option<String>,
    },
}

impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Analyze {
                board,
                side,
                depth,
                time,
                nodes,
            } => run_analyze(board, side, depth, time, nodes)?,
            Command::Play { depth, time, white } => run_play(depth, time, white)?,
            Command::Bench { depth, preset } => run_bench(depth, preset)?,
        };

        Ok(())
    }
}
