use clap::Parser;

use crate::deck::AttributeSelection;

/// Pairs on the board when no `--pairs` flag is given (a 20-card board).
pub const DEFAULT_PAIR_COUNT: usize = 10;

#[derive(Debug, Parser)]
#[command(name = "pairs-cli", version, about = "Memory-matching pairs card game")]
pub struct Cli {
    /// Seed for a reproducible first deal (same as --seed)
    #[arg(value_name = "SEED", conflicts_with = "seed")]
    seed_pos: Option<u64>,

    /// Seed for a reproducible first deal
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of pairs on the board (1-32)
    #[arg(short, long, default_value_t = DEFAULT_PAIR_COUNT)]
    pairs: usize,

    /// Pick card faces at random instead of in fixed order
    #[arg(short, long)]
    random_attributes: bool,
}

/// Startup options taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub pair_count: usize,
    /// Fixed seed for the first deal; later deals draw a fresh one.
    pub seed: Option<u64>,
    pub selection: AttributeSelection,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            pair_count: DEFAULT_PAIR_COUNT,
            seed: None,
            selection: AttributeSelection::Sequential,
        }
    }
}

impl From<Cli> for GameConfig {
    fn from(cli: Cli) -> Self {
        let selection = if cli.random_attributes {
            AttributeSelection::Sampled
        } else {
            AttributeSelection::Sequential
        };
        GameConfig {
            pair_count: cli.pairs,
            seed: cli.seed.or(cli.seed_pos),
            selection,
        }
    }
}
