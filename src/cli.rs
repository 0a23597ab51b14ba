use clap::{Parser, Subcommand};

use crate::recipe_loader::DEFAULT_BATCH_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the Food.com recipe CSV into the recipe database (full replace)
    LoadRecipes {
        /// Path to RAW_recipes.csv
        #[arg(short, long)]
        csv_file: String,
        /// Path to the SQLite recipe database
        #[arg(short, long, default_value = "recipes.db")]
        database: String,
        /// Accepted rows per bulk insert
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Search loaded recipes by detected ingredients and/or a free-text prompt
    Search {
        /// A detected ingredient name (repeatable)
        #[arg(short, long)]
        ingredient: Vec<String>,
        /// Free-text search prompt
        #[arg(short, long, default_value = "")]
        prompt: String,
        /// Path to the SQLite recipe database
        #[arg(short, long, default_value = "recipes.db")]
        database: String,
        /// Skip Gemini enrichment even when GEMINI_API_KEY is set
        #[arg(long)]
        no_ai: bool,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
