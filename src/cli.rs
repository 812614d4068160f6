use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "planogram-bot")]
#[command(author, version, about = "Telegram bot that finds a product's shelf location by EAN or SAP code", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default when no command is given)
    Run,

    /// Validate a spreadsheet offline and print what the bot would load
    Check {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,

        /// Also look up this code in the file
        #[arg(short, long)]
        code: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
