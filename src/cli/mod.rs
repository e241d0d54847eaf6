pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "downcharts")]
#[command(about = "Download top music charts", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/downcharts/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the charts of a configured site
    Charts {
        /// Site id from the configuration file
        site: String,

        /// Read a saved HTML page instead of launching a browser
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the charts as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured sites
    Sites,
    /// Parse a bot command and show how it is classified
    Parse {
        /// Command text, with or without the trigger marker
        text: String,
    },
    /// Answer the trigger comments of a comment search result
    Bot {
        /// JSON file with a `data` array of comments, or `-` for stdin
        comments: PathBuf,

        /// Number of comments handled at once
        #[arg(short, long)]
        workers: Option<usize>,
    },
}
