//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// shortstat - short links with time-bucketed hit statistics
#[derive(Parser)]
#[command(name = "shortstat")]
#[command(version)]
#[command(about = "Short links with time-bucketed hit statistics", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Shorten a URL
    Add {
        /// Destination URL; `http://` is assumed when no scheme is given
        url: String,
    },

    /// Show where a code points
    Get {
        /// Short code
        code: String,
    },

    /// Show a link with its age and total hits
    Info {
        /// Short code
        code: String,
    },

    /// Delete a link record (its counters are kept)
    Delete {
        /// Short code
        code: String,
    },

    /// Record one hit by hand
    Hit {
        /// Short code
        code: String,

        /// ISO country code of the visitor
        #[arg(long)]
        country: Option<String>,

        /// Count the visit as bot traffic
        #[arg(long)]
        bot: bool,

        /// Browser name
        #[arg(long)]
        browser: Option<String>,

        /// Operating system name
        #[arg(long)]
        os: Option<String>,
    },

    /// Print a hit time series
    Stats {
        /// Short code
        code: String,

        /// hour, day, week, month, year or all
        granularity: String,

        /// Restrict to one category (country, browser or os)
        #[arg(long, requires = "value")]
        by: Option<String>,

        /// Category value to count, e.g. AR
        #[arg(long, requires = "by")]
        value: Option<String>,
    },

    /// Print the leaderboard of a category
    Top {
        /// Short code
        code: String,

        /// country, browser or os
        category: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether the command needs a store connection
    pub fn needs_store(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}
