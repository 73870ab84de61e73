//! CLI interface module
//!
//! Thin client over [`Shortener`]: every command maps to one facade call
//! and prints the result.

mod args;
pub mod commands;

pub use args::{Cli, Commands, ConfigCommands};

use std::fmt;

use colored::Colorize;

use crate::errors::ShortstatError;
use crate::services::Shortener;
use commands::{
    add_link, delete_link, generate_config, get_link, link_info, record_hit, show_category_series,
    show_series, show_top,
};

#[derive(Debug)]
pub enum CliError {
    ParseError(String),
    CommandError(String),
    ServiceError(ShortstatError),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::ServiceError(err) => err.format_simple(),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        match self {
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::ServiceError(err) => err.format_colored(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortstatError> for CliError {
    fn from(err: ShortstatError) -> Self {
        match err {
            ShortstatError::InvalidGranularity(msg) | ShortstatError::InvalidCategory(msg) => {
                CliError::ParseError(msg)
            }
            other => CliError::ServiceError(other),
        }
    }
}

/// Commands that run without a store
pub async fn run_offline_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => generate_config(output_path, force).await,
        _ => Err(CliError::CommandError(
            "This command needs a store connection".to_string(),
        )),
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, shortener: &Shortener) -> Result<(), CliError> {
    match cmd {
        Commands::Add { url } => add_link(shortener, &url).await,
        Commands::Get { code } => get_link(shortener, &code).await,
        Commands::Info { code } => link_info(shortener, &code).await,
        Commands::Delete { code } => delete_link(shortener, &code).await,
        Commands::Hit {
            code,
            country,
            bot,
            browser,
            os,
        } => record_hit(shortener, &code, country, bot, browser, os).await,
        Commands::Stats {
            code,
            granularity,
            by,
            value,
        } => match (by, value) {
            (Some(by), Some(value)) => {
                show_category_series(shortener, &code, &granularity, &by, &value).await
            }
            _ => show_series(shortener, &code, &granularity).await,
        },
        Commands::Top { code, category } => show_top(shortener, &code, &category).await,
        cmd @ Commands::Config { .. } => run_offline_command(cmd).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_input_maps_to_parse_error() {
        let err: CliError = ShortstatError::invalid_granularity("decade").into();
        assert!(matches!(err, CliError::ParseError(_)));

        let err: CliError = ShortstatError::store("down").into();
        assert!(matches!(err, CliError::ServiceError(_)));
        assert!(err.format_simple().contains("down"));
    }
}
