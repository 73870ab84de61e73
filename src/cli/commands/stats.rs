//! Statistics commands

use colored::Colorize;

use crate::analytics::Stat;
use crate::cli::CliError;
use crate::services::{Shortener, parse_category};

pub async fn show_series(
    shortener: &Shortener,
    code: &str,
    granularity: &str,
) -> Result<(), CliError> {
    let series = shortener.series_stats(code, granularity).await?;
    println!(
        "{} {} ({})",
        "Hits for".bold(),
        code.cyan(),
        granularity.to_lowercase().yellow()
    );
    print_table(&series);
    Ok(())
}

pub async fn show_category_series(
    shortener: &Shortener,
    code: &str,
    granularity: &str,
    category: &str,
    value: &str,
) -> Result<(), CliError> {
    let category = parse_category(category)?;
    let series = shortener
        .category_series_stats(code, category, value, granularity)
        .await?;
    println!(
        "{} {} {}={} ({})",
        "Hits for".bold(),
        code.cyan(),
        category.to_string().yellow(),
        value.yellow(),
        granularity.to_lowercase().yellow()
    );
    print_table(&series);
    Ok(())
}

pub async fn show_top(shortener: &Shortener, code: &str, category: &str) -> Result<(), CliError> {
    let category = parse_category(category)?;
    let top = shortener.category_stats(code, category).await?;

    if top.is_empty() {
        println!("{} No {} data for {}", "ℹ".bold().blue(), category, code.cyan());
        return Ok(());
    }

    println!("{} {} ({})", "Top".bold(), category.to_string().yellow(), code.cyan());
    print_table(&top);
    Ok(())
}

fn print_table(stats: &[Stat]) {
    let width = stats.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for stat in stats {
        let value = if stat.value > 0 {
            stat.value.to_string().green()
        } else {
            stat.value.to_string().dimmed()
        };
        println!("  {:<width$}  {}", stat.name, value, width = width);
    }
}
