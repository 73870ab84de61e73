//! Link commands

use chrono::Utc;
use colored::Colorize;

use crate::analytics::VisitorContext;
use crate::cli::CliError;
use crate::errors::ShortstatError;
use crate::services::Shortener;
use crate::utils::relative_time;

pub async fn add_link(shortener: &Shortener, url: &str) -> Result<(), CliError> {
    let record = shortener.create_link(url).await?;
    println!(
        "{} Added short link: {} -> {}",
        "✓".bold().green(),
        record.code.cyan(),
        record.destination.blue().underline()
    );
    Ok(())
}

pub async fn get_link(shortener: &Shortener, code: &str) -> Result<(), CliError> {
    match shortener.lookup_link(code).await? {
        Some(record) => {
            println!("{}", record.destination);
            Ok(())
        }
        None => Err(not_found(code)),
    }
}

pub async fn link_info(shortener: &Shortener, code: &str) -> Result<(), CliError> {
    let Some(summary) = shortener.summary(code).await? else {
        return Err(not_found(code));
    };

    let record = &summary.record;
    println!("{} {}", "Code:".bold(), record.code.cyan());
    println!(
        "{} {}",
        "Destination:".bold(),
        record.destination.blue().underline()
    );
    println!(
        "{} {} {}",
        "Created:".bold(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        format!("({})", relative_time(record.created_at, Utc::now())).dimmed()
    );
    println!(
        "{} {}",
        "Total hits:".bold(),
        summary.total_hits.to_string().green()
    );
    Ok(())
}

pub async fn delete_link(shortener: &Shortener, code: &str) -> Result<(), CliError> {
    if !shortener.delete_link(code).await? {
        return Err(not_found(code));
    }
    println!("{} Deleted short link: {}", "✓".bold().green(), code.cyan());
    Ok(())
}

pub async fn record_hit(
    shortener: &Shortener,
    code: &str,
    country: Option<String>,
    bot: bool,
    browser: Option<String>,
    os: Option<String>,
) -> Result<(), CliError> {
    let visitor = VisitorContext {
        country,
        is_bot: bot,
        browser,
        browser_version: None,
        os,
    };

    // 等待后台写入结束再退出进程
    shortener
        .record_hit(code, visitor)
        .await
        .map_err(|e| CliError::CommandError(format!("Hit task failed: {}", e)))?;

    let total = shortener.total_hits(code).await?;
    println!(
        "{} Recorded hit for {} (total: {})",
        "✓".bold().green(),
        code.cyan(),
        total.to_string().green()
    );
    Ok(())
}

fn not_found(code: &str) -> CliError {
    ShortstatError::not_found(format!("Short link does not exist: {}", code)).into()
}
