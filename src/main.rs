use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use shortstat::cli::{Cli, CliError, run_cli_command, run_offline_command};
use shortstat::clock::{Calendar, CalendarZone};
use shortstat::config::init_config;
use shortstat::services::Shortener;
use shortstat::storage::{KvStore, RedisStore, open_store};
use shortstat::system::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if !cli.command.needs_store() {
        if let Err(e) = run_offline_command(cli.command).await {
            exit_with(e);
        }
        return Ok(());
    }

    let config = init_config(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging)?;
    debug!("Configuration: {:?}", config);

    let store: Arc<dyn KvStore> = if config.store.backend.eq_ignore_ascii_case("redis") {
        // 启动时探测一次，连接失败尽早报错
        let redis = RedisStore::new(&config.store)?;
        redis.ping().await?;
        Arc::new(redis)
    } else {
        open_store(&config.store)?
    };
    info!("Using {} store", store.name());

    let calendar = Calendar::system(CalendarZone::from_config(&config.stats.timezone));
    let shortener = Shortener::from_config(store, &config, calendar);

    if let Err(e) = run_cli_command(cli.command, &shortener).await {
        exit_with(e);
    }
    Ok(())
}

fn exit_with(err: CliError) -> ! {
    eprintln!("{}", err.format_colored());
    process::exit(1);
}
