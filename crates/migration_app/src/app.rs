use std::process::ExitCode;

use anyhow::{Context, Result};
use engine_logging::{engine_error, engine_info};
use log::LevelFilter;
use migration_engine::{build_client, check_connection, Migrator, WordPressClient};

use crate::check;
use crate::cli::{Cli, Command};
use crate::config;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let console_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match cli.command {
        Command::InitConfig { force } => {
            config::write_example(&cli.config, force)
                .with_context(|| format!("failed to write {}", cli.config.display()))?;
            println!("Wrote example configuration to {}", cli.config.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let app_config = load_config(&cli)?;
            engine_logging::initialize_console(console_level);
            run_check(&app_config)
        }
        Command::Migrate { dry_run } => {
            let app_config = load_config(&cli)?;
            if let Some(log_path) =
                engine_logging::initialize_run_logger(&app_config.output.logs_dir, console_level)
            {
                engine_info!("Logging to {}", log_path.display());
            }
            if dry_run {
                engine_info!("DRY RUN MODE - No posts will be created");
            }
            run_migrate(&app_config, dry_run)
        }
    }
}

fn load_config(cli: &Cli) -> Result<config::AppConfig> {
    config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn run_check(app_config: &config::AppConfig) -> Result<ExitCode> {
    let migration = app_config.to_migration_config(false);
    let client = build_client(&migration.fetch).context("failed to build HTTP client")?;
    let report = runtime()?.block_on(check_connection(&migration, client));

    for line in check::render(&report) {
        println!("{line}");
    }
    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_migrate(app_config: &config::AppConfig, dry_run: bool) -> Result<ExitCode> {
    let migration = app_config.to_migration_config(dry_run);
    let client = build_client(&migration.fetch).context("failed to build HTTP client")?;
    let site = WordPressClient::new(
        client.clone(),
        &migration.site_url,
        &migration.api_base,
        migration.credentials.clone(),
        migration.fetch.clone(),
    );
    let migrator = Migrator::new(&migration, client, site);
    let summary = runtime()?.block_on(migrator.run_and_report(interrupted()));

    Ok(if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        engine_error!("Unable to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
