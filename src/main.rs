mod cli;
mod logging;

use std::process;

use clap::Parser;
use dotenv::dotenv;
use tracing::error;

use profile_sweeper::AppConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = cli::Cli::parse();

    if let Err(err) = run(config, &args.desired_prefix) {
        error!("Error: {}", err);
        process::exit(1);
    }

    Ok(())
}

#[cfg(windows)]
fn run(config: AppConfig, desired_prefix: &str) -> Result<(), profile_sweeper::Error> {
    use profile_sweeper::backup::RegExeExporter;
    use profile_sweeper::registry::windows::WindowsRegistry;
    use profile_sweeper::SweepEngine;

    let store = WindowsRegistry::new();
    let exporter = RegExeExporter::new();
    let engine = SweepEngine::new(config, &store, &exporter);
    let result = engine.run(desired_prefix)?;
    print_summary(&result);
    Ok(())
}

#[cfg(not(windows))]
fn run(_config: AppConfig, _desired_prefix: &str) -> Result<(), profile_sweeper::Error> {
    Err(profile_sweeper::Error::Other(
        "profile-sweeper only runs against the live registry on Windows".to_string(),
    ))
}

#[cfg(windows)]
fn print_summary(result: &profile_sweeper::SweepResult) {
    use colored::*;
    use tracing::info;

    println!();
    info!(
        "Read: {}, Backup: {}, Delete: {}",
        format!("{:.2}s", result.read_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.backup_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.delete_duration.as_secs_f64()).green(),
    );
    info!(
        "{} entries, {} duplicate path groups, {} selected for removal",
        format!("{}", result.entries_seen).cyan(),
        format!("{}", result.duplicate_groups).red(),
        format!("{}", result.removal_candidates).red(),
    );
    info!(
        "{} removed ({} with secondary key), {} failed",
        format!("{}", result.removed).green(),
        format!("{}", result.secondary_removed).green(),
        format!("{}", result.failed).red(),
    );
}
