use anyhow::bail;
use clap::Parser;
use inquire::error::InquireResult;
use tracing_subscriber::EnvFilter;

mod cli;

use webapp_manager::config::Config;
use webapp_manager::favicon;
use webapp_manager::launchers::{AppDirs, WebAppManager};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Favicon { url, discard } => {
            let config = Config::load()?;
            let candidates = favicon::discover(&url, &config.favicon);

            let summaries: Vec<_> = candidates.iter().map(|c| c.summary()).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);

            if discard {
                for candidate in candidates {
                    let path = candidate.path.clone();
                    if let Err(err) = candidate.discard() {
                        log::warn!("could not remove {}: {err}", path.display());
                    }
                }
            }
            Ok(())
        }

        cli::Command::List {} => {
            let manager = WebAppManager::new(AppDirs::discover()?)?;
            let launchers = manager.list()?;
            println!("{}", serde_json::to_string_pretty(&launchers)?);
            Ok(())
        }

        cli::Command::Delete { codename, yes } => {
            let manager = WebAppManager::new(AppDirs::discover()?)?;
            let launcher = manager.find(&codename)?;

            if !yes {
                let name = launcher.name.as_deref().unwrap_or(&codename);
                match inquire::prompt_confirmation(format!(
                    "Are you sure you want to delete {name}?"
                )) {
                    InquireResult::Ok(true) => {}
                    InquireResult::Ok(false) => return Ok(()),
                    InquireResult::Err(err) => bail!("An error occurred: {}", err),
                }
            }

            manager.delete(&launcher)?;
            println!("{codename} removed");
            Ok(())
        }
    }
}
