//! llamachat - settings for the llamachat Groq client.
//!
//! This is the main entry point for the llamachat CLI.

mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{init_logging, open_storage, reset_settings, set_setting, show_settings};
use llamachat_core::AppConfig;
use llamachat_tui_dialog::SettingsResult;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "llamachat")]
#[command(author, version, about = "Settings for the llamachat Groq client", long_about = None)]
struct Cli {
    /// Directory holding stored settings
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand (defaults to opening the settings panel)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the settings panel
    Settings,
    /// Print the effective settings
    Show {
        /// Print credentials in clear text
        #[arg(long)]
        reveal: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store one setting
    Set {
        /// Field name (mode, model, systemPrompt, apiToken, dbConnectionString)
        field: String,
        /// New value, stored verbatim
        value: String,
    },
    /// Remove all stored settings
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, sources) = AppConfig::load().await?;

    let interactive = matches!(cli.command, None | Some(Commands::Settings));
    let log_file = init_logging(cli.verbose, interactive, config.log_level);
    if let Some(path) = &log_file {
        debug!(path = %path.display(), "Logging to file");
    }
    for source in &sources {
        debug!(path = %source.display(), "Loaded config");
    }

    let store = open_storage(cli.data_dir, &config)?;
    info!(path = %store.base_path().display(), "Using settings store");

    match cli.command.unwrap_or(Commands::Settings) {
        Commands::Settings => {
            if app::run(&store).await? == SettingsResult::Saved {
                println!("Settings saved.");
            }
        }
        Commands::Show { reveal, json } => show_settings(&store, reveal, json)?,
        Commands::Set { field, value } => {
            let key = set_setting(&store, &field, &value)?;
            println!("Saved {}.", key.label());
        }
        Commands::Reset => {
            reset_settings(&store)?;
            println!("Settings reset to defaults.");
        }
    }

    Ok(())
}
