use clap::{Parser, Subcommand};
use meteo_core::Store;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key used for weather lookups.
    Configure,

    /// Launch the dashboard (the default when no command is given).
    Dashboard {
        /// City to search for right away.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Dashboard { city: None }) {
            Command::Configure => configure(),
            Command::Dashboard { city } => crate::app::run(city).await,
        }
    }
}

/// Interactive credential setup.
fn configure() -> anyhow::Result<()> {
    let mut store = Store::open();

    let api_key = inquire::Text::new("OpenWeatherMap API key:")
        .with_help_message("Created under \"API keys\" on your OpenWeatherMap account")
        .prompt()?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    store.set_api_key(api_key.to_owned());
    match Store::config_file_path() {
        Some(path) => println!("API key saved to {}", path.display()),
        None => println!("Warning: no config directory available, the key could not be saved"),
    }
    Ok(())
}
