use std::{
    io::{self, Stdout},
    process::ExitCode,
};

use anyhow::{Context, bail};
use citywx_core::{Config, Controller, OpenWeatherClient, Presenter, UiState};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

use crate::terminal::TerminalSurface;

type TerminalController =
    Controller<OpenWeatherClient, OpenWeatherClient, TerminalSurface<Stdout>>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citywx", version, about = "Current weather for a city")]
pub struct Cli {
    /// Runs an interactive search prompt when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => configure().map(|_| ExitCode::SUCCESS),
            Some(Command::ConfigPath) => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Show { city }) => {
                let mut controller = build_controller(&Config::load()?);
                let state = controller.search(&city.join(" ")).await;
                Ok(match state {
                    UiState::Result => ExitCode::SUCCESS,
                    _ => ExitCode::FAILURE,
                })
            }
            None => interactive(&Config::load()?).await.map(|_| ExitCode::SUCCESS),
        }
    }
}

fn build_controller(config: &Config) -> TerminalController {
    let client = OpenWeatherClient::from_config(config);
    let presenter = Presenter::with_icon_template(
        TerminalSurface::new(io::stdout()),
        config.endpoints.icon_url_template.clone(),
    );
    Controller::new(client.clone(), client, presenter)
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let mut controller = build_controller(config);
    println!("Enter a city name to see the current weather.");

    loop {
        let input = Text::new("City:")
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        match input {
            Ok(city) => {
                controller.search(&city).await;
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key);
    if config.api_key().is_err() {
        bail!("That does not look like an API key; nothing was saved.");
    }

    config.save()?;
    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}
