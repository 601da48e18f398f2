use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use std::process::ExitCode;
use weather_core::{
    Config, ForecastSource, QueryController, QueryError, Trigger, WeatherApiProvider, WeatherReport,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure,

    /// Show weather for a city and exit.
    Show {
        /// City or location name.
        city: String,
    },

    /// Prompt for cities until Esc or Ctrl-C (the default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => {
                let controller = controller_from_disk()?;
                controller.update_city_text(&city);

                let outcome = run_query(&controller, Trigger::Action).await;
                if let Err(QueryError::Validation) = outcome {
                    println!("{}", render::render_validation());
                } else {
                    println!("{}", render::render_state(&controller.state()));
                }

                Ok(if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Some(Command::Interactive) | None => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(key_prompt_help(&config))
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

fn key_prompt_help(config: &Config) -> &'static str {
    if config.is_configured() {
        "A key is already stored; entering a new one replaces it"
    } else {
        "Get a free key at https://www.weatherapi.com/"
    }
}

fn controller_from_disk() -> anyhow::Result<QueryController<WeatherApiProvider>> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(QueryController::with_ordering(provider, config.query.ordering))
}

async fn interactive() -> anyhow::Result<ExitCode> {
    let controller = controller_from_disk()?;
    println!("{}", render::render_state(&controller.state()));

    loop {
        let input = match Text::new("City:")
            .with_placeholder("Enter city name...")
            .with_help_message("Enter to search, Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        controller.update_city_text(&input);

        match run_query(&controller, Trigger::Confirm).await {
            Err(QueryError::Validation) => println!("{}", render::render_validation()),
            _ => println!("{}", render::render_state(&controller.state())),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Submit the current city text, printing the loading line while the
/// request is in flight.
async fn run_query<S: ForecastSource>(
    controller: &QueryController<S>,
    trigger: Trigger,
) -> Result<WeatherReport, QueryError> {
    let (outcome, ()) = tokio::join!(controller.submit(trigger), async {
        // By the time this resumes the query has been polled at least once.
        tokio::task::yield_now().await;
        let state = controller.state();
        if state.is_loading() {
            println!("{}", render::render_state(&state));
        }
    });

    outcome
}
