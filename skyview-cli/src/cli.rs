use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Text};
use skyview_core::{
    Config, Dashboard, FileStore, PreferenceStore, Theme, UnitSystem, provider_from_config,
};
use std::io::IsTerminal;

use crate::{
    interactive,
    render::{Palette, render},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Units {
    Metric,
    Imperial,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => UnitSystem::Metric,
            Units::Imperial => UnitSystem::Imperial,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key (and optionally a startup city).
    Configure,

    /// Show current weather and the forecast for a city.
    Show {
        /// City name; defaults to the configured startup city.
        city: Option<String>,

        /// Switch the unit system before fetching (remembered).
        #[arg(long, value_enum)]
        units: Option<Units>,
    },

    /// Interactive dashboard: search cities, switch units and theme.
    Dashboard,

    /// Set the remembered unit system.
    Units {
        #[arg(value_enum)]
        units: Units,
    },

    /// Set or toggle the remembered theme.
    Theme {
        #[arg(value_enum)]
        theme: ThemeChoice,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Dashboard) {
            Command::Configure => configure(config)?,
            Command::Show { city, units } => {
                if let Some(units) = units {
                    preference_store()?.save_unit_system(units.into())?;
                }

                let mut dash = open_dashboard(&config)?;
                match city {
                    Some(city) if !city.trim().is_empty() => {
                        dash.search(&city).await;
                    }
                    _ => dash.startup().await,
                }

                print!("{}", render(dash.state(), palette(dash.preferences().theme)));
            }
            Command::Dashboard => {
                let mut dash = open_dashboard(&config)?;
                interactive::run(&mut dash).await?;
            }
            Command::Units { units } => {
                let units = UnitSystem::from(units);
                preference_store()?.save_unit_system(units)?;
                println!("Units set to {units}.");
            }
            Command::Theme { theme } => {
                let mut store = preference_store()?;
                let theme = match theme {
                    ThemeChoice::Light => Theme::Light,
                    ThemeChoice::Dark => Theme::Dark,
                    ThemeChoice::Toggle => store.load().theme.toggled(),
                };
                store.save_theme(theme)?;
                println!("Theme set to {theme}.");
            }
        }

        Ok(())
    }
}

fn preference_store() -> anyhow::Result<PreferenceStore<FileStore>> {
    Ok(PreferenceStore::new(FileStore::open_default()?))
}

/// A missing credential is not an error here: the dashboard shows setup help.
fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard<FileStore>> {
    Ok(Dashboard::new(
        provider_from_config(config),
        preference_store()?,
        config.startup_city(),
    ))
}

pub fn palette(theme: Theme) -> Palette {
    Palette::for_theme(theme, std::io::stdout().is_terminal())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    let city = Text::new("Startup city:")
        .with_default(config.startup_city())
        .prompt()
        .context("Failed to read startup city")?;
    if !city.trim().is_empty() {
        config.default_city = Some(city.trim().to_string());
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}
