//! Interactive dashboard loop.

use anyhow::Context;
use inquire::{InquireError, Text};
use skyview_core::{Dashboard, KeyValueStore, UnitSystem, ViewState};

use crate::{cli::palette, render::render};

const PROMPT_HELP: &str = "Enter a city. :c / :f switch units, :theme toggles theme, :q quits.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Units(UnitSystem),
    ToggleTheme,
    Quit,
    /// Blank input: nothing to do.
    Nothing,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Input::Nothing,
        ":c" => Input::Units(UnitSystem::Metric),
        ":f" => Input::Units(UnitSystem::Imperial),
        ":theme" | ":t" => Input::ToggleTheme,
        ":q" | ":quit" => Input::Quit,
        _ => Input::Search(line.to_string()),
    }
}

pub async fn run<S: KeyValueStore>(dash: &mut Dashboard<S>) -> anyhow::Result<()> {
    refresh(dash).await;

    loop {
        let line = match Text::new("Search:").with_help_message(PROMPT_HELP).prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse_input(&line) {
            Input::Nothing => {}
            Input::Quit => break,
            Input::Search(city) => {
                if dash.select_city(&city) {
                    refresh(dash).await;
                }
            }
            Input::Units(units) => match dash.select_unit_system(units) {
                Ok(true) => refresh(dash).await,
                Ok(false) => {}
                Err(e) => report_write_error(dash, &e),
            },
            Input::ToggleTheme => match dash.toggle_theme() {
                Ok(theme) => {
                    tracing::debug!(%theme, "theme toggled");
                    show(dash);
                }
                Err(e) => report_write_error(dash, &e),
            },
        }
    }

    Ok(())
}

/// Fetch the current city, showing the loading indicator while waiting.
async fn refresh<S: KeyValueStore>(dash: &mut Dashboard<S>) {
    let Some(request) = dash.begin_fetch() else {
        show(dash);
        return;
    };
    show(dash);

    let result = dash.run_fetch(&request).await;
    dash.complete_fetch(request, result);
    show(dash);
}

/// The session continues with the previous preference.
fn report_write_error<S: KeyValueStore>(dash: &Dashboard<S>, e: &anyhow::Error) {
    tracing::warn!("failed to save preference: {e:#}");
    let p = palette(dash.preferences().theme);
    print!("{}", render(&ViewState::Error(format!("Could not save preference: {e}")), p));
}

fn show<S: KeyValueStore>(dash: &Dashboard<S>) {
    print!("{}", render(dash.state(), palette(dash.preferences().theme)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_does_nothing() {
        assert_eq!(parse_input(""), Input::Nothing);
        assert_eq!(parse_input("   \t"), Input::Nothing);
    }

    #[test]
    fn unit_commands() {
        assert_eq!(parse_input(":c"), Input::Units(UnitSystem::Metric));
        assert_eq!(parse_input(" :F "), Input::Units(UnitSystem::Imperial));
    }

    #[test]
    fn theme_and_quit() {
        assert_eq!(parse_input(":theme"), Input::ToggleTheme);
        assert_eq!(parse_input(":q"), Input::Quit);
    }

    #[test]
    fn anything_else_is_a_trimmed_search() {
        assert_eq!(parse_input("  New York "), Input::Search("New York".into()));
    }
}
