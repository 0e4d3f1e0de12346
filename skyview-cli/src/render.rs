//! Text rendering of the dashboard state.

use chrono::{Local, NaiveDate};
use skyview_core::{Theme, ViewState, WeatherView, config::API_KEY_ENV};
use std::fmt::Write;

/// ANSI styles for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    accent: &'static str,
    muted: &'static str,
    error: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme, color: bool) -> Self {
        match (color, theme) {
            (false, _) => Self::plain(),
            (true, Theme::Light) => Self {
                accent: "\x1b[1;34m",
                muted: "\x1b[90m",
                error: "\x1b[31m",
                reset: "\x1b[0m",
            },
            (true, Theme::Dark) => Self {
                accent: "\x1b[1;96m",
                muted: "\x1b[37m",
                error: "\x1b[91m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            accent: "",
            muted: "",
            error: "",
            reset: "",
        }
    }
}

pub fn render(state: &ViewState, palette: Palette) -> String {
    render_on(state, palette, Local::now().date_naive())
}

fn render_on(state: &ViewState, p: Palette, today: NaiveDate) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("{}Loading...{}\n", p.muted, p.reset),
        ViewState::Error(message) => format!("{}✖ {message}{}\n", p.error, p.reset),
        ViewState::ConfigurationRequired => format!(
            "{}API Key Required{}\n\
             Add your OpenWeatherMap API key to the environment or the config file:\n  \
             {API_KEY_ENV}=your_key\n  \
             skyview configure\n",
            p.accent, p.reset
        ),
        ViewState::Ready(view) => render_view(view, p, today),
    }
}

fn render_view(view: &WeatherView, p: Palette, today: NaiveDate) -> String {
    let current = &view.current;
    let temp_unit = view.units.temperature_symbol();
    let d = &view.descriptors;

    let mut out = String::new();
    let _ = writeln!(out, "{}{}, {}{}", p.accent, current.place, current.country, p.reset);
    let _ = writeln!(out, "{}{}{}", p.muted, today.format("%A, %B %-d, %Y"), p.reset);
    let _ = writeln!(
        out,
        "{}  {}{}  {}",
        view.icon,
        round(current.temperature),
        temp_unit,
        current.description
    );
    let _ = writeln!(
        out,
        "{}Feels like {}{}{}",
        p.muted,
        round(current.feels_like),
        temp_unit,
        p.reset
    );
    out.push('\n');

    let stats = [
        (
            "Wind",
            format!("{} {}", current.wind_speed, view.units.speed_symbol()),
            d.wind.label(),
        ),
        ("Humidity", format!("{}%", current.humidity), d.humidity.label()),
        ("Pressure", format!("{} hPa", current.pressure), d.pressure.label()),
        (
            "Visibility",
            format!("{:.1} km", current.visibility / 1000.0),
            d.visibility.label(),
        ),
    ];
    for (name, value, label) in stats {
        let _ = writeln!(out, "{name:<11} {value:<12} {}{label}{}", p.muted, p.reset);
    }

    if !view.daily.is_empty() {
        out.push('\n');
        for day in &view.daily {
            let _ = writeln!(
                out,
                "{}{}{}  {}  {:>4}{}  {}",
                p.accent,
                day.weekday(),
                p.reset,
                day.icon,
                round(day.temperature),
                temp_unit,
                day.category
            );
        }
    }

    out
}

/// Halves round up toward +∞, so -0.5 shows as 0 and -2.5 as -2.
fn round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_core::{CurrentConditions, ForecastSample, UnitSystem, WeatherReport};

    fn view(forecast: Option<Vec<ForecastSample>>) -> WeatherView {
        WeatherView::build_in(
            WeatherReport {
                current: CurrentConditions {
                    place: "Manila".into(),
                    country: "PH".into(),
                    temperature: 29.6,
                    feels_like: 34.2,
                    humidity: 70.0,
                    pressure: 1008.0,
                    category: "Clouds".into(),
                    description: "broken clouds".into(),
                    wind_speed: 3.0,
                    visibility: 9000.0,
                },
                forecast,
            },
            UnitSystem::Metric,
            &chrono::Utc,
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    #[test]
    fn renders_current_conditions() {
        let state = ViewState::Ready(Box::new(view(None)));
        let out = render_on(&state, Palette::plain(), today());

        assert!(out.starts_with("Manila, PH\nMonday, January 1, 2024\n"));
        assert!(out.contains("30°C  broken clouds"));
        assert!(out.contains("3 m/s"));
        assert!(out.contains("Light breeze"));
        assert!(out.contains("1008 hPa"));
        assert!(out.contains("Normal pressure"));
        assert!(out.contains("9.0 km"));
        assert!(out.contains("Good visibility"));
        assert!(out.contains("Humid"));
    }

    #[test]
    fn renders_forecast_cards() {
        let forecast = (0..16i64)
            .map(|i| ForecastSample {
                timestamp: 1_704_067_200 + i * 3 * 3600,
                temperature: 21.5,
                category: "Rain".into(),
            })
            .collect();
        let state = ViewState::Ready(Box::new(view(Some(forecast))));
        let out = render_on(&state, Palette::plain(), today());

        assert!(out.contains("Tue"));
        assert!(out.contains("22°C  Rain"));
        assert!(!out.contains("Mon  "));
    }

    #[test]
    fn renders_error_banner_and_loading() {
        let out = render_on(&ViewState::Error("City not found".into()), Palette::plain(), today());
        assert_eq!(out, "✖ City not found\n");

        let out = render_on(&ViewState::Loading, Palette::plain(), today());
        assert_eq!(out, "Loading...\n");
    }

    #[test]
    fn renders_configuration_message() {
        let out = render_on(&ViewState::ConfigurationRequired, Palette::plain(), today());
        assert!(out.starts_with("API Key Required"));
        assert!(out.contains("OPENWEATHER_API_KEY=your_key"));
    }

    #[test]
    fn dark_palette_differs_from_light() {
        let state = ViewState::Error("x".into());
        let light = render_on(&state, Palette::for_theme(Theme::Light, true), today());
        let dark = render_on(&state, Palette::for_theme(Theme::Dark, true), today());
        assert_ne!(light, dark);
        assert!(dark.contains("\x1b[91m"));
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -2);
        assert_eq!(round(-0.5), 0);
        assert_eq!(round(-0.6), -1);
        assert_eq!(round(29.4), 29);
    }

    #[test]
    fn negative_half_degree_renders_as_zero() {
        let mut v = view(None);
        v.current.temperature = -0.5;
        let out = render_on(&ViewState::Ready(Box::new(v)), Palette::plain(), today());
        assert!(out.contains("  0°C  broken clouds"));
        assert!(!out.contains("-0°C"));
    }
}
