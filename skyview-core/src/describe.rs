//! Qualitative labels for raw weather readings.
//!
//! Every classifier is total: bands are half-open on the upper side, so a
//! reading exactly on a threshold lands in the higher band, and NaN (which
//! compares false against everything) lands in the top band.

use std::fmt;

use crate::model::{CurrentConditions, UnitSystem};

macro_rules! labelled {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled!(
    /// Ordered by severity.
    WindDescriptor {
        Calm => "Calm",
        LightBreeze => "Light breeze",
        ModerateBreeze => "Moderate breeze",
        StrongBreeze => "Strong breeze",
        VeryStrongWind => "Very strong wind",
    }
);

labelled!(HumidityDescriptor {
    Dry => "Dry",
    Comfortable => "Comfortable",
    Humid => "Humid",
    VeryHumid => "Very humid",
});

labelled!(PressureDescriptor {
    Low => "Low pressure",
    Normal => "Normal pressure",
    High => "High pressure",
});

labelled!(VisibilityDescriptor {
    Poor => "Poor visibility",
    Moderate => "Moderate visibility",
    Good => "Good visibility",
    Excellent => "Excellent visibility",
});

/// Index of the first upper bound `value` is strictly below, or `bounds.len()`.
fn band(value: f64, bounds: &[f64]) -> usize {
    bounds
        .iter()
        .position(|&upper| value < upper)
        .unwrap_or(bounds.len())
}

/// Wind speed in m/s for metric, mph for imperial.
pub fn wind_descriptor(speed: f64, units: UnitSystem) -> WindDescriptor {
    let bounds: &[f64] = match units {
        UnitSystem::Metric => &[1.0, 6.0, 12.0, 20.0],
        UnitSystem::Imperial => &[2.0, 13.0, 27.0, 45.0],
    };
    WindDescriptor::ALL[band(speed, bounds)]
}

/// Relative humidity in percent.
pub fn humidity_descriptor(humidity: f64) -> HumidityDescriptor {
    HumidityDescriptor::ALL[band(humidity, &[30.0, 60.0, 80.0])]
}

/// Pressure in hPa.
pub fn pressure_descriptor(pressure: f64) -> PressureDescriptor {
    PressureDescriptor::ALL[band(pressure, &[1000.0, 1013.0])]
}

/// Visibility in meters; thresholds are applied in kilometers.
pub fn visibility_descriptor(visibility: f64) -> VisibilityDescriptor {
    let km = visibility / 1000.0;
    VisibilityDescriptor::ALL[band(km, &[1.0, 4.0, 10.0])]
}

/// The four labels shown next to the current-conditions stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptors {
    pub wind: WindDescriptor,
    pub humidity: HumidityDescriptor,
    pub pressure: PressureDescriptor,
    pub visibility: VisibilityDescriptor,
}

impl Descriptors {
    pub fn for_conditions(current: &CurrentConditions, units: UnitSystem) -> Self {
        Self {
            wind: wind_descriptor(current.wind_speed, units),
            humidity: humidity_descriptor(current.humidity),
            pressure: pressure_descriptor(current.pressure),
            visibility: visibility_descriptor(current.visibility),
        }
    }
}
