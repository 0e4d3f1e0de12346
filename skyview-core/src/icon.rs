use std::fmt;

/// Visual representation of a condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    Cloud,
    CloudRain,
    CloudDrizzle,
    CloudLightning,
    CloudSnow,
    CloudFog,
}

impl Icon {
    /// Stable identifier, usable as an icon-set key.
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Cloud => "cloud",
            Icon::CloudRain => "cloud_rain",
            Icon::CloudDrizzle => "cloud_drizzle",
            Icon::CloudLightning => "cloud_lightning",
            Icon::CloudSnow => "cloud_snow",
            Icon::CloudFog => "cloud_fog",
        }
    }

    /// Terminal glyph.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::Cloud => "☁",
            Icon::CloudRain => "🌧",
            Icon::CloudDrizzle => "🌦",
            Icon::CloudLightning => "⛈",
            Icon::CloudSnow => "🌨",
            Icon::CloudFog => "🌫",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Case-insensitive; unknown categories get the generic cloud.
pub fn icon_for(category: &str) -> Icon {
    match category.to_lowercase().as_str() {
        "clear" => Icon::Sun,
        "clouds" => Icon::Cloud,
        "rain" => Icon::CloudRain,
        "drizzle" => Icon::CloudDrizzle,
        "thunderstorm" => Icon::CloudLightning,
        "snow" => Icon::CloudSnow,
        "mist" | "fog" | "haze" => Icon::CloudFog,
        _ => Icon::Cloud,
    }
}
