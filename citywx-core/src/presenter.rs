use chrono::{Local, NaiveDate};

use crate::{
    config::DEFAULT_ICON_URL_TEMPLATE,
    model::CurrentConditions,
    surface::{Slot, Surface},
};

/// Background treatment keyed by the coarse weather category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    /// Mist, smoke, haze, dust, fog, sand, ash, squalls, tornadoes.
    Atmosphere,
    Default,
}

impl Background {
    /// Case-insensitive; anything unrecognised gets [`Background::Default`].
    pub fn for_condition(condition_main: &str) -> Self {
        match condition_main.to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" | "drizzle" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall" | "tornado" => {
                Self::Atmosphere
            }
            _ => Self::Default,
        }
    }

    pub fn gradient(&self) -> &'static str {
        match self {
            Self::Clear => "linear-gradient(135deg, #1e3a8a 0%, #0ea5e9 100%)",
            Self::Clouds => "linear-gradient(135deg, #4b5563 0%, #78909c 100%)",
            Self::Rain => "linear-gradient(135deg, #2c3e50 0%, #546e7a 100%)",
            Self::Thunderstorm => "linear-gradient(135deg, #1a237e 0%, #3f51b5 100%)",
            Self::Snow => "linear-gradient(135deg, #eceff1 0%, #b0bec5 100%)",
            Self::Atmosphere => "linear-gradient(135deg, #757575 0%, #9e9e9e 100%)",
            Self::Default => "linear-gradient(135deg, #1e3a8a 0%, #3b82f6 100%)",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Atmosphere => "atmosphere",
            Self::Default => "default",
        }
    }
}

/// Round half up, the way the card has always displayed temperatures
/// (-2.5 shows as -2, not -3).
pub fn round_temperature(celsius: f64) -> i64 {
    // `round` breaks ties away from zero; pull negative ties back up.
    let rounded = celsius.round();
    if celsius - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

/// One decimal, ties rounded up (1.25 km shows as "1.3 km").
pub fn format_visibility_km(km: f64) -> String {
    let tenths = (km * 10.0).round() as u64;
    format!("{}.{} km", tenths / 10, tenths % 10)
}

pub fn format_visibility_meters(meters: u32) -> String {
    let tenths = (meters + 50) / 100;
    format!("{}.{} km", tenths / 10, tenths % 10)
}

/// Long-form date, e.g. "Friday, October 16, 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Maps current conditions onto the fixed weather card. Constructed once
/// and owns the surface it writes to.
#[derive(Debug)]
pub struct Presenter<S> {
    surface: S,
    icon_url_template: String,
}

impl<S: Surface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_icon_template(surface, DEFAULT_ICON_URL_TEMPLATE)
    }

    pub fn with_icon_template(surface: S, icon_url_template: impl Into<String>) -> Self {
        Self {
            surface,
            icon_url_template: icon_url_template.into(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn icon_url(&self, icon_code: &str) -> String {
        self.icon_url_template.replace("{icon}", icon_code)
    }

    /// Render using today's local date.
    pub fn render(&mut self, conditions: &CurrentConditions) {
        self.render_on(conditions, Local::now().date_naive());
    }

    pub fn render_on(&mut self, conditions: &CurrentConditions, today: NaiveDate) {
        let background = Background::for_condition(&conditions.condition_main);
        let icon_url = self.icon_url(&conditions.icon_code);
        let c = conditions;

        let fields = [
            (Slot::CityName, format!("{}, {}", c.place_name, c.country_code)),
            (Slot::CurrentDate, format_long_date(today)),
            (Slot::IconUrl, icon_url),
            (Slot::IconAlt, c.condition_description.clone()),
            (Slot::Temperature, round_temperature(c.temperature_c).to_string()),
            (Slot::Description, c.condition_description.clone()),
            (Slot::Humidity, format!("{}%", c.humidity_pct)),
            (Slot::WindSpeed, format!("{} m/s", c.wind_speed_mps)),
            (Slot::Pressure, format!("{} hPa", c.pressure_hpa)),
            (Slot::Visibility, format_visibility_km(c.visibility_km)),
            (Slot::FeelsLike, format!("{}°C", round_temperature(c.feels_like_c))),
            (Slot::Cloudiness, format!("{}%", c.cloudiness_pct)),
            (Slot::Background, background.gradient().to_string()),
            (Slot::Theme, background.name().to_string()),
        ];

        for (slot, text) in &fields {
            self.surface.set_text(*slot, text);
        }
    }
}
