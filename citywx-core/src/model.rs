use serde::{Deserialize, Serialize};

/// Best geocoding match for a free-text city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub resolved_name: String,
    pub country_code: String,
}

/// Snapshot of current conditions at one point, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    pub visibility_km: f64,
    pub cloudiness_pct: u8,
    /// Coarse category, e.g. "Rain" or "Clear".
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub place_name: String,
    pub country_code: String,
}
