use std::collections::BTreeMap;

pub type WeatherCode = i64;

/// Best geocoding match for a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub timezone: String,
}

/// Current conditions as reported by the forecast provider.
///
/// `units` maps provider field names (`temperature_2m`, `wind_speed_10m`, ...)
/// to the unit strings the provider used for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBundle {
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: i64,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub wind_direction_deg: i64,
    pub weather_code: WeatherCode,
    pub units: BTreeMap<String, String>,
}

impl ObservationBundle {
    pub const TEMPERATURE_FIELD: &'static str = "temperature_2m";
    pub const WIND_SPEED_FIELD: &'static str = "wind_speed_10m";

    /// Unit string for a provider field, empty when the provider sent none.
    pub fn unit_of(&self, field: &str) -> String {
        self.units.get(field).cloned().unwrap_or_default()
    }
}
