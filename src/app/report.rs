use chrono::{DateTime, SecondsFormat, Utc};

use crate::app::model::{Location, ObservationBundle, WeatherCode};

pub const CLEAR_SKY_VISIBILITY_M: f64 = 10000.0;
pub const HUMIDITY_THRESHOLD_PCT: i64 = 70;

pub const UNKNOWN_CATEGORY: &str = "Unknown";
pub const UNKNOWN_DESCRIPTION: &str = "unknown weather condition";
pub const FALLBACK_ICON: &str = "01d";

/// WMO code -> (category, description).
const DESCRIPTIONS: [(WeatherCode, &str, &str); 28] = [
    (0, "Clear", "clear sky"),
    (1, "Clear", "mainly clear"),
    (2, "Cloudy", "partly cloudy"),
    (3, "Cloudy", "overcast"),
    (45, "Fog", "fog"),
    (48, "Fog", "depositing rime fog"),
    (51, "Drizzle", "light drizzle"),
    (53, "Drizzle", "moderate drizzle"),
    (55, "Drizzle", "dense drizzle"),
    (56, "Freezing Drizzle", "light freezing drizzle"),
    (57, "Freezing Drizzle", "dense freezing drizzle"),
    (61, "Rain", "slight rain"),
    (63, "Rain", "moderate rain"),
    (65, "Rain", "heavy rain"),
    (66, "Freezing Rain", "light freezing rain"),
    (67, "Freezing Rain", "heavy freezing rain"),
    (71, "Snow", "slight snow fall"),
    (73, "Snow", "moderate snow fall"),
    (75, "Snow", "heavy snow fall"),
    (77, "Snow Grains", "snow grains"),
    (80, "Rain Showers", "slight rain showers"),
    (81, "Rain Showers", "moderate rain showers"),
    (82, "Rain Showers", "violent rain showers"),
    (85, "Snow Showers", "slight snow showers"),
    (86, "Snow Showers", "heavy snow showers"),
    (95, "Thunderstorm", "thunderstorm"),
    (96, "Thunderstorm", "thunderstorm with slight hail"),
    (99, "Thunderstorm", "thunderstorm with heavy hail"),
];

/// WMO code -> icon id. Related codes share an icon.
const ICONS: [(WeatherCode, &str); 28] = [
    (0, "01d"),
    (1, "02d"),
    (2, "03d"),
    (3, "04d"),
    (45, "50d"),
    (48, "50d"),
    (51, "09d"),
    (53, "09d"),
    (55, "09d"),
    (56, "09d"),
    (57, "09d"),
    (61, "10d"),
    (63, "10d"),
    (65, "10d"),
    (66, "13d"),
    (67, "13d"),
    (71, "13d"),
    (73, "13d"),
    (75, "13d"),
    (77, "13d"),
    (80, "09d"),
    (81, "09d"),
    (82, "09d"),
    (85, "13d"),
    (86, "13d"),
    (95, "11d"),
    (96, "11d"),
    (99, "11d"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDescriptor {
    #[serde(rename = "main")]
    pub category: String,
    pub description: String,
    #[serde(rename = "icon")]
    pub icon_id: String,
}

/// Looks up the condition for a WMO code. Codes missing from the tables
/// degrade to "Unknown" and the clear-day icon.
pub fn classify(code: WeatherCode) -> ConditionDescriptor {
    let (category, description) = DESCRIPTIONS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, category, description)| (*category, *description))
        .unwrap_or((UNKNOWN_CATEGORY, UNKNOWN_DESCRIPTION));

    let icon_id = ICONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON);

    ConditionDescriptor {
        category: category.to_owned(),
        description: description.to_owned(),
        icon_id: icon_id.to_owned(),
    }
}

/// Every icon id `classify` can return.
pub fn icon_set() -> Vec<&'static str> {
    let mut icons: Vec<&'static str> = ICONS.iter().map(|(_, icon)| *icon).collect();
    icons.push(FALLBACK_ICON);
    icons.sort();
    icons.dedup();
    icons
}

/// Visibility attenuation groups. A code belongs to at most one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionGroup {
    Fog,
    Precipitation,
    Snow,
    Thunderstorm,
    Other,
}

impl ConditionGroup {
    pub fn of(code: WeatherCode) -> Self {
        match code {
            45 | 48 => ConditionGroup::Fog,
            51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => ConditionGroup::Precipitation,
            71 | 73 | 75 | 77 | 85 | 86 => ConditionGroup::Snow,
            95 | 96 | 99 => ConditionGroup::Thunderstorm,
            _ => ConditionGroup::Other,
        }
    }

    pub fn visibility_factor(self) -> f64 {
        match self {
            ConditionGroup::Fog => 0.1,
            ConditionGroup::Precipitation => 0.6,
            ConditionGroup::Snow => 0.4,
            ConditionGroup::Thunderstorm => 0.3,
            ConditionGroup::Other => 1.0,
        }
    }
}

/// Estimated visibility in meters from humidity and condition.
///
/// Above 70% humidity the clear-sky distance is derated linearly by
/// `(humidity - 70) / 100`, then scaled by the condition group factor.
/// The result is not clamped: out-of-range humidity can give values below
/// zero.
pub fn estimate_visibility(humidity_pct: i64, code: WeatherCode) -> i64 {
    let mut visibility = CLEAR_SKY_VISIBILITY_M;

    if humidity_pct > HUMIDITY_THRESHOLD_PCT {
        visibility *= 1.0 - ((humidity_pct - HUMIDITY_THRESHOLD_PCT) as f64 / 100.0);
    }

    visibility *= ConditionGroup::of(code).visibility_factor();

    round_half_up(visibility)
}

/// Nearest integer, with halves going towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureBlock {
    pub current: i64,
    pub feels_like: i64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindBlock {
    pub speed: f64,
    pub direction: i64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub city: String,
    pub country: String,
    pub temperature: TemperatureBlock,
    pub weather: ConditionDescriptor,
    pub wind: WindBlock,
    pub humidity: i64,
    pub pressure: f64,
    pub visibility: i64,
    pub timezone: String,
    pub timestamp: String,
}

/// Builds the response for one request. `now` is the time the report is
/// answered, not the provider's observation time.
pub fn assemble_report(location: Location, bundle: ObservationBundle, now: DateTime<Utc>) -> NormalizedReport {
    NormalizedReport {
        temperature: TemperatureBlock {
            current: round_half_up(bundle.temperature_c),
            feels_like: round_half_up(bundle.apparent_temperature_c),
            unit: bundle.unit_of(ObservationBundle::TEMPERATURE_FIELD),
        },
        weather: classify(bundle.weather_code),
        wind: WindBlock {
            speed: bundle.wind_speed,
            direction: bundle.wind_direction_deg,
            unit: bundle.unit_of(ObservationBundle::WIND_SPEED_FIELD),
        },
        humidity: bundle.humidity_pct,
        pressure: bundle.pressure_hpa,
        visibility: estimate_visibility(bundle.humidity_pct, bundle.weather_code),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        city: location.name,
        country: location.country,
        timezone: location.timezone,
    }
}


#[cfg(test)]
mod visibility_test {
    use super::*;

    #[test]
    fn test_no_attenuation_below_threshold() {
        assert_eq!(estimate_visibility(50, 0), 10000);
        assert_eq!(estimate_visibility(70, 3), 10000);
    }

    #[test]
    fn test_fog_with_high_humidity() {
        assert_eq!(estimate_visibility(90, 45), 800);
    }

    #[test]
    fn test_thunderstorm_at_saturation() {
        assert_eq!(estimate_visibility(100, 95), 2100);
    }

    #[test]
    fn test_condition_factors() {
        assert_eq!(estimate_visibility(60, 48), 1000);
        assert_eq!(estimate_visibility(60, 63), 6000);
        assert_eq!(estimate_visibility(60, 82), 6000);
        assert_eq!(estimate_visibility(60, 77), 4000);
        assert_eq!(estimate_visibility(60, 99), 3000);
        assert_eq!(estimate_visibility(60, 12345), 10000);
    }

    #[test]
    fn test_humidity_derating_is_linear() {
        assert_eq!(estimate_visibility(71, 0), 9900);
        assert_eq!(estimate_visibility(85, 0), 8500);
        assert_eq!(estimate_visibility(80, 61), 5400);
    }

    #[test]
    fn test_out_of_domain_humidity_is_not_clamped() {
        assert_eq!(estimate_visibility(170, 0), 0);
        assert_eq!(estimate_visibility(270, 0), -10000);
    }

    #[test]
    fn test_visibility_is_repeatable() {
        assert_eq!(estimate_visibility(88, 73), estimate_visibility(88, 73));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(7.4), 7);
    }
}
