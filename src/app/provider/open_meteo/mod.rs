use futures::Future;
use actix_web::client;
use futures::future::err as fut_err;
use actix_web::client::ClientRequest;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::app::model::{Location, ObservationBundle};
use crate::app::provider::{Geocoder, WeatherSource, WeatherSourceResponse, ProviderError};

use super::utils;


const CURRENT_FIELDS: [&str; 14] = [
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "pressure_msl",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
];

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

impl GeocodingResponse {
    fn into_location(self) -> Option<Location> {
        self.results.into_iter().next().map(|r| Location {
            name: r.name,
            latitude: r.latitude,
            longitude: r.longitude,
            country: r.country,
            timezone: r.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
    current_units: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: i64,
    surface_pressure: f64,
    wind_speed_10m: f64,
    wind_direction_10m: i64,
    weather_code: i64,
}

impl WeatherSourceResponse for ForecastResponse {
    fn to_observations(&self) -> ObservationBundle {
        ObservationBundle {
            temperature_c: self.current.temperature_2m,
            apparent_temperature_c: self.current.apparent_temperature,
            humidity_pct: self.current.relative_humidity_2m,
            pressure_hpa: self.current.surface_pressure,
            wind_speed: self.current.wind_speed_10m,
            wind_direction_deg: self.current.wind_direction_10m,
            weather_code: self.current.weather_code,
            units: self.current_units.clone(),
        }
    }
}

pub struct OpenMeteoGeocoder {
    base_uri: String,
    timeout: Duration,
}

impl OpenMeteoGeocoder {
    const NAME: &'static str = "Open-Meteo geocoding";

    pub fn new(base_uri: String, timeout: Duration) -> Self {
        OpenMeteoGeocoder { base_uri, timeout }
    }

    fn build_search_url(&self, place: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(&self.base_uri, &[
            ("name", place),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ])
    }

    fn build_request(&self, place: &str) -> Result<ClientRequest, ProviderError> {
        let url = self.build_search_url(place).map_err(|e| self.invalid_request(e.to_string()))?;

        client::get(url.as_str())
            .finish()
            .map_err(|e| self.invalid_request(e.to_string()))
    }

    fn invalid_request(&self, reason: String) -> ProviderError {
        ProviderError::InvalidRequest { reason, provider_name: Self::NAME.to_owned() }
    }
}

impl Geocoder for OpenMeteoGeocoder {
    fn locate(&self, place: &str) -> Box<super::LocationOption> {
        let request = match self.build_request(place) {
            Ok(req) => req,
            Err(e) => return Box::new(fut_err(e)),
        };

        let place = place.to_owned();

        Box::new(
            utils::fetch_json::<GeocodingResponse>(request, self.timeout)
                .map(move |res| {
                    let location = res.into_location();
                    debug!("Geocoding {} resolved to {:?}", place, location);
                    location
                })
                .map_err(|e| {
                    error!("Error geocoding city: {}", e);
                    ProviderError::from_request(e, Self::NAME)
                })
        )
    }
}

pub struct OpenMeteoForecast {
    base_uri: String,
    timeout: Duration,
}

impl OpenMeteoForecast {
    const NAME: &'static str = "Open-Meteo forecast";

    pub fn new(base_uri: String, timeout: Duration) -> Self {
        OpenMeteoForecast { base_uri, timeout }
    }

    fn build_forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url, url::ParseError> {
        Url::parse_with_params(&self.base_uri, &[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.join(",")),
            ("timezone", String::from("auto")),
        ])
    }

    fn build_request(&self, latitude: f64, longitude: f64) -> Result<ClientRequest, ProviderError> {
        let url = self
            .build_forecast_url(latitude, longitude)
            .map_err(|e| self.invalid_request(e.to_string()))?;

        client::get(url.as_str())
            .finish()
            .map_err(|e| self.invalid_request(e.to_string()))
    }

    fn invalid_request(&self, reason: String) -> ProviderError {
        ProviderError::InvalidRequest { reason, provider_name: Self::NAME.to_owned() }
    }
}

impl WeatherSource for OpenMeteoForecast {
    fn current_conditions(&self, latitude: f64, longitude: f64) -> Box<super::ObservationResponse> {
        let request = match self.build_request(latitude, longitude) {
            Ok(req) => req,
            Err(e) => return Box::new(fut_err(e)),
        };

        Box::new(
            utils::fetch_json::<ForecastResponse>(request, self.timeout)
                .map(|res| {
                    debug!("Current conditions from Open-Meteo {:?}", res);
                    res.to_observations()
                })
                .map_err(|e| {
                    error!("Error fetching weather data: {}", e);
                    ProviderError::from_request(e, Self::NAME)
                })
        )
    }
}
