use crate::app::model::{Location, ObservationBundle};
use self::utils::RequestError;

pub mod open_meteo;
pub mod yahoo;
pub mod utils;

#[derive(Debug, Fail)]
pub enum ProviderError {
    #[fail(display = "Reason: {}, provider: {}!", reason, provider_name)]
    RequestError {
        reason: String,
        provider_name: String,
    },

    #[fail(display = "Invalid request to provider {}: {}", provider_name, reason)]
    InvalidRequest {
        reason: String,
        provider_name: String,
    },
}

impl ProviderError {
    pub fn from_request(error: RequestError, provider_name: &str) -> Self {
        ProviderError::RequestError {
            reason: error.to_string(),
            provider_name: provider_name.to_owned(),
        }
    }
}

pub type LocationOption = dyn futures::Future<Item=Option<Location>, Error=ProviderError>;
pub type ObservationResponse = dyn futures::Future<Item=ObservationBundle, Error=ProviderError>;
pub type ChartResponse = dyn futures::Future<Item=serde_json::Value, Error=ProviderError>;
pub type SymbolOption = dyn futures::Future<Item=Option<String>, Error=ProviderError>;
pub type PriceOption = dyn futures::Future<Item=Option<f64>, Error=ProviderError>;

/// Resolves a place name to its best-ranked match; `None` when nothing matches.
pub trait Geocoder {
    fn locate(&self, place: &str) -> Box<LocationOption>;
}

/// Fetches current conditions at a coordinate.
pub trait WeatherSource {
    fn current_conditions(&self, latitude: f64, longitude: f64) -> Box<ObservationResponse>;
}

pub trait WeatherSourceResponse {
    fn to_observations(&self) -> ObservationBundle;
}

/// Market data lookups used by the stock service.
pub trait QuoteSource {
    fn chart(&self, symbol: &str) -> Box<ChartResponse>;

    fn lookup_symbol(&self, company_name: &str) -> Box<SymbolOption>;

    fn price(&self, symbol: &str) -> Box<PriceOption>;
}
