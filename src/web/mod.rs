use actix_web::{App, middleware};
use actix_web::http::Method;
use actix_web::middleware::cors::Cors;
use std::rc::Rc;

use crate::app::WeatherReporter;
use crate::app::provider::{Geocoder, WeatherSource, QuoteSource};
use crate::app::provider::open_meteo::{OpenMeteoGeocoder, OpenMeteoForecast};
use crate::app::provider::yahoo::YahooFinanceProvider;
use crate::settings::Settings;

use self::action::{health, not_found, stock, weather};

pub mod action;

pub struct WeatherState {
    pub reporter: WeatherReporter,
}

impl WeatherState {
    pub fn new(geocoder: Rc<dyn Geocoder>, source: Rc<dyn WeatherSource>) -> Self {
        WeatherState { reporter: WeatherReporter::new(geocoder, source) }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Rc::new(OpenMeteoGeocoder::new(settings.geocoding_uri.clone(), settings.request_timeout())),
            Rc::new(OpenMeteoForecast::new(settings.forecast_uri.clone(), settings.request_timeout())),
        )
    }
}

pub struct StockState {
    pub quotes: Rc<dyn QuoteSource>,
}

impl StockState {
    pub fn new(quotes: Rc<dyn QuoteSource>) -> Self {
        StockState { quotes }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Rc::new(YahooFinanceProvider::new(
            settings.chart_uri.clone(),
            settings.search_uri.clone(),
            settings.user_agent.clone(),
            settings.request_timeout(),
        )))
    }
}

pub fn weather_app(state: WeatherState) -> App<WeatherState> {
    App::with_state(state)
        .middleware(middleware::Logger::default())
        .middleware(Cors::default())
        .resource("/health", |r| {
            r.method(Method::GET).f(health::handle);
        })
        .resource("/api/weather/city/{cityName}", |r| {
            r.method(Method::GET).a(weather::by_city);
        })
        .resource("/api/weather/city/", |r| {
            r.method(Method::GET).a(weather::by_city);
        })
        .resource("/api/weather/city", |r| {
            r.method(Method::GET).a(weather::by_city);
        })
        .default_resource(|r| {
            r.f(not_found);
        })
}

pub fn stock_app(state: StockState) -> App<StockState> {
    App::with_state(state)
        .middleware(middleware::Logger::default())
        .middleware(Cors::default())
        .resource("/health", |r| {
            r.method(Method::GET).f(health::handle);
        })
        .resource("/api/stock", |r| {
            r.method(Method::GET).a(stock::details);
        })
        .resource("/api/stock/symbol", |r| {
            r.method(Method::GET).a(stock::symbol);
        })
        .resource("/api/stock/price", |r| {
            r.method(Method::GET).a(stock::price);
        })
        .default_resource(|r| {
            r.f(not_found);
        })
}
