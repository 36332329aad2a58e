use self::provider::{Geocoder, WeatherSource, ProviderError};
use futures::Future;
use futures::future::{self, Either};
use chrono::Utc;
use std::fmt;
use std::rc::Rc;
use crate::app::report::NormalizedReport;

pub mod provider;
pub mod model;
pub mod report;

/// Steps a weather request goes through, in order.
///
/// Errors carry the step they failed in. `Responded` is the success state
/// and never appears on an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    AwaitingCityParam,
    ResolvingLocation,
    FetchingWeather,
    Normalizing,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::AwaitingCityParam => "awaiting city",
            Stage::ResolvingLocation => "resolving location",
            Stage::FetchingWeather => "fetching weather",
            Stage::Normalizing => "normalizing",
            Stage::Responded => "responded",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, Fail)]
pub enum ReportError {
    #[fail(display = "City name is required")]
    MissingCity,

    #[fail(display = "City {} not found", city)]
    CityNotFound {
        city: String,
    },

    #[fail(display = "{} failed: {}", stage, cause)]
    Upstream {
        stage: Stage,
        #[cause] cause: ProviderError,
    },
}

impl ReportError {
    pub fn stage(&self) -> Stage {
        match self {
            ReportError::MissingCity => Stage::AwaitingCityParam,
            ReportError::CityNotFound { .. } => Stage::ResolvingLocation,
            ReportError::Upstream { stage, .. } => *stage,
        }
    }
}

type ReportResponse = dyn Future<Item=NormalizedReport, Error=ReportError>;

/// Geocode, fetch current conditions, normalize. The two outbound calls run
/// one after the other because the second needs the coordinates.
pub struct WeatherReporter {
    geocoder: Rc<dyn Geocoder>,
    source: Rc<dyn WeatherSource>,
}

impl WeatherReporter {
    pub fn new(geocoder: Rc<dyn Geocoder>, source: Rc<dyn WeatherSource>) -> Self {
        WeatherReporter {
            geocoder,
            source,
        }
    }

    pub fn report(&self, city: &str) -> Box<ReportResponse> {
        if city.is_empty() {
            return Box::new(future::err(ReportError::MissingCity));
        }

        debug!("{}: {}", Stage::ResolvingLocation, city);

        let city = city.to_owned();
        let source = self.source.clone();

        Box::new(
            self.geocoder
                .locate(&city)
                .map_err(|cause| ReportError::Upstream { stage: Stage::ResolvingLocation, cause })
                .and_then(move |location| match location {
                    None => Either::A(future::err(ReportError::CityNotFound { city })),
                    Some(location) => {
                        debug!("{}: {} at ({}, {})", Stage::FetchingWeather, location.name, location.latitude, location.longitude);

                        Either::B(
                            source
                                .current_conditions(location.latitude, location.longitude)
                                .map_err(|cause| ReportError::Upstream { stage: Stage::FetchingWeather, cause })
                                .map(move |bundle| {
                                    debug!("{}: code {} for {}", Stage::Normalizing, bundle.weather_code, location.name);
                                    report::assemble_report(location, bundle, Utc::now())
                                })
                        )
                    }
                })
        )
    }
}

#[cfg(test)]
mod reporter_test {
    use crate::app::model::{Location, ObservationBundle};
    use crate::app::provider::{Geocoder, WeatherSource, ProviderError, LocationOption, ObservationResponse};
    use futures::Future;
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use super::*;

    fn create_location() -> Location {
        Location {
            name: String::from("Lisbon"),
            latitude: 38.71667,
            longitude: -9.13333,
            country: String::from("Portugal"),
            timezone: String::from("Europe/Lisbon"),
        }
    }

    fn create_bundle() -> ObservationBundle {
        ObservationBundle {
            temperature_c: 18.5,
            apparent_temperature_c: 17.2,
            humidity_pct: 64,
            pressure_hpa: 1015.2,
            wind_speed: 9.4,
            wind_direction_deg: 200,
            weather_code: 2,
            units: vec![(String::from("temperature_2m"), String::from("°C"))].into_iter().collect::<BTreeMap<String, String>>(),
        }
    }

    fn provider_error() -> ProviderError {
        ProviderError::RequestError {
            reason: String::from("Request time out"),
            provider_name: String::from("provider_stub"),
        }
    }

    struct GeocoderStub {
        calls: Cell<u32>,
        fail: bool,
    }

    impl GeocoderStub {
        fn new(fail: bool) -> Self {
            GeocoderStub { calls: Cell::new(0), fail }
        }
    }

    impl Geocoder for GeocoderStub {
        fn locate(&self, place: &str) -> Box<LocationOption> {
            self.calls.set(self.calls.get() + 1);

            if self.fail {
                return Box::new(futures::future::err(provider_error()));
            }

            let found = if place == "Lisbon" { Some(create_location()) } else { None };
            Box::new(futures::future::ok(found))
        }
    }

    struct WeatherSourceStub {
        calls: Cell<u32>,
        fail: bool,
    }

    impl WeatherSourceStub {
        fn new(fail: bool) -> Self {
            WeatherSourceStub { calls: Cell::new(0), fail }
        }
    }

    impl WeatherSource for WeatherSourceStub {
        fn current_conditions(&self, _latitude: f64, _longitude: f64) -> Box<ObservationResponse> {
            self.calls.set(self.calls.get() + 1);

            if self.fail {
                return Box::new(futures::future::err(provider_error()));
            }

            Box::new(futures::future::ok(create_bundle()))
        }
    }

    #[test]
    fn test_report_for_known_city() {
        let reporter = WeatherReporter::new(Rc::new(GeocoderStub::new(false)), Rc::new(WeatherSourceStub::new(false)));

        let report = reporter.report("Lisbon").wait().unwrap();

        assert_eq!(report.city, "Lisbon");
        assert_eq!(report.country, "Portugal");
        assert_eq!(report.temperature.current, 19);
        assert_eq!(report.weather.description, "partly cloudy");
        assert_eq!(report.visibility, 10000);
        assert_eq!(report.timezone, "Europe/Lisbon");
    }

    #[test]
    fn test_empty_city_stops_before_geocoding() {
        let geocoder = Rc::new(GeocoderStub::new(false));
        let reporter = WeatherReporter::new(geocoder.clone(), Rc::new(WeatherSourceStub::new(false)));

        let error = reporter.report("").wait().unwrap_err();

        assert_eq!(error.stage(), Stage::AwaitingCityParam);
        assert_eq!(geocoder.calls.get(), 0);
    }

    #[test]
    fn test_unknown_city_skips_weather_fetch() {
        let source = Rc::new(WeatherSourceStub::new(false));
        let reporter = WeatherReporter::new(Rc::new(GeocoderStub::new(false)), source.clone());

        match reporter.report("Atlantis").wait() {
            Err(ReportError::CityNotFound { city }) => assert_eq!(city, "Atlantis"),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_geocoding_failure_is_upstream_error() {
        let reporter = WeatherReporter::new(Rc::new(GeocoderStub::new(true)), Rc::new(WeatherSourceStub::new(false)));

        let error = reporter.report("Lisbon").wait().unwrap_err();

        assert_eq!(error.stage(), Stage::ResolvingLocation);
        assert!(error.to_string().contains("Request time out"));
    }

    #[test]
    fn test_failed_requests_never_report_responded() {
        let reporter = WeatherReporter::new(Rc::new(GeocoderStub::new(false)), Rc::new(WeatherSourceStub::new(true)));

        for city in &["", "Atlantis", "Lisbon"] {
            let error = reporter.report(city).wait().unwrap_err();

            assert_ne!(error.stage(), Stage::Responded);
        }
    }

    #[test]
    fn test_weather_failure_is_upstream_error() {
        let source = Rc::new(WeatherSourceStub::new(true));
        let reporter = WeatherReporter::new(Rc::new(GeocoderStub::new(false)), source.clone());

        let error = reporter.report("Lisbon").wait().unwrap_err();

        assert_eq!(error.stage(), Stage::FetchingWeather);
        assert_eq!(source.calls.get(), 1);
    }
}
