use actix_web::HttpRequest;
use actix_web::FutureResponse;
use actix_web::HttpResponse;
use actix_web::Error;
use futures::Future;

use crate::app::Stage;
use crate::web::WeatherState;
use crate::web::action::{ApiError, path_param};

pub fn by_city(req: &HttpRequest<WeatherState>) -> FutureResponse<HttpResponse> {
    let city = path_param(req, "cityName");

    Box::new(
        req.state()
            .reporter
            .report(&city)
            .map(|report| {
                info!("{}: weather for {}", Stage::Responded, report.city);
                HttpResponse::Ok().json(report)
            })
            .map_err(|e| {
                error!("Weather API error ({}): {}", e.stage(), e);
                Error::from(ApiError::from(e))
            })
    )
}
