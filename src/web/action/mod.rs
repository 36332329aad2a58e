use actix_web::{HttpRequest, HttpResponse, ResponseError};
use url::form_urlencoded;
use url::percent_encoding::percent_decode;

use crate::app::ReportError;

pub mod health;
pub mod stock;
pub mod weather;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failures as the HTTP caller sees them.
#[derive(Debug, Fail)]
pub enum ApiError {
    #[fail(display = "{}", error)]
    Validation {
        error: &'static str,
    },

    #[fail(display = "{}", error)]
    NotFound {
        error: &'static str,
    },

    #[fail(display = "{}", error)]
    Upstream {
        error: &'static str,
        message: Option<String>,
    },
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation { error } | ApiError::NotFound { error } => ErrorResponse {
                error: (*error).to_owned(),
                message: None,
            },
            ApiError::Upstream { error, message } => ErrorResponse {
                error: (*error).to_owned(),
                message: message.clone(),
            },
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation { .. } => HttpResponse::BadRequest().json(self.body()),
            ApiError::NotFound { .. } => HttpResponse::NotFound().json(self.body()),
            ApiError::Upstream { .. } => HttpResponse::InternalServerError().json(self.body()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::MissingCity => ApiError::Validation { error: "City name is required" },
            ReportError::CityNotFound { .. } => ApiError::NotFound { error: "City not found" },
            ReportError::Upstream { cause, .. } => ApiError::Upstream {
                error: "Something went wrong!",
                message: Some(cause.to_string()),
            },
        }
    }
}

/// Fallback for requests no route accepts, including path segments the
/// router cannot decode.
pub fn not_found<S>(_req: &HttpRequest<S>) -> HttpResponse {
    ApiError::NotFound { error: "Not found" }.error_response()
}

/// Non-empty, decoded query parameter.
pub fn query_param<S>(req: &HttpRequest<S>, name: &str) -> Option<String> {
    form_urlencoded::parse(req.query_string().as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Percent-decoded path segment, empty when the route had none.
pub fn path_param<S>(req: &HttpRequest<S>, name: &str) -> String {
    req.match_info()
        .get(name)
        .map(|raw| percent_decode(raw.as_bytes()).decode_utf8_lossy().into_owned())
        .unwrap_or_default()
}
