use actix_web::client::{ClientRequest, SendRequestError};
use futures::Future;
use actix_web::HttpMessage;
use serde::de::DeserializeOwned;
use std::time::Duration;

const MAX_BODY_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Fail)]
pub enum RequestError {
    #[fail(display = "Request Unknown error")]
    UnknownError {},

    #[fail(display = "Request time out")]
    ProviderTimeOut {},

    #[fail(display = "Connection failed: {}", reason)]
    ConnectionError {
        reason: String,
    },

    #[fail(display = "Unexpected response status {}", status)]
    UnexpectedStatus {
        status: u16,
    },

    #[fail(display = "Invalid response: {}", reason)]
    InvalidResponse {
        reason: String,
    },
}

impl RequestError {
    pub fn is_not_found(&self) -> bool {
        match self {
            RequestError::UnexpectedStatus { status } => *status == 404,
            _ => false,
        }
    }
}

/// Sends `request`, waits at most `timeout` for the response head and decodes
/// a successful JSON body into `T`.
///
/// The body read afterwards is bounded by size (`MAX_BODY_SIZE`), not by time.
pub fn fetch_json<T: 'static>(request: ClientRequest, timeout: Duration) -> Box<dyn Future<Item=T, Error=RequestError>>
    where T: DeserializeOwned
{
    Box::new(
        request
            .send()
            .timeout(timeout)
            .map_err(|e| match e {
                SendRequestError::Timeout => RequestError::ProviderTimeOut {},
                other => RequestError::ConnectionError { reason: other.to_string() },
            })
            .and_then(|response| {
                let status = response.status();

                response
                    .body()
                    .limit(MAX_BODY_SIZE)
                    .map_err(|_| RequestError::UnknownError {})
                    .and_then(move |body| {
                        if !status.is_success() {
                            return Err(RequestError::UnexpectedStatus { status: status.as_u16() });
                        }

                        serde_json::from_slice::<T>(&body)
                            .map_err(|e| RequestError::InvalidResponse { reason: e.to_string() })
                    })
            })
    )
}
