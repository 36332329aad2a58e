use actix_web::{HttpRequest, HttpResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn handle<S>(_req: &HttpRequest<S>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: String::from("ok") })
}
