use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

pub mod pages;
pub mod tracks;
pub mod zones;

pub fn error_response(status: StatusCode, message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message.to_string() }))
}
