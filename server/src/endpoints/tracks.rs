use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    get,
    http::StatusCode,
    web, App, Error, HttpResponse, Responder,
};
use tracks::{TrackError, TrackReader};

use super::error_response;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.service(car_coordinates).service(car_01_movement_data)
}

fn track_error(e: TrackError) -> HttpResponse {
    log::error!("track query failed: {e}");
    let status = if e.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, e)
}

// http://127.0.0.1:8080/api/car_coordinates/car_01
#[get("/api/car_coordinates/{device_id}")]
async fn car_coordinates(reader: web::Data<TrackReader>, path: web::Path<String>) -> impl Responder {
    let device_id = path.into_inner();

    match reader.samples(Some(&device_id)).await {
        Ok(samples) => HttpResponse::Ok().json(samples),
        Err(e) => track_error(e),
    }
}

#[get("/api/car_01_movement_data")]
async fn car_01_movement_data(reader: web::Data<TrackReader>) -> impl Responder {
    match reader.samples(None).await {
        Ok(samples) => HttpResponse::Ok().json(samples),
        Err(e) => track_error(e),
    }
}
