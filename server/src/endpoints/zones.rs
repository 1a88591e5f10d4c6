use std::io;

use actix_web::{
    delete,
    dev::{ServiceFactory, ServiceRequest},
    error::InternalError,
    get,
    http::StatusCode,
    post, web, App, Error, HttpResponse, Responder,
};
use serde::Deserialize;
use serde_json::json;
use zones::{RecordName, ZoneError, ZoneStore, Zones};

use super::error_response;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.app_data(json_config())
        .service(save_zones)
        .service(load_zone)
        .service(get_saved_zones)
        .service(delete_zone)
}

/// Malformed bodies answer `{error}` with 400 instead of actix' plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::BAD_REQUEST, &err);
        InternalError::from_response(err, response).into()
    })
}

#[derive(Deserialize)]
struct SaveZones {
    zones: Zones,
}

fn status_of(e: &ZoneError) -> StatusCode {
    match e {
        ZoneError::NotFound(_) => StatusCode::NOT_FOUND,
        ZoneError::InvalidName(_) | ZoneError::EmptyZones => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Runs a store call on the blocking pool.
async fn blocking<T, F>(store: web::Data<ZoneStore>, f: F) -> Result<T, ZoneError>
where
    F: FnOnce(&ZoneStore) -> Result<T, ZoneError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || f(&store))
        .await
        .map_err(|e| ZoneError::Io(io::Error::other(e.to_string())))?
}

/// Display of `NotFound` is the fixed wire text, so the log carries the
/// debug form with the record name in it.
fn log_zone_error(e: &ZoneError, status: StatusCode) {
    if status.is_server_error() {
        log::error!("zone store: {e} ({e:?})");
    } else {
        log::info!("zone request rejected with {status}: {e:?}");
    }
}

fn zone_error(e: ZoneError) -> HttpResponse {
    let status = status_of(&e);
    log_zone_error(&e, status);
    error_response(status, e)
}

#[post("/save_zones")]
async fn save_zones(store: web::Data<ZoneStore>, body: web::Json<SaveZones>) -> impl Responder {
    let zones = body.into_inner().zones;

    match blocking(store, move |s| s.save(&zones)).await {
        Ok(name) => HttpResponse::Ok().json(json!({ "status": "success", "file": name })),
        Err(e) => zone_error(e),
    }
}

#[get("/load_zone/{name}")]
async fn load_zone(store: web::Data<ZoneStore>, path: web::Path<String>) -> impl Responder {
    let name = match RecordName::parse(&path) {
        Ok(n) => n,
        Err(e) => return zone_error(e),
    };

    match blocking(store, move |s| s.load(&name)).await {
        Ok(zones) => HttpResponse::Ok().json(json!({ "zones": zones })),
        Err(e) => zone_error(e),
    }
}

#[get("/get_saved_zones")]
async fn get_saved_zones(store: web::Data<ZoneStore>) -> impl Responder {
    match blocking(store, |s| s.list()).await {
        Ok(files) => HttpResponse::Ok().json(json!({ "files": files })),
        Err(e) => zone_error(e),
    }
}

#[delete("/delete_zone/{name}")]
async fn delete_zone(store: web::Data<ZoneStore>, path: web::Path<String>) -> impl Responder {
    let result = match RecordName::parse(&path) {
        Ok(name) => blocking(store, move |s| s.delete(&name)).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => {
            let status = status_of(&e);
            log_zone_error(&e, status);
            HttpResponse::build(status).json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}
