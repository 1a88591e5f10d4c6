use std::collections::BTreeSet;
use std::sync::LazyLock;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    get, web, App, Error, HttpResponse, Responder,
};
use fences::MapGeometry;
use serde::Serialize;
use tracks::TrackReader;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.service(index).service(simulation).service(car_01_movement)
}

static GEOMETRY: LazyLock<MapGeometry> = LazyLock::new(MapGeometry::fixed);

#[derive(Serialize)]
struct MapView<'a> {
    #[serde(flatten)]
    geometry: &'a MapGeometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    cars: Option<BTreeSet<String>>,
}

/// JSON that can sit inside a `<script>` element without closing it.
fn script_json<S: Serialize>(value: &S) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn render(title: &str, script: &str, view: &MapView) -> HttpResponse {
    let data = match script_json(view) {
        Ok(d) => d,
        Err(e) => {
            log::error!("could not encode map view: {e}");
            return HttpResponse::InternalServerError().body(format!("Error: {}", e));
        }
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet-draw@1.0.4/dist/leaflet.draw.css">
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>window.MAP_VIEW = {data};</script>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet-draw@1.0.4/dist/leaflet.draw.js"></script>
<script src="/static/js/{script}"></script>
</body>
</html>
"#
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Editable camera zones over the track.
#[get("/")]
async fn index() -> impl Responder {
    let view = MapView {
        geometry: &GEOMETRY,
        cars: None,
    };
    render("Camera zones", "index.js", &view)
}

#[get("/simulation")]
async fn simulation(reader: web::Data<TrackReader>) -> impl Responder {
    let cars = match reader.list_devices().await {
        Ok(c) => c,
        Err(e) => {
            log::error!("could not list devices: {e}");
            let mut response = if e.is_unavailable() {
                HttpResponse::ServiceUnavailable()
            } else {
                HttpResponse::InternalServerError()
            };
            return response.body(format!("Error: {}", e));
        }
    };

    let view = MapView {
        geometry: &GEOMETRY,
        cars: Some(cars),
    };
    render("Simulation", "simulation.js", &view)
}

#[get("/car_01_movement")]
async fn car_01_movement() -> impl Responder {
    let view = MapView {
        geometry: &GEOMETRY,
        cars: None,
    };
    render("Car movement", "car_simulation.js", &view)
}
