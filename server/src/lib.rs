use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    App, Error,
};

pub mod config;
pub mod endpoints;

pub use config::{Config, ConfigError};

/// Mounts every route. The app must already carry `web::Data<TrackReader>`
/// and `web::Data<ZoneStore>`.
pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    let app = endpoints::tracks::services(app);
    let app = endpoints::zones::services(app);
    endpoints::pages::services(app)
}
