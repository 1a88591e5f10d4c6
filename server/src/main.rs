use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use server::Config;
use tracks::TrackReader;
use zones::ZoneStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(io::Error::other)?;

    // lazy, so a missing database only fails the track routes
    let pool = tracks::bind(&config.database_url, Some(config.db_max_connections))
        .map_err(io::Error::other)?;
    let reader = web::Data::new(TrackReader::new(pool, config.track_config()));
    let store = web::Data::new(ZoneStore::open(config.zone_config()).map_err(io::Error::other)?);

    log::info!(
        "serving tracks from {} and zones from {}",
        config.database_url,
        store.dir().display()
    );

    HttpServer::new(move || {
        server::services(
            App::new()
                .wrap(Logger::default())
                .app_data(reader.clone())
                .app_data(store.clone()),
        )
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
