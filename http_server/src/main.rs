use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use mapserver::MapServerClient;
use tracing_actix_web::TracingLogger;

use crate::app_container::Application;
use crate::configuration::SETTINGS_CONFIG;

mod app_container;
mod authentication;
mod configuration;
mod errors;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("parcel_kmz_server");

    let client = MapServerClient::new(SETTINGS_CONFIG.mapserver.clone());

    HttpServer::new(move || {
        let operations = parcel_resolution::App::new(Arc::new(client.clone()));
        App::new()
            .wrap(TracingLogger::default())
            // The browser front-end is served from another origin.
            .wrap(Cors::permissive())
            .configure(routes::config)
            .app_data(web::Data::new(Application::new(operations)))
    })
    .bind(SETTINGS_CONFIG.server.listen.as_str())?
    .run()
    .await
    .context("Server failed to run")
}
