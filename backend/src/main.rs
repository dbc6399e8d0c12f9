mod config;
mod services;
mod store;
mod templating;

use crate::config::Config;
use crate::store::Store;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let store = Store::new(&config.database_path);
    store
        .init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    std::fs::create_dir_all(&config.export_dir)?;

    info!("Server running at http://{}:{}", config.host, config.port);

    let bind_addr = (config.host.clone(), config.port);
    let export_dir = config.export_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(services::templates::configure_routes())
            .service(services::content::configure_routes())
            .service(services::export::configure_routes())
            .service(Files::new("/exports", export_dir.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
