use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use taskdesk::auth::TokenIssuer;
use taskdesk::config::Config;
use taskdesk::routes;
use taskdesk::store::DataStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("Refusing to start: {}", e);
        e
    })?;

    let store = web::Data::new(DataStore::new());
    let tokens = web::Data::new(TokenIssuer::from_config(&config));

    info!("Starting task API at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::config)
            .default_service(web::route().to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
