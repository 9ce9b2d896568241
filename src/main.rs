// src/main.rs

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use todo_backend::app_state::AppState;
use todo_backend::auth::Authentication;
use todo_backend::config::Config;
use todo_backend::rate_limit::RateLimiter;
use todo_backend::routes;
use todo_backend::storage::MongoStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let storage = Arc::new(MongoStorage::init(&config.mongo_uri, &config.database_name).await);
    let limiter = Arc::new(RateLimiter::new());

    let bind_addr = config.bind_addr.clone();
    let frontend_origin = config.frontend_origin.clone();

    log::info!("Server running at http://{}", bind_addr);
    log::info!("Allowed CORS origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::CONTENT_TYPE,
                http::header::ACCEPT,
                http::header::AUTHORIZATION,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Authentication)
            .app_data(web::Data::new(AppState {
                storage: storage.clone(),
                limiter: limiter.clone(),
                config: config.clone(),
            }))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
