use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use actix_cors::Cors;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
mod handlers;
pub mod matchday;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;

use crate::config::jwt::JwtSettings;
use crate::error::AppError;
use crate::routes::init_routes;

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    redis_client: Arc<redis::Client>,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    // web::Data is an Arc, cloned into every worker
    let db_pool_data = web::Data::new(db_pool);
    let jwt_settings = web::Data::new(jwt_settings);
    let redis_client_data = web::Data::new(redis_client);

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(db_pool_data.clone())
            .app_data(jwt_settings.clone())
            .app_data(redis_client_data.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid request body: {}", err)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid path: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid query string: {}", err)).into()
            }))
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
