use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use taskhub::auth::TokenManager;
use taskhub::config::Config;
use taskhub::store::PgStore;
use taskhub::{routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // All shared state is built here, once, and handed to the app factory;
    // nothing else in the crate reads the environment or holds a global.
    let state = web::Data::new(AppState {
        store: Arc::new(PgStore::new(pool)),
        tokens: TokenManager::new(&config.jwt_secret, config.token_ttl_hours),
        bcrypt_cost: config.bcrypt_cost,
    });

    log::info!("starting taskhub server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
