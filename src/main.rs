use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use minesweeper_backend::config::app_config::{AppConfig, StoreBackend};
use minesweeper_backend::config::cors::configure_cors;
use minesweeper_backend::config::database::connect_to_mongodb;
use minesweeper_backend::config::routes::configure_routes;
use minesweeper_backend::constants::USERS_COLL_NAME;
use minesweeper_backend::repositories::memory_store::MemoryStore;
use minesweeper_backend::repositories::mongo_store::MongoStore;
use minesweeper_backend::repositories::store::DocumentStore;
use minesweeper_backend::services::leaderboard_service::run_guest_sweeper;
use minesweeper_backend::state::AppState;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::MongoDb => {
            let database = connect_to_mongodb(&config)
                .await
                .context("failed to connect to MongoDB")?;
            Arc::new(MongoStore::new(database))
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store; all data is lost on shutdown");
            Arc::new(MemoryStore::new().with_unique(USERS_COLL_NAME, "username"))
        }
    };

    if config.guest_retention_days > 0 {
        let retention = chrono::Duration::try_days(config.guest_retention_days)
            .context("guest retention period is out of range")?;
        actix_web::rt::spawn(run_guest_sweeper(
            Arc::clone(&store),
            retention,
            std::time::Duration::from_secs(config.guest_sweep_interval_secs.max(1)),
        ));
    }

    let state = web::Data::new(AppState::new(store, &config.jwt_secret, config.bcrypt_cost));
    let address = config.server_address();
    let client_origin = config.client_origin.clone();

    log::info!("Server is running on {}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&client_origin))
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
