use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use bookstore_api::config::{self, AppConfig, StoreBackend};
use bookstore_api::{routes, AppState, BookStore, InMemoryBookStore, MongoBookStore};

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BookStore>> {
    match config.backend {
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store, books are lost on exit");
            Ok(Arc::new(InMemoryBookStore::new()))
        }
        StoreBackend::Mongo => {
            let store = MongoBookStore::connect(&config.database).await?;
            // An unreachable server does not stop startup; requests fail until it is back.
            match store.ping().await {
                Ok(()) => log::info!("Connected to the database"),
                Err(e) => log::error!("Error connecting to the database: {}", e),
            }
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    config::load_env();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let state = web::Data::new(AppState::new(open_store(&config).await?));

    log::info!("Server is running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(routes::normalize_path())
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
