use std::env;

use anyhow::Context;

/// Which `BookStore` the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    /// Used only when the connection string names no database.
    pub name: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub database: DatabaseConfig,
}

/// Loads variables from `BOOKS_ENV_FILE`, or `.env` when unset. A missing file
/// is not an error; the process environment still applies.
pub fn load_env() {
    let result = match env::var("BOOKS_ENV_FILE") {
        Ok(path) => dotenv::from_filename(path).map(|_| ()),
        Err(_) => dotenv::dotenv().map(|_| ()),
    };
    if let Err(e) = result {
        // env_logger is not up yet
        eprintln!("No env file loaded: {}", e);
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = var_or("PORT", "3000")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let backend = match var_or("BOOKS_STORE", "mongo").to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("unknown BOOKS_STORE {:?}, expected mongo or memory", other),
        };

        Ok(AppConfig {
            host: var_or("HOST", "0.0.0.0"),
            port,
            backend,
            database: DatabaseConfig {
                uri: var_or("MONGODB", "mongodb://localhost:27017"),
                name: var_or("MONGODB_DATABASE", "bookstore"),
                collection: var_or("BOOKS_COLLECTION", "books"),
            },
        })
    }
}
