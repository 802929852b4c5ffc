pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use db::{BookStore, InMemoryBookStore, MongoBookStore};
pub use error::{ApiError, StoreError};
pub use state::AppState;
