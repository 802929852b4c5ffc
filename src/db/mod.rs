//! Storage handle for books.
//!
//! Every method is a single passthrough to the backing store. Absence comes back
//! as `Ok(None)` or an empty vector; only faults are errors.

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::StoreResult;
use crate::models::book::Filter;

mod memory;
mod mongo;

pub use memory::InMemoryBookStore;
pub use mongo::MongoBookStore;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All stored books, order unspecified.
    async fn find_all(&self) -> StoreResult<Vec<Document>>;

    /// First book matching the filter.
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Every book matching the filter.
    async fn find_many(&self, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Persists a new book and returns it as stored, with its generated id.
    async fn insert(&self, data: Document) -> StoreResult<Option<Document>>;

    /// Applies `data` to the book with `id`, returning the updated book.
    async fn update_by_id(&self, id: &str, data: Document) -> StoreResult<Option<Document>>;

    /// Applies `data` to one book matching the filter, returning it updated.
    async fn update_one(&self, filter: &Filter, data: Document)
        -> StoreResult<Option<Document>>;

    /// Removes the book with `id`, returning it if it existed.
    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Document>>;
}
