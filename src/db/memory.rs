use async_trait::async_trait;
use mongodb::bson::{Bson, DateTime, Document};
use tokio::sync::RwLock;

use crate::db::BookStore;
use crate::error::StoreResult;
use crate::models::book::{self, Filter};

/// `BookStore` kept in process memory, in insertion order.
///
/// Matches with the same casting and numeric equality as the Mongo store, so
/// the router behaves identically against either.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Document>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A null filter also matches books that lack the field.
fn matches(book: &Document, key: &str, wanted: &Bson) -> bool {
    match book.get(key) {
        Some(stored) => book::values_match(stored, wanted),
        None => *wanted == Bson::Null,
    }
}

fn apply(book: &mut Document, data: Document) {
    for (key, value) in book::stamp_update(data, DateTime::now()) {
        book.insert(key, value);
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let wanted = filter.cast_value()?;
        let key = filter.field.key();
        let books = self.books.read().await;
        Ok(books.iter().find(|b| matches(b, key, &wanted)).cloned())
    }

    async fn find_many(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        let wanted = filter.cast_value()?;
        let key = filter.field.key();
        let books = self.books.read().await;
        Ok(books
            .iter()
            .filter(|b| matches(b, key, &wanted))
            .cloned()
            .collect())
    }

    async fn insert(&self, data: Document) -> StoreResult<Option<Document>> {
        let new_book = book::stamp_new(data, DateTime::now());
        self.books.write().await.push(new_book.clone());
        Ok(Some(new_book))
    }

    async fn update_by_id(&self, id: &str, data: Document) -> StoreResult<Option<Document>> {
        let oid = Bson::ObjectId(book::parse_id(id)?);
        let mut books = self.books.write().await;
        Ok(books
            .iter_mut()
            .find(|b| matches(b, book::ID, &oid))
            .map(|b| {
                apply(b, data);
                b.clone()
            }))
    }

    async fn update_one(
        &self,
        filter: &Filter,
        data: Document,
    ) -> StoreResult<Option<Document>> {
        let wanted = filter.cast_value()?;
        let key = filter.field.key();
        let mut books = self.books.write().await;
        Ok(books
            .iter_mut()
            .find(|b| matches(b, key, &wanted))
            .map(|b| {
                apply(b, data);
                b.clone()
            }))
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        let oid = Bson::ObjectId(book::parse_id(id)?);
        let mut books = self.books.write().await;
        let position = books.iter().position(|b| matches(b, book::ID, &oid));
        Ok(position.map(|index| books.remove(index)))
    }
}
