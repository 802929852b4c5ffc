use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime, Document},
    options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument},
    Client, Collection, Database,
};

use crate::config::DatabaseConfig;
use crate::db::BookStore;
use crate::error::StoreResult;
use crate::models::book::{self, Filter};

/// `BookStore` backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoBookStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoBookStore {
    /// Builds a client from the connection string. The driver connects lazily,
    /// so this only fails on a malformed URI; use [`ping`](Self::ping) to check
    /// the server is reachable.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = ClientOptions::parse(&config.uri).await?;
        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.name));
        Ok(Self::new(database, &config.collection))
    }

    pub fn new(database: Database, collection: &str) -> Self {
        let collection = database.collection::<Document>(collection);
        MongoBookStore {
            database,
            collection,
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn find_one_and_set(
        &self,
        filter: Document,
        data: Document,
    ) -> StoreResult<Option<Document>> {
        let update = doc! { "$set": book::stamp_update(data, DateTime::now()) };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(filter, update, options)
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        let books = self
            .collection
            .find(doc! {}, None)
            .await?
            .try_collect::<Vec<_>>()
            .await?;
        Ok(books)
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let book = self
            .collection
            .find_one(filter.to_document()?, None)
            .await?;
        Ok(book)
    }

    async fn find_many(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        let books = self
            .collection
            .find(filter.to_document()?, None)
            .await?
            .try_collect::<Vec<_>>()
            .await?;
        Ok(books)
    }

    async fn insert(&self, data: Document) -> StoreResult<Option<Document>> {
        let new_book = book::stamp_new(data, DateTime::now());
        let inserted = self.collection.insert_one(&new_book, None).await?;
        log::debug!("inserted book {}", inserted.inserted_id);

        let stored = self
            .collection
            .find_one(doc! { "_id": inserted.inserted_id }, None)
            .await?;
        Ok(stored)
    }

    async fn update_by_id(&self, id: &str, data: Document) -> StoreResult<Option<Document>> {
        let oid = book::parse_id(id)?;
        self.find_one_and_set(doc! { "_id": oid }, data).await
    }

    async fn update_one(
        &self,
        filter: &Filter,
        data: Document,
    ) -> StoreResult<Option<Document>> {
        self.find_one_and_set(filter.to_document()?, data).await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        let oid = book::parse_id(id)?;
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await?;
        Ok(deleted)
    }
}
