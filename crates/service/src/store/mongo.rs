use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use super::{DocumentStore, StoreError};

const DUPLICATE_KEY_CODE: i32 = 11000;

impl From<MongoError> for StoreError {
    fn from(e: MongoError) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE => {
                StoreError::DuplicateKey(we.message.clone())
            }
            ErrorKind::ServerSelection { message, .. } => StoreError::Unavailable(message.clone()),
            _ => StoreError::Driver(e.to_string()),
        }
    }
}

/// `DocumentStore` backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self { db: db.clone(), collection: db.collection::<Document>(collection) }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError> {
        let res = self.collection.insert_one(doc).await?;
        Ok(res.inserted_id)
    }

    async fn update_one(&self, filter: Document, fields: Document) -> Result<u64, StoreError> {
        let res = self.collection.update_one(filter, doc! { "$set": fields }).await?;
        Ok(res.modified_count)
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        let res = self.collection.delete_one(filter).await?;
        Ok(res.deleted_count)
    }

    async fn ensure_unique_index(&self, field: &str) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
