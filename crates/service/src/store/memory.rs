use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError};

#[derive(Default)]
struct Collection {
    docs: Vec<Document>,
    unique: Vec<String>,
}

impl Collection {
    /// First unique field of `candidate` already held by a document other
    /// than the one at `skip`. A missing field counts as null, as in MongoDB.
    fn conflicting_key(&self, candidate: &Document, skip: Option<usize>) -> Option<&str> {
        self.unique.iter().map(String::as_str).find(|field| {
            let value = candidate.get(*field).unwrap_or(&Bson::Null);
            self.docs
                .iter()
                .enumerate()
                .any(|(i, d)| Some(i) != skip && d.get(*field).unwrap_or(&Bson::Null) == value)
        })
    }
}

/// In-process `DocumentStore` with the same filter, `$set` and unique-index
/// semantics as the MongoDB implementation. Documents keep insertion order.
pub struct MemoryStore {
    name: String,
    inner: RwLock<Collection>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), inner: RwLock::new(Collection::default()), available: AtomicBool::new(true) }
    }

    /// Simulate losing the database: every operation fails with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("{} is offline", self.name)))
        }
    }

    fn duplicate(&self, field: &str) -> StoreError {
        StoreError::DuplicateKey(format!("{}: unique index on {field}", self.name))
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        self.ensure_available()?;
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        self.ensure_available()?;
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().find(|d| matches(d, &filter)).cloned())
    }

    async fn insert_one(&self, mut doc: Document) -> Result<Bson, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut with_id = Document::new();
                with_id.insert("_id", id.clone());
                for (k, v) in doc {
                    with_id.insert(k, v);
                }
                doc = with_id;
                id
            }
        };
        if inner.docs.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::DuplicateKey(format!("{}: _id {id}", self.name)));
        }
        if let Some(field) = inner.conflicting_key(&doc, None) {
            return Err(self.duplicate(field));
        }
        inner.docs.push(doc);
        Ok(id)
    }

    async fn update_one(&self, filter: Document, fields: Document) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.docs.iter().position(|d| matches(d, &filter)) else {
            return Ok(0);
        };
        let mut updated = inner.docs[pos].clone();
        let mut changed = false;
        for (k, v) in fields {
            if updated.get(&k) != Some(&v) {
                updated.insert(k, v);
                changed = true;
            }
        }
        if !changed {
            return Ok(0);
        }
        if let Some(field) = inner.conflicting_key(&updated, Some(pos)) {
            return Err(self.duplicate(field));
        }
        inner.docs[pos] = updated;
        Ok(1)
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        match inner.docs.iter().position(|d| matches(d, &filter)) {
            Some(pos) => {
                inner.docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ensure_unique_index(&self, field: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        if inner.unique.iter().any(|f| f == field) {
            return Ok(());
        }
        let mut seen: Vec<&Bson> = Vec::with_capacity(inner.docs.len());
        for d in &inner.docs {
            let value = d.get(field).unwrap_or(&Bson::Null);
            if seen.contains(&value) {
                return Err(self.duplicate(field));
            }
            seen.push(value);
        }
        inner.unique.push(field.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }
}
