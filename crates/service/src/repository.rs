//! Data-access wrapper over a single collection.
//!
//! Store failures are logged here with their cause and surfaced as
//! [`ServiceError::Internal`]; callers never see raw driver errors.

use std::sync::Arc;

use async_trait::async_trait;
use models::object_id::parse_object_id;
use mongodb::bson::{doc, oid::ObjectId, Document};
use tracing::{debug, error};

use crate::errors::ServiceError;
use crate::store::{DocumentStore, StoreError};

/// Hook run by [`DocumentRepository::create`] before the insert.
#[async_trait]
pub trait PreInsertCheck: Send + Sync {
    async fn check(&self, doc: &Document) -> Result<(), ServiceError>;
}

/// Generic CRUD wrapper around one collection.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use mongodb::bson::doc;
/// use service::{repository::DocumentRepository, store::MemoryStore};
///
/// let repo = DocumentRepository::new(Arc::new(MemoryStore::new("Enterprise")));
/// let created = tokio_test::block_on(repo.create(doc! { "nombre_empresa": "Ejemplo S.A." }, None)).unwrap();
/// let id = created.get_object_id("_id").unwrap().to_hex();
/// let found = tokio_test::block_on(repo.get_by_id(&format!("  {id} "))).unwrap();
/// assert_eq!(found, created);
/// ```
#[derive(Clone)]
pub struct DocumentRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn collection(&self) -> &str {
        self.store.collection_name()
    }

    fn store_failure(&self, op: &'static str, err: StoreError, public: &str) -> ServiceError {
        error!(collection = %self.collection(), op, error = %err, "store operation failed");
        match err {
            StoreError::DuplicateKey(_) => {
                ServiceError::Conflict("El documento ya existe.".into())
            }
            _ => ServiceError::Internal(public.to_string()),
        }
    }

    /// Every document of the collection, unpaginated.
    pub async fn get_all(&self) -> Result<Vec<Document>, ServiceError> {
        self.store
            .find(Document::new())
            .await
            .map_err(|e| self.store_failure("get_all", e, "Error al consultar los datos."))
    }

    /// First document matching `filter`; `NotFound` when there is none.
    pub async fn find_one(&self, filter: Document) -> Result<Document, ServiceError> {
        self.store
            .find_one(filter)
            .await
            .map_err(|e| self.store_failure("find_one", e, "Error al buscar el documento."))?
            .ok_or_else(|| ServiceError::NotFound("Documento no encontrado.".into()))
    }

    /// Every document matching `filter`, possibly none.
    pub async fn find_many(&self, filter: Document) -> Result<Vec<Document>, ServiceError> {
        self.store
            .find(filter)
            .await
            .map_err(|e| self.store_failure("find_many", e, "Error al buscar los documentos."))
    }

    pub async fn exists(&self, filter: Document) -> Result<bool, ServiceError> {
        let found = self
            .store
            .find_one(filter)
            .await
            .map_err(|e| self.store_failure("exists", e, "Error al buscar el documento."))?;
        Ok(found.is_some())
    }

    async fn find_by_object_id(&self, id: ObjectId) -> Result<Option<Document>, ServiceError> {
        self.store
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| self.store_failure("get_by_id", e, "Error al buscar el documento."))
    }

    /// Trim and parse `raw`, then fetch. Malformed ids are `BadRequest`,
    /// well-formed ids without a document are `NotFound`.
    pub async fn get_by_id(&self, raw: &str) -> Result<Document, ServiceError> {
        let id = parse_object_id(raw)?;
        self.find_by_object_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No se encontró un documento con el id '{id}'.")))
    }

    /// Run `check`, insert `doc` and return the stored document as re-read
    /// from the store. Any `_id` in `doc` is dropped; the store assigns it.
    pub async fn create(
        &self,
        mut doc: Document,
        check: Option<&(dyn PreInsertCheck + '_)>,
    ) -> Result<Document, ServiceError> {
        if let Some(check) = check {
            check.check(&doc).await?;
        }
        doc.remove("_id");
        let inserted = self
            .store
            .insert_one(doc)
            .await
            .map_err(|e| self.store_failure("create", e, "Error al crear el documento."))?;
        let id = inserted.as_object_id().ok_or_else(|| {
            error!(collection = %self.collection(), inserted_id = %inserted, "store assigned a non-ObjectId _id");
            ServiceError::Internal("Error al crear el documento.".into())
        })?;
        debug!(collection = %self.collection(), %id, "document inserted");
        self.find_by_object_id(id).await?.ok_or_else(|| {
            error!(collection = %self.collection(), %id, "inserted document not readable");
            ServiceError::Internal("Error al crear el documento.".into())
        })
    }

    /// `$set` merge of `fields` into an existing document. Returns whether
    /// any field changed; an empty field set never touches the store.
    pub async fn update_by_id(&self, raw: &str, mut fields: Document) -> Result<bool, ServiceError> {
        let id = parse_object_id(raw)?;
        self.get_by_id(raw).await?;
        fields.remove("_id");
        if fields.is_empty() {
            return Ok(false);
        }
        let modified = self
            .store
            .update_one(doc! { "_id": id }, fields)
            .await
            .map_err(|e| self.store_failure("update_by_id", e, "Error al actualizar el documento."))?;
        Ok(modified > 0)
    }

    /// Remove an existing document; returns whether removal occurred.
    pub async fn delete_by_id(&self, raw: &str) -> Result<bool, ServiceError> {
        let id = parse_object_id(raw)?;
        self.get_by_id(raw).await?;
        let deleted = self
            .store
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| self.store_failure("delete_by_id", e, "Error al eliminar el documento."))?;
        Ok(deleted > 0)
    }

    /// Declare `field` unique in the collection. Writes repeating a value
    /// then fail in the store and surface as `Conflict`.
    pub async fn ensure_unique(&self, field: &str) -> Result<(), ServiceError> {
        self.store
            .ensure_unique_index(field)
            .await
            .map_err(|e| self.store_failure("ensure_unique", e, "Error al preparar la colección."))
    }

    /// Raw liveness probe; the error text is reported by the health check.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
