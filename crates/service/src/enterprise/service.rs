use std::sync::Arc;

use async_trait::async_trait;
use models::category::{Category, CategoryRef};
use models::enterprise::{Enterprise, EnterprisePatch, EnterpriseView, NewEnterprise};
use mongodb::bson::{self, doc, Document};
use tokio::sync::OnceCell;
use tracing::{error, info, instrument, warn};

use crate::credentials::hash_credential;
use crate::errors::ServiceError;
use crate::repository::{DocumentRepository, PreInsertCheck};
use crate::store::MemoryStore;

/// Field that identifies an enterprise across registrations.
pub const LEGAL_ID_FIELD: &str = "numero_cedula";

const DUPLICATE_MESSAGE: &str = "La empresa con el id a registrar ya existe";

/// Enterprise listing, registration and maintenance over two collections:
/// the enterprises themselves and the category reference collection.
///
/// Writes first make the collections ready (unique index on
/// [`LEGAL_ID_FIELD`], category seeding). A failed attempt is retried on the
/// next write, so a database that comes up after the process still gets
/// prepared.
#[derive(Clone)]
pub struct EnterpriseService {
    enterprises: DocumentRepository,
    categories: DocumentRepository,
    seed: bool,
    ready: Arc<OnceCell<()>>,
}

/// Pre-insert rules for registration: the declared category must exist in
/// the reference collection and the legal id number must not be taken.
struct RegistrationCheck<'a> {
    enterprises: &'a DocumentRepository,
    categories: &'a DocumentRepository,
}

#[async_trait]
impl<'a> PreInsertCheck for RegistrationCheck<'a> {
    async fn check(&self, doc: &Document) -> Result<(), ServiceError> {
        let categoria = doc.get_str("categoria").unwrap_or_default();
        if !self.categories.exists(doc! { "nombre": categoria }).await? {
            return Err(ServiceError::NotFound(format!("La categoría con id {categoria} no existe")));
        }
        let numero_cedula = doc.get_str(LEGAL_ID_FIELD).unwrap_or_default();
        if self.enterprises.exists(doc! { "numero_cedula": numero_cedula }).await? {
            return Err(ServiceError::Conflict(DUPLICATE_MESSAGE.into()));
        }
        Ok(())
    }
}

fn to_view(doc: Document) -> Result<EnterpriseView, ServiceError> {
    let id = doc.get("_id").cloned();
    Enterprise::from_document(doc).map(EnterpriseView::from).map_err(|e| {
        error!(id = ?id, error = %e, "stored enterprise does not match the schema");
        ServiceError::Internal("Ocurrió un error inesperado al consultar la base de datos.".into())
    })
}

fn to_views(docs: Vec<Document>) -> Result<Vec<EnterpriseView>, ServiceError> {
    docs.into_iter().map(to_view).collect()
}

fn serialization_failure(e: bson::ser::Error) -> ServiceError {
    error!(error = %e, "enterprise serialization failed");
    ServiceError::Internal("Error al preparar el documento.".into())
}

impl EnterpriseService {
    pub fn new(enterprises: DocumentRepository, categories: DocumentRepository) -> Self {
        Self { enterprises, categories, seed: true, ready: Arc::new(OnceCell::new()) }
    }

    /// Skip category seeding when preparing the collections.
    pub fn with_seeding(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Service over fresh in-process collections.
    pub fn in_memory(enterprise_collection: &str, category_collection: &str) -> Self {
        Self::new(
            DocumentRepository::new(Arc::new(MemoryStore::new(enterprise_collection))),
            DocumentRepository::new(Arc::new(MemoryStore::new(category_collection))),
        )
    }

    pub fn enterprises(&self) -> &DocumentRepository {
        &self.enterprises
    }

    /// Create the unique index and seed categories, once per process.
    /// Errors leave the cell empty so the next call tries again.
    pub async fn ensure_ready(&self) -> Result<(), ServiceError> {
        self.ready
            .get_or_try_init(|| async {
                self.enterprises.ensure_unique(LEGAL_ID_FIELD).await?;
                if self.seed {
                    self.seed_categories().await?;
                }
                info!(collection = %self.enterprises.collection(), "enterprise collections ready");
                Ok::<(), ServiceError>(())
            })
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!(error = %e, "enterprise collections not ready");
                e
            })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<EnterpriseView, ServiceError> {
        to_view(self.enterprises.get_by_id(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<EnterpriseView>, ServiceError> {
        to_views(self.enterprises.get_all().await?)
    }

    /// Enterprises of the category with short code `code`. An unknown code
    /// is a bad request; a known code without enterprises is an empty list.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, code: &str) -> Result<Vec<EnterpriseView>, ServiceError> {
        let category = Category::from_code(code).ok_or_else(|| {
            ServiceError::BadRequest(format!(
                "ID de categoría '{code}' no es válido. Use: {}",
                Category::valid_options()
            ))
        })?;
        let docs = self
            .enterprises
            .find_many(doc! { "categoria": category.display_name() })
            .await?;
        to_views(docs)
    }

    #[instrument(skip(self, input), fields(numero_cedula = %input.numero_cedula, categoria = %input.categoria))]
    pub async fn register(&self, input: NewEnterprise) -> Result<EnterpriseView, ServiceError> {
        input.validate()?;
        let hash = hash_credential(&input.contrasena)?;
        let record = input.into_enterprise(hash);
        let doc = record.to_document().map_err(serialization_failure)?;
        self.ensure_ready().await?;

        let check = RegistrationCheck { enterprises: &self.enterprises, categories: &self.categories };
        let stored = self.enterprises.create(doc, Some(&check)).await.map_err(|e| match e {
            // lost the race against a concurrent registration
            ServiceError::Conflict(_) => ServiceError::Conflict(DUPLICATE_MESSAGE.into()),
            other => other,
        })?;
        let view = to_view(stored)?;
        info!(id = %view.id_empresa, "enterprise_registered");
        Ok(view)
    }

    /// Partial update; `Ok(false)` when nothing changed.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: EnterprisePatch) -> Result<bool, ServiceError> {
        patch.validate()?;
        let fields = patch.to_set_document().map_err(serialization_failure)?;
        self.ensure_ready().await?;
        let modified = self.enterprises.update_by_id(id, fields).await?;
        info!(modified, "enterprise_updated");
        Ok(modified)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.enterprises.delete_by_id(id).await?;
        info!(deleted, "enterprise_deleted");
        Ok(deleted)
    }

    /// Insert the reference document of every category that is missing.
    /// Returns how many were inserted.
    pub async fn seed_categories(&self) -> Result<usize, ServiceError> {
        let mut inserted = 0;
        for category in Category::ALL {
            if self.categories.exists(doc! { "id": category.code() }).await? {
                continue;
            }
            let reference = CategoryRef::from(category);
            let doc = bson::to_document(&reference).map_err(serialization_failure)?;
            self.categories.create(doc, None).await?;
            inserted += 1;
        }
        if inserted > 0 {
            info!(collection = %self.categories.collection(), inserted, "categories_seeded");
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use models::enterprise::LegalIdType;

    use super::*;
    use crate::credentials::verify_credential;
    use crate::errors::FailureKind;

    struct Fixture {
        enterprises: Arc<MemoryStore>,
        svc: EnterpriseService,
    }

    async fn fixture() -> Fixture {
        let enterprises = Arc::new(MemoryStore::new("Enterprise"));
        let categories = Arc::new(MemoryStore::new("Categoria"));
        let svc = EnterpriseService::new(
            DocumentRepository::new(enterprises.clone()),
            DocumentRepository::new(categories),
        );
        assert_eq!(svc.seed_categories().await.unwrap(), 4);
        Fixture { enterprises, svc }
    }

    fn request(numero_cedula: &str, categoria: &str) -> NewEnterprise {
        NewEnterprise {
            tipo_cedula: LegalIdType::Juridica,
            numero_cedula: numero_cedula.into(),
            nombre_empresa: "Restaurante Ejemplo".into(),
            categoria: categoria.into(),
            direccion: "Calle 123, San José, Costa Rica".into(),
            correo_electronico: "info@restaurante.com".into(),
            telefono: "+506 8888 8888".into(),
            foto: Some("https://cdn.example.com/logo.png".into()),
            horario: Some("Lunes a Domingo de 11am a 10pm".into()),
            informacion_empresa: None,
            contrasena: "Passw0rd!".into(),
        }
    }

    #[tokio::test]
    async fn register_stores_input_and_hashes_credential() {
        let f = fixture().await;
        let input = request("3001234567", "Restaurantes");
        let view = f.svc.register(input.clone()).await.unwrap();

        assert_eq!(view.numero_cedula, input.numero_cedula);
        assert_eq!(view.nombre_empresa, input.nombre_empresa);
        assert_eq!(view.categoria, input.categoria);
        assert_eq!(view.direccion, input.direccion);
        assert_eq!(view.correo_electronico, input.correo_electronico);
        assert_eq!(view.telefono, input.telefono);
        assert_eq!(view.foto, input.foto);
        assert_eq!(view.horario, input.horario);
        assert_eq!(view.informacion_empresa, None);
        assert_eq!(view.tipo_cedula, LegalIdType::Juridica);

        let fetched = f.svc.get(&view.id_empresa).await.unwrap();
        assert_eq!(fetched, view);

        let raw = f.svc.enterprises().get_by_id(&view.id_empresa).await.unwrap();
        let hash = raw.get_str("contrasena_hash").unwrap();
        assert_ne!(hash, "Passw0rd!");
        assert!(verify_credential("Passw0rd!", hash));
        assert!(!raw.contains_key("contrasena"));
    }

    #[tokio::test]
    async fn register_unknown_category_is_not_found() {
        let f = fixture().await;
        let err = f.svc.register(request("3001234567", "Panaderias")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert!(f.enterprises.is_empty().await);
    }

    #[tokio::test]
    async fn register_duplicate_legal_id_is_conflict() {
        let f = fixture().await;
        f.svc.register(request("3001234567", "Restaurantes")).await.unwrap();
        let err = f.svc.register(request("3001234567", "Hoteles")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Conflict);
        assert_eq!(f.enterprises.len().await, 1);
    }

    #[tokio::test]
    async fn register_rejects_invalid_fields_before_touching_store() {
        let f = fixture().await;
        let mut input = request("3001234567", "Restaurantes");
        input.contrasena = "short".into();
        assert_eq!(f.svc.register(input).await.unwrap_err().kind(), FailureKind::BadRequest);
        assert!(f.enterprises.is_empty().await);
    }

    #[tokio::test]
    async fn category_listing() {
        let f = fixture().await;
        f.svc.register(request("1", "Restaurantes")).await.unwrap();
        f.svc.register(request("2", "Restaurantes")).await.unwrap();
        f.svc.register(request("3", "Hoteles")).await.unwrap();

        let restaurants = f.svc.list_by_category("1").await.unwrap();
        assert_eq!(restaurants.len(), 2);
        assert!(restaurants.iter().all(|e| e.categoria == "Restaurantes"));

        assert!(f.svc.list_by_category("2").await.unwrap().is_empty());

        let err = f.svc.list_by_category("999").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::BadRequest);
        assert_eq!(
            err.to_string(),
            "ID de categoría '999' no es válido. Use: 1=Restaurantes, 2=Clinicas, 3=Barberias, 4=Hoteles"
        );
        assert_eq!(f.svc.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let f = fixture().await;
        let view = f.svc.register(request("3001234567", "Restaurantes")).await.unwrap();

        assert!(!f.svc.update(&view.id_empresa, EnterprisePatch::default()).await.unwrap());

        let patch = EnterprisePatch { categoria: Some("Hoteles".into()), ..Default::default() };
        assert!(f.svc.update(&view.id_empresa, patch.clone()).await.unwrap());
        assert!(!f.svc.update(&view.id_empresa, patch).await.unwrap());
        assert_eq!(f.svc.get(&view.id_empresa).await.unwrap().categoria, "Hoteles");

        let bad = EnterprisePatch { categoria: Some("Panaderias".into()), ..Default::default() };
        assert_eq!(f.svc.update(&view.id_empresa, bad).await.unwrap_err().kind(), FailureKind::BadRequest);

        assert!(f.svc.delete(&view.id_empresa).await.unwrap());
        assert_eq!(f.svc.get(&view.id_empresa).await.unwrap_err().kind(), FailureKind::NotFound);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let f = fixture().await;
        assert_eq!(f.svc.seed_categories().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_keep_legal_id_unique() {
        let f = fixture().await;
        let mut tasks = Vec::new();
        for _ in 0..6 {
            let svc = f.svc.clone();
            tasks.push(tokio::spawn(async move { svc.register(request("3001234567", "Restaurantes")).await }));
        }
        let mut registered = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => registered += 1,
                Err(e) => {
                    assert_eq!(e.kind(), FailureKind::Conflict);
                    assert_eq!(e.to_string(), "La empresa con el id a registrar ya existe");
                }
            }
        }
        assert_eq!(registered, 1);
        assert_eq!(f.enterprises.len().await, 1);
    }

    #[tokio::test]
    async fn patch_cannot_take_another_legal_id() {
        let f = fixture().await;
        f.svc.register(request("1", "Restaurantes")).await.unwrap();
        let second = f.svc.register(request("2", "Hoteles")).await.unwrap();

        let patch = EnterprisePatch { numero_cedula: Some("1".into()), ..Default::default() };
        let err = f.svc.update(&second.id_empresa, patch).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Conflict);
        assert_eq!(f.svc.get(&second.id_empresa).await.unwrap().numero_cedula, "2");
    }

    #[tokio::test]
    async fn collections_are_prepared_once_the_store_comes_back() {
        let enterprises = Arc::new(MemoryStore::new("Enterprise"));
        let categories = Arc::new(MemoryStore::new("Categoria"));
        let svc = EnterpriseService::new(
            DocumentRepository::new(enterprises.clone()),
            DocumentRepository::new(categories.clone()),
        );
        enterprises.set_available(false);
        categories.set_available(false);
        assert_eq!(svc.ensure_ready().await.unwrap_err().kind(), FailureKind::Internal);
        assert_eq!(
            svc.register(request("3001234567", "Restaurantes")).await.unwrap_err().kind(),
            FailureKind::Internal
        );

        enterprises.set_available(true);
        categories.set_available(true);
        let view = svc.register(request("3001234567", "Restaurantes")).await.unwrap();
        assert_eq!(view.categoria, "Restaurantes");
        assert_eq!(categories.len().await, 4);
        assert_eq!(
            svc.register(request("3001234567", "Hoteles")).await.unwrap_err().kind(),
            FailureKind::Conflict
        );
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let svc = EnterpriseService::in_memory("Enterprise", "Categoria").with_seeding(false);
        svc.ensure_ready().await.unwrap();
        let err = svc.register(request("3001234567", "Restaurantes")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[tokio::test]
    async fn malformed_stored_document_is_internal() {
        let f = fixture().await;
        let stored = f
            .svc
            .enterprises()
            .create(doc! { "nombre_empresa": "Sin esquema" }, None)
            .await
            .unwrap();
        let id = stored.get_object_id("_id").unwrap().to_hex();
        assert_eq!(f.svc.get(&id).await.unwrap_err().kind(), FailureKind::Internal);
    }
}
