use std::sync::Arc;

use configs::DatabaseConfig;
use service::repository::DocumentRepository;
use service::store::MongoStore;
use service::EnterpriseService;

/// Shared router state; cloning is cheap (repositories hold `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub enterprises: EnterpriseService,
}

impl AppState {
    pub fn new(enterprises: EnterpriseService) -> Self {
        Self { enterprises }
    }

    /// State over the two MongoDB collections named in `cfg`.
    pub fn from_database(db: &mongodb::Database, cfg: &DatabaseConfig) -> Self {
        let enterprises = DocumentRepository::new(Arc::new(MongoStore::new(db, &cfg.enterprise_collection)));
        let categories = DocumentRepository::new(Arc::new(MongoStore::new(db, &cfg.category_collection)));
        Self::new(EnterpriseService::new(enterprises, categories).with_seeding(cfg.seed_categories))
    }

    /// State over in-process collections; nothing survives a restart.
    pub fn in_memory(cfg: &DatabaseConfig) -> Self {
        Self::new(
            EnterpriseService::in_memory(&cfg.enterprise_collection, &cfg.category_collection)
                .with_seeding(cfg.seed_categories),
        )
    }
}
