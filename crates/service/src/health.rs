use common::types::HealthReport;
use tracing::warn;

use crate::repository::DocumentRepository;

/// Ping the store behind `repo`; the failure reason is reported verbatim.
pub async fn check(repo: &DocumentRepository) -> HealthReport {
    match repo.ping().await {
        Ok(()) => HealthReport::healthy(),
        Err(e) => {
            warn!(collection = %repo.collection(), error = %e, "database health probe failed");
            HealthReport::database_down(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn reports_store_state() {
        let store = Arc::new(MemoryStore::new("Enterprise"));
        let repo = DocumentRepository::new(store.clone());
        assert_eq!(check(&repo).await, HealthReport::healthy());

        store.set_available(false);
        let report = check(&repo).await;
        assert!(!report.is_healthy());
        assert_eq!(report.reason.as_deref(), Some("store unavailable: Enterprise is offline"));
    }
}
