//! Purchase history loading.

use chat_core::{ChatBackend, PurchaseRecord};
use tracing::{debug, warn};

/// Fetch the purchase history once.
///
/// A backend error yields an empty list.
pub async fn load_purchases(backend: &dyn ChatBackend) -> Vec<PurchaseRecord> {
    match backend.fetch_purchases().await {
        Ok(rows) => {
            debug!("Loaded {} purchases", rows.len());
            rows
        }
        Err(e) => {
            warn!(error = %e, "Error fetching purchase codes");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_backend::{FailingBackend, ScriptedBackend};

    #[tokio::test]
    async fn test_load_purchases() {
        let backend = ScriptedBackend::new().with_purchases(vec![PurchaseRecord {
            producto: "Netflix".to_string(),
            ..Default::default()
        }]);

        let rows = load_purchases(&backend).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].producto, "Netflix");
    }

    #[tokio::test]
    async fn test_load_purchases_failure_is_empty() {
        assert!(load_purchases(&FailingBackend::new()).await.is_empty());
    }
}
