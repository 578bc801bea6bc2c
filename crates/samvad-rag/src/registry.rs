//! Service registry - maps domains and numeric service ids to fully-qualified
//! retrieval service names.
//!
//! Rows are externally managed and read-only here. Id rows carry the active
//! flag; domain rows are versioned by effective date. The reserved
//! `"default"` domain is the fallback of last resort.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::PipelineError;
use crate::request::ServiceKey;

/// Reserved fallback domain.
pub const DEFAULT_DOMAIN: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub service_id: i64,
    pub domain: String,
    pub service_name: String,
    pub is_active: bool,
    pub effective_date: NaiveDate,
}

/// Read access to the registry store.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// All rows matching a numeric service id.
    async fn entries_for_id(&self, service_id: i64) -> Result<Vec<RegistryEntry>>;

    /// All rows for a domain, any effective date.
    async fn entries_for_domain(&self, domain: &str) -> Result<Vec<RegistryEntry>>;
}

/// Resolution policy over a [`ServiceRegistry`].
pub struct ServiceResolver {
    registry: Arc<dyn ServiceRegistry>,
}

impl ServiceResolver {
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a service key to a fully-qualified service name.
    ///
    /// Id lookups require an active row. Domain lookups take the row with
    /// the most recent effective date, falling back to the `"default"`
    /// domain when the specific domain has no rows.
    pub async fn resolve(&self, key: &ServiceKey) -> Result<String, PipelineError> {
        match key {
            ServiceKey::Id(id) => {
                let rows = self
                    .registry
                    .entries_for_id(*id)
                    .await
                    .map_err(|e| PipelineError::ServiceResolution(e.to_string()))?;
                rows.into_iter()
                    .find(|row| row.is_active)
                    .map(|row| row.service_name)
                    .ok_or_else(|| {
                        PipelineError::ServiceResolution(format!(
                            "no active registry entry for service id {}",
                            id
                        ))
                    })
            }
            ServiceKey::Domain(domain) => {
                if let Some(name) = self.lookup_domain(domain).await? {
                    return Ok(name);
                }
                tracing::debug!(domain = %domain, "no registry entry for domain, trying default");
                if let Some(name) = self.lookup_domain(DEFAULT_DOMAIN).await? {
                    return Ok(name);
                }
                Err(PipelineError::ServiceResolution(format!(
                    "no registry entry for domain '{}' and no default entry",
                    domain
                )))
            }
        }
    }

    async fn lookup_domain(&self, domain: &str) -> Result<Option<String>, PipelineError> {
        let rows = self
            .registry
            .entries_for_domain(domain)
            .await
            .map_err(|e| PipelineError::ServiceResolution(e.to_string()))?;
        Ok(Self::pick_latest(rows))
    }

    /// The single place the recency rule lives: the most recent effective
    /// date wins.
    fn pick_latest(rows: Vec<RegistryEntry>) -> Option<String> {
        rows.into_iter()
            .max_by_key(|row| row.effective_date)
            .map(|row| row.service_name)
    }
}

/// Embedded in-memory registry, for local use and tests.
#[derive(Default)]
pub struct MemoryRegistry {
    entries: RwLock<Vec<RegistryEntry>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: RegistryEntry) {
        self.entries.write().push(entry);
    }
}

#[async_trait]
impl ServiceRegistry for MemoryRegistry {
    async fn entries_for_id(&self, service_id: i64) -> Result<Vec<RegistryEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|row| row.service_id == service_id)
            .cloned()
            .collect())
    }

    async fn entries_for_domain(&self, domain: &str) -> Result<Vec<RegistryEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|row| row.domain == domain)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        service_id: i64,
        domain: &str,
        service_name: &str,
        is_active: bool,
        effective_date: &str,
    ) -> RegistryEntry {
        RegistryEntry {
            service_id,
            domain: domain.to_string(),
            service_name: service_name.to_string(),
            is_active,
            effective_date: effective_date.parse().unwrap(),
        }
    }

    fn resolver(entries: Vec<RegistryEntry>) -> ServiceResolver {
        let registry = MemoryRegistry::new();
        for e in entries {
            registry.insert(e);
        }
        ServiceResolver::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn id_lookup_requires_active_row() {
        let resolver = resolver(vec![
            entry(1, "finance", "db.schema.finance_v1", false, "2024-01-01"),
            entry(1, "finance", "db.schema.finance_v2", true, "2024-06-01"),
        ]);
        let name = resolver.resolve(&ServiceKey::Id(1)).await.unwrap();
        assert_eq!(name, "db.schema.finance_v2");
    }

    #[tokio::test]
    async fn id_lookup_fails_without_active_row() {
        let resolver = resolver(vec![entry(
            1,
            "finance",
            "db.schema.finance_v1",
            false,
            "2024-01-01",
        )]);
        let err = resolver.resolve(&ServiceKey::Id(1)).await.unwrap_err();
        assert!(matches!(err, PipelineError::ServiceResolution(_)));
    }

    #[tokio::test]
    async fn domain_lookup_prefers_latest_effective_date() {
        let resolver = resolver(vec![
            entry(1, "finance", "db.schema.finance_old", true, "2023-03-01"),
            entry(2, "finance", "db.schema.finance_new", true, "2024-09-15"),
        ]);
        let name = resolver
            .resolve(&ServiceKey::Domain("finance".to_string()))
            .await
            .unwrap();
        assert_eq!(name, "db.schema.finance_new");
    }

    #[tokio::test]
    async fn domain_lookup_falls_back_to_default() {
        let resolver = resolver(vec![entry(
            9,
            DEFAULT_DOMAIN,
            "db.schema.general",
            true,
            "2024-01-01",
        )]);
        let name = resolver
            .resolve(&ServiceKey::Domain("legal".to_string()))
            .await
            .unwrap();
        assert_eq!(name, "db.schema.general");
    }

    #[tokio::test]
    async fn resolution_fails_without_default() {
        let resolver = resolver(vec![]);
        let err = resolver
            .resolve(&ServiceKey::Domain("legal".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ServiceResolution(_)));
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent() {
        let resolver = resolver(vec![
            entry(1, "finance", "db.schema.finance_old", true, "2023-03-01"),
            entry(2, "finance", "db.schema.finance_new", true, "2024-09-15"),
        ]);
        let key = ServiceKey::Domain("finance".to_string());
        let first = resolver.resolve(&key).await.unwrap();
        let second = resolver.resolve(&key).await.unwrap();
        assert_eq!(first, second);
    }
}
