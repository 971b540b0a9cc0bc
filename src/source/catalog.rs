use super::traits::RecordSource;
use crate::config::{AppConfig, TargetConfig};
use crate::model::{BrandConnection, CandidateRecord, RawConnection, SourceError};
use crate::storage::SqliteStorage;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Candidate snapshot row. Rows without `source`/`country_code` apply to every target.
#[derive(Debug, Deserialize)]
struct SnapshotItem {
    #[serde(flatten)]
    record: CandidateRecord,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

/// Reads JSON snapshots when configured, the catalog database otherwise.
pub struct CatalogSource {
    config: Arc<AppConfig>,
    storage: Arc<Mutex<SqliteStorage>>,
}

impl CatalogSource {
    pub fn new(config: Arc<AppConfig>, storage: Arc<Mutex<SqliteStorage>>) -> Self {
        Self { config, storage }
    }

    fn to_connections(&self, raw: Vec<RawConnection>) -> Vec<BrandConnection> {
        raw.into_iter()
            .filter_map(|r| {
                BrandConnection::from_delimited(&r.primary, &r.related, &self.config.connection_delimiter)
                    .without_generic(&self.config.generic_brands)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecordSource for CatalogSource {
    async fn fetch_connections(&self) -> Result<Vec<BrandConnection>, SourceError> {
        let raw: Vec<RawConnection> = match &self.config.connections_path {
            Some(path) => {
                info!("Reading brand connections from {}", path);
                let content = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&content)?
            }
            None => self.storage.lock().await.get_brand_connections()?,
        };
        Ok(self.to_connections(raw))
    }

    async fn fetch_candidates(&self, target: &TargetConfig) -> Result<Vec<CandidateRecord>, SourceError> {
        match &self.config.records_path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                let items: Vec<SnapshotItem> = serde_json::from_str(&content)?;
                Ok(items
                    .into_iter()
                    .filter(|i| i.source.as_deref().is_none_or(|s| s == target.source))
                    .filter(|i| {
                        i.country_code
                            .as_deref()
                            .is_none_or(|c| c == target.country_code)
                    })
                    .map(|i| i.record)
                    .collect())
            }
            None => {
                let records = self.storage.lock().await.get_candidates(
                    &target.source,
                    &target.country_code,
                    &self.config.generic_brands,
                    &self.config.version_key,
                )?;
                Ok(records)
            }
        }
    }
}
