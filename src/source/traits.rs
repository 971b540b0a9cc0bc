use crate::config::TargetConfig;
use crate::model::{BrandConnection, CandidateRecord, SourceError};

/// Supplies the co-occurrence snapshot and the candidate records of a run.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_connections(&self) -> Result<Vec<BrandConnection>, SourceError>;
    async fn fetch_candidates(&self, target: &TargetConfig) -> Result<Vec<CandidateRecord>, SourceError>;
}
