//! Collaborator seam for the external college-data provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::College;

/// Filter handed to the provider for a scoped fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub state: Option<String>,
    pub limit: Option<usize>,
}

impl CandidateFilter {
    pub fn for_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            limit: None,
        }
    }

    pub fn unscoped() -> Self {
        Self::default()
    }
}

/// Which backing source answered a fetch. Recorded for diagnostics only; the
/// pipeline must not behave differently per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Remote,
    Cache,
    Fixture,
}

impl CandidateSource {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateSource::Remote => "remote",
            CandidateSource::Cache => "cache",
            CandidateSource::Fixture => "fixture",
        }
    }
}

/// A provider answer: the candidates plus where they came from.
#[derive(Debug, Clone)]
pub struct CandidateBatch {
    pub colleges: Vec<College>,
    pub source: CandidateSource,
}

/// Error enumeration for provider failures. `Timeout` surfaces to callers as
/// the timeout-specific empty-state; everything else reads as upstream
/// trouble.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("candidate provider request timed out")]
    Timeout,
    #[error("candidate provider unavailable: {0}")]
    Unavailable(String),
    #[error("candidate provider returned malformed data: {0}")]
    Malformed(String),
}

/// College-data collaborator. May be backed by a live remote API, a cache,
/// or fixture data; the engine records which source answered but never
/// depends on it.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn fetch(&self, filter: &CandidateFilter) -> Result<CandidateBatch, ProviderError>;
    async fn search_by_name(&self, text: &str) -> Result<CandidateBatch, ProviderError>;
}
