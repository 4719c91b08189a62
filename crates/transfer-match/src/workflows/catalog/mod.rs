//! Catalog ingestion and the fixture-backed candidate provider.
//!
//! The service can boot against a CSV export of the college directory when
//! the live provider is unavailable (demos, tests, offline development). The
//! imported catalog answers the same `CandidateProvider` contract as a
//! remote backend and reports itself as the fixture source.

mod parser;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::workflows::recommendation::domain::College;
use crate::workflows::recommendation::geo::state_matches;
use crate::workflows::recommendation::provider::{
    CandidateBatch, CandidateFilter, CandidateProvider, CandidateSource, ProviderError,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<College>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<College>, CatalogImportError> {
        parser::parse_catalog(reader)
    }
}

/// In-memory candidate provider backed by an imported catalog.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    colleges: Arc<Vec<College>>,
}

impl CatalogProvider {
    pub fn new(colleges: Vec<College>) -> Self {
        Self {
            colleges: Arc::new(colleges),
        }
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        Ok(Self::new(CatalogImporter::from_path(path)?))
    }

    pub fn len(&self) -> usize {
        self.colleges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }
}

#[async_trait]
impl CandidateProvider for CatalogProvider {
    async fn fetch(&self, filter: &CandidateFilter) -> Result<CandidateBatch, ProviderError> {
        let mut colleges: Vec<College> = match filter.state.as_deref() {
            Some(state) => self
                .colleges
                .iter()
                .filter(|college| state_matches(&college.location.state, state))
                .cloned()
                .collect(),
            None => self.colleges.as_ref().clone(),
        };
        if let Some(limit) = filter.limit {
            colleges.truncate(limit);
        }
        Ok(CandidateBatch {
            colleges,
            source: CandidateSource::Fixture,
        })
    }

    async fn search_by_name(&self, text: &str) -> Result<CandidateBatch, ProviderError> {
        let needle = text.trim().to_ascii_lowercase();
        let colleges: Vec<College> = if needle.is_empty() {
            Vec::new()
        } else {
            self.colleges
                .iter()
                .filter(|college| college.name.to_ascii_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        Ok(CandidateBatch {
            colleges,
            source: CandidateSource::Fixture,
        })
    }
}
