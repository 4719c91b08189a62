//! College recommendation pipeline.
//!
//! Layered as: normalization helpers (geo, questionnaire, rates) → the
//! preference-weight builder → deterministic sub-scorers → the AI-factor
//! blender and ranker behind [`service::RecommendationService`].

pub mod completion;
pub mod domain;
mod explain;
mod fit;
pub mod geo;
pub mod provider;
pub mod query;
pub mod questionnaire;
pub mod router;
pub mod scoring;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use completion::{CompletionError, CompletionProvider, HttpCompletionClient};
pub use domain::{
    CampusLocation, College, CollegeId, EmptyState, EmptyStateCode, GpaValue, Ownership,
    Recommendation, SettingCategory, SizeCategory, StudentProfile,
};
pub use geo::state_matches;
pub use provider::{
    CandidateBatch, CandidateFilter, CandidateProvider, CandidateSource, ProviderError,
};
pub use query::query_match_score;
pub use questionnaire::{NormalizedQuestionnaire, QuestionnaireAnswers};
pub use router::recommendation_router;
pub use scoring::{score_college, ScoreBreakdown};
pub use service::{
    CandidateTrace, RecommendationOutcome, RecommendationRequest, RecommendationService,
    RunDiagnostics, SearchMode, DEFAULT_STATE,
};
pub use weights::PreferenceWeights;
