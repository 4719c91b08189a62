//! Top-level recommendation pipeline.
//!
//! `recommend` is infallible by design: every expected zero-result condition
//! comes back as an [`EmptyState`], provider failures degrade to the
//! appropriate empty-state, and completion failures degrade to neutral AI
//! factors. The diagnostics snapshot travels with the outcome instead of
//! living on the service as mutable state, so the pipeline stays pure given
//! its inputs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::completion::{
    self, CompletionProvider, AI_CANDIDATE_LIMIT, NEUTRAL_AI_FACTOR,
};
use super::domain::{College, CollegeId, EmptyState, Recommendation, StudentProfile};
use super::explain;
use super::fit::{self, BaseScores, BlendWeights};
use super::geo::state_matches;
use super::provider::{
    CandidateFilter, CandidateProvider, CandidateSource, ProviderError,
};
use super::query::{query_match_score, MIN_QUERY_LEN};
use super::questionnaire::{GeoPreference, NormalizedQuestionnaire, QuestionnaireAnswers};
use super::scoring::{score_college, NEUTRAL_SCORE};
use super::weights::PreferenceWeights;

/// Fallback state applied when a guest has no usable location.
pub const DEFAULT_STATE: &str = "Washington";

const DEFAULT_MAX_RESULTS: usize = 12;
const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(12);
const BASE_BLEND_WEIGHT: f64 = 0.9;
const AI_BLEND_WEIGHT: f64 = 0.1;
const MAX_QUERY_BOOST: f64 = 10.0;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_weighted() -> bool {
    true
}

/// Caller-facing request for the `recommend` entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub profile: Option<StudentProfile>,
    #[serde(default)]
    pub questionnaire: Option<QuestionnaireAnswers>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_weighted")]
    pub weighted: bool,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            query: None,
            profile: None,
            questionnaire: None,
            max_results: DEFAULT_MAX_RESULTS,
            weighted: true,
        }
    }
}

impl RecommendationRequest {
    pub fn name_search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            weighted: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Weighted,
    NameSearch,
}

/// Component scores for one ranked candidate, kept for support debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTrace {
    pub id: CollegeId,
    pub name: String,
    pub base: u8,
    pub gpa_fit: u8,
    pub prestige: u8,
    pub major_fit: u8,
    pub preference_fit: u8,
    pub ai_factor: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_match: Option<u8>,
    pub final_score: u8,
}

/// Introspectable snapshot of a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDiagnostics {
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_state: Option<String>,
    pub wants_in_state: bool,
    pub used_fallback_state: bool,
    pub fetched: usize,
    pub after_state_filter: usize,
    pub scored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_source: Option<CandidateSource>,
    pub ai_candidates: usize,
    pub ai_factors_applied: usize,
    pub ai_degraded: bool,
    pub top: Vec<CandidateTrace>,
    pub notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl RunDiagnostics {
    fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            resolved_state: None,
            wants_in_state: false,
            used_fallback_state: false,
            fetched: 0,
            after_state_filter: 0,
            scored: 0,
            candidate_source: None,
            ai_candidates: 0,
            ai_factors_applied: 0,
            ai_degraded: false,
            top: Vec::new(),
            notes: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

/// What `recommend` returns: ranked results, an optional explanation for an
/// empty list, and the run snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub results: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
    pub diagnostics: RunDiagnostics,
}

impl RecommendationOutcome {
    fn empty(empty_state: EmptyState, diagnostics: RunDiagnostics) -> Self {
        Self {
            results: Vec::new(),
            empty_state: Some(empty_state),
            diagnostics,
        }
    }
}

struct ScoredCandidate {
    college: College,
    scores: BaseScores,
}

struct RankedCandidate {
    college: College,
    scores: BaseScores,
    ai_factor: u8,
    query_match: Option<u8>,
    final_score: u8,
}

/// The engine facade composing the candidate provider and the optional
/// completion provider.
pub struct RecommendationService<P> {
    candidates: Arc<P>,
    completion: Option<Arc<dyn CompletionProvider>>,
    completion_timeout: Duration,
}

impl<P> RecommendationService<P>
where
    P: CandidateProvider + 'static,
{
    pub fn new(candidates: Arc<P>) -> Self {
        Self {
            candidates,
            completion: None,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    /// Attach a live completion provider. Without one, every AI candidate
    /// receives the neutral factor.
    pub fn with_completion(
        mut self,
        completion: Arc<dyn CompletionProvider>,
        timeout: Duration,
    ) -> Self {
        self.completion = Some(completion);
        self.completion_timeout = timeout;
        self
    }

    /// Entry point. Expected zero-result conditions come back as data; this
    /// call itself never fails.
    pub async fn recommend(&self, request: RecommendationRequest) -> RecommendationOutcome {
        let query = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        let max_results = request.max_results.max(1);

        if !request.weighted {
            return self.name_search(query, max_results).await;
        }
        self.weighted_search(query, &request, max_results).await
    }

    async fn name_search(&self, query: Option<&str>, max_results: usize) -> RecommendationOutcome {
        let mut diagnostics = RunDiagnostics::new(SearchMode::NameSearch);

        let Some(query) = query.filter(|text| text.chars().count() >= MIN_QUERY_LEN) else {
            diagnostics
                .notes
                .push("search query shorter than two characters".to_string());
            return RecommendationOutcome::empty(EmptyState::query_too_short(), diagnostics);
        };

        let batch = match self.candidates.search_by_name(query).await {
            Ok(batch) => batch,
            Err(err) => return upstream_failure(err, diagnostics),
        };

        diagnostics.candidate_source = Some(batch.source);
        diagnostics.fetched = batch.colleges.len();

        let results: Vec<Recommendation> = batch
            .colleges
            .into_iter()
            .take(max_results)
            .map(|college| Recommendation {
                score: NEUTRAL_SCORE,
                score_text: explain::score_text(NEUTRAL_SCORE),
                breakdown: None,
                breakdown_text: None,
                reason: format!("Matched your search for \"{query}\""),
                college,
            })
            .collect();
        diagnostics.scored = results.len();

        let empty_state = results.is_empty().then(|| EmptyState::search_miss(query));
        RecommendationOutcome {
            results,
            empty_state,
            diagnostics,
        }
    }

    async fn weighted_search(
        &self,
        query: Option<&str>,
        request: &RecommendationRequest,
        max_results: usize,
    ) -> RecommendationOutcome {
        let mut diagnostics = RunDiagnostics::new(SearchMode::Weighted);

        let questionnaire = request
            .questionnaire
            .as_ref()
            .map(QuestionnaireAnswers::normalize);
        let questionnaire = questionnaire.as_ref();
        let profile = request.profile.as_ref();

        // In-state policy resolution.
        let geography = questionnaire
            .map(|answers| answers.geography)
            .unwrap_or(GeoPreference::NoPreference);
        let guest = profile.map(|profile| profile.guest).unwrap_or(true);
        let home_state = profile.and_then(|profile| profile.home_state());

        let wants_in_state = match geography {
            GeoPreference::InState => true,
            GeoPreference::OutOfState => false,
            // Guests never told us; bias them toward the default state.
            GeoPreference::NoPreference => guest,
        };
        diagnostics.wants_in_state = wants_in_state;

        let (effective_state, used_fallback) = match home_state {
            Some(state) => (Some(state.to_string()), false),
            None if guest => (Some(DEFAULT_STATE.to_string()), true),
            None => (None, false),
        };
        diagnostics.used_fallback_state = used_fallback;
        if used_fallback {
            diagnostics
                .notes
                .push(format!("no usable state; assumed {DEFAULT_STATE}"));
        }

        let effective_state = match (wants_in_state, effective_state) {
            (true, None) => {
                // Signed-in user explicitly asked for in-state but has no
                // state on file. Explicit beats a silent substitute.
                diagnostics
                    .notes
                    .push("in-state requested but no state on profile".to_string());
                return RecommendationOutcome::empty(EmptyState::state_missing(), diagnostics);
            }
            (_, state) => state,
        };
        diagnostics.resolved_state = effective_state.clone();

        // Candidate fetch, scoped first, then unscoped as a fallback.
        let filter = match (wants_in_state, effective_state.as_deref()) {
            (true, Some(state)) => CandidateFilter::for_state(state),
            _ => CandidateFilter::unscoped(),
        };
        let batch = match self.candidates.fetch(&filter).await {
            Ok(batch) => batch,
            Err(err) => return upstream_failure(err, diagnostics),
        };
        diagnostics.candidate_source = Some(batch.source);
        diagnostics.fetched = batch.colleges.len();

        let mut pool = batch.colleges;
        if wants_in_state {
            let state = effective_state.as_deref().unwrap_or(DEFAULT_STATE);

            if pool.is_empty() {
                info!(state, "state-scoped fetch was empty; retrying unscoped");
                diagnostics
                    .notes
                    .push("state-scoped fetch empty; refetched unscoped".to_string());
                let fallback = match self.candidates.fetch(&CandidateFilter::unscoped()).await {
                    Ok(batch) => batch,
                    Err(err) => return upstream_failure(err, diagnostics),
                };
                diagnostics.fetched = fallback.colleges.len();
                diagnostics.candidate_source = Some(fallback.source);
                pool = fallback.colleges;
            }

            pool.retain(|college| state_matches(&college.location.state, state));
            diagnostics.after_state_filter = pool.len();

            if pool.is_empty() {
                return RecommendationOutcome::empty(
                    EmptyState::no_in_state_matches(state),
                    diagnostics,
                );
            }
        } else {
            diagnostics.after_state_filter = pool.len();
        }

        // Deterministic pass.
        let blend = BlendWeights::from_questionnaire(questionnaire);
        let mut scored: Vec<ScoredCandidate> = pool
            .into_iter()
            .map(|college| {
                let scores = fit::base_scores(&college, profile, questionnaire, &blend);
                ScoredCandidate { college, scores }
            })
            .collect();
        diagnostics.scored = scored.len();
        scored.sort_by(|a, b| {
            b.scores
                .base
                .cmp(&a.scores.base)
                .then_with(|| a.college.name.cmp(&b.college.name))
        });

        // AI augmentation over the top slice, never fatal.
        let factors = self
            .ai_factors(&scored, profile, questionnaire, query, &mut diagnostics)
            .await;

        // Final blend over every candidate, not just the AI subset.
        let active_query = query.filter(|text| text.chars().count() >= MIN_QUERY_LEN);
        let mut ranked: Vec<RankedCandidate> = scored
            .into_iter()
            .map(|candidate| {
                let ai_factor = factors
                    .get(&candidate.college.id)
                    .copied()
                    .unwrap_or(NEUTRAL_AI_FACTOR);
                let query_match =
                    active_query.map(|text| query_match_score(&candidate.college, text));
                let boost = query_match
                    .map(|score| (f64::from(score) / 100.0 * MAX_QUERY_BOOST).round())
                    .unwrap_or(0.0);
                let final_score = (f64::from(candidate.scores.base) * BASE_BLEND_WEIGHT
                    + f64::from(ai_factor) * AI_BLEND_WEIGHT
                    + boost)
                    .round()
                    .clamp(0.0, 100.0) as u8;
                RankedCandidate {
                    college: candidate.college,
                    scores: candidate.scores,
                    ai_factor,
                    query_match,
                    final_score,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.final_score
                .cmp(&a.final_score)
                .then_with(|| a.college.name.cmp(&b.college.name))
        });
        ranked.truncate(max_results);

        // Explanation and caller-facing breakdowns.
        let weights = PreferenceWeights::build(profile, questionnaire, query);
        let fallback_note = (used_fallback && wants_in_state).then(|| {
            format!("Results assume {DEFAULT_STATE} because no state was on your profile.")
        });

        let results: Vec<Recommendation> = ranked
            .iter()
            .map(|candidate| {
                let breakdown = score_college(
                    &candidate.college,
                    &weights,
                    profile,
                    questionnaire,
                    Some(candidate.ai_factor),
                );
                let reason = explain::reason(
                    candidate.scores.gpa_fit,
                    candidate.scores.prestige,
                    candidate.scores.major_fit,
                    candidate.scores.preference_fit,
                    candidate.ai_factor,
                    candidate.query_match,
                    fallback_note.as_deref(),
                );
                Recommendation {
                    college: candidate.college.clone(),
                    score: candidate.final_score,
                    score_text: explain::score_text(candidate.final_score),
                    breakdown: Some(breakdown),
                    breakdown_text: Some(explain::breakdown_text(&breakdown)),
                    reason,
                }
            })
            .collect();

        diagnostics.top = ranked
            .iter()
            .map(|candidate| CandidateTrace {
                id: candidate.college.id.clone(),
                name: candidate.college.name.clone(),
                base: candidate.scores.base,
                gpa_fit: candidate.scores.gpa_fit,
                prestige: candidate.scores.prestige,
                major_fit: candidate.scores.major_fit,
                preference_fit: candidate.scores.preference_fit,
                ai_factor: candidate.ai_factor,
                query_match: candidate.query_match,
                final_score: candidate.final_score,
            })
            .collect();

        RecommendationOutcome {
            results,
            empty_state: None,
            diagnostics,
        }
    }

    /// Rate the top slice through the completion provider. Timeouts, transport
    /// failures, and unparseable responses all degrade to an empty map; the
    /// caller substitutes the neutral factor per candidate.
    async fn ai_factors(
        &self,
        scored: &[ScoredCandidate],
        profile: Option<&StudentProfile>,
        questionnaire: Option<&NormalizedQuestionnaire>,
        query: Option<&str>,
        diagnostics: &mut RunDiagnostics,
    ) -> BTreeMap<CollegeId, u8> {
        let slice: Vec<&College> = scored
            .iter()
            .take(AI_CANDIDATE_LIMIT)
            .map(|candidate| &candidate.college)
            .collect();
        diagnostics.ai_candidates = slice.len();

        let Some(provider) = self.completion.as_ref() else {
            diagnostics
                .notes
                .push("no completion provider; neutral AI factors".to_string());
            return BTreeMap::new();
        };
        if slice.is_empty() {
            return BTreeMap::new();
        }

        let prompt = completion::build_prompt(&slice, profile, questionnaire, query);
        let factors =
            match tokio::time::timeout(self.completion_timeout, provider.complete(&prompt)).await
            {
                Ok(Ok(text)) => {
                    let parsed = completion::parse_ai_factors(&text);
                    if parsed.is_empty() {
                        diagnostics.ai_degraded = true;
                        diagnostics
                            .notes
                            .push("completion response unusable; neutral AI factors".to_string());
                    }
                    parsed
                }
                Ok(Err(err)) => {
                    warn!(%err, "completion provider failed; degrading to neutral factors");
                    diagnostics.ai_degraded = true;
                    diagnostics
                        .notes
                        .push(format!("completion failed ({err}); neutral AI factors"));
                    BTreeMap::new()
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.completion_timeout.as_secs(),
                        "completion provider timed out; degrading to neutral factors"
                    );
                    diagnostics.ai_degraded = true;
                    diagnostics
                        .notes
                        .push("completion timed out; neutral AI factors".to_string());
                    BTreeMap::new()
                }
            };

        diagnostics.ai_factors_applied = slice
            .iter()
            .filter(|college| factors.contains_key(&college.id))
            .count();
        factors
    }
}

fn upstream_failure(err: ProviderError, mut diagnostics: RunDiagnostics) -> RecommendationOutcome {
    warn!(%err, "candidate provider failed");
    diagnostics.notes.push(format!("candidate fetch failed: {err}"));
    let empty_state = match err {
        ProviderError::Timeout => EmptyState::network_timeout(),
        ProviderError::Unavailable(_) | ProviderError::Malformed(_) => {
            EmptyState::upstream_error()
        }
    };
    RecommendationOutcome::empty(empty_state, diagnostics)
}
