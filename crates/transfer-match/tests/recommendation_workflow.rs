//! Integration specifications for the recommendation pipeline.
//!
//! Scenarios drive the public facade only: a catalog imported from CSV, the
//! service built on top of it, and an optional scripted completion provider.
//! No private modules are reached into.

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use transfer_match::workflows::catalog::{CatalogImporter, CatalogProvider};
    use transfer_match::workflows::recommendation::{
        CompletionError, CompletionProvider, GpaValue, QuestionnaireAnswers,
        RecommendationRequest, RecommendationService, StudentProfile,
    };

    pub(super) const CATALOG_CSV: &str = "\
id,name,city,state,tuition,size,setting,admission_rate,completion_rate,pell_rate,median_debt,programs,ownership
wa-cascade,Cascade State University,Seattle,WA,11839,large,urban,0.52,0.84,0.24,16500,Computer Science|Mechanical Engineering|Biology,public
wa-puget,Puget Sound Institute,Tacoma,WA,52000,small,suburban,23,68,31,27000,Computer Science|Philosophy,private
wa-harbor,Harbor Technical College,Aberdeen,Washington,6500,medium,rural,,0.61,0.44,12000,Nursing|Welding Technology,public
or-willamette,Willamette Valley College,Salem,OR,9800,medium,rural,0.78,0.55,0.38,15000,Agriculture|Biology,public
ca-bayside,Bayside University,Oakland,CA,58000,large,urban,0.12,0.91,0.18,31000,Computer Science|Film Studies,private
";

    pub(super) fn provider() -> CatalogProvider {
        let colleges = CatalogImporter::from_reader(std::io::Cursor::new(CATALOG_CSV))
            .expect("catalog imports");
        CatalogProvider::new(colleges)
    }

    pub(super) fn service() -> RecommendationService<CatalogProvider> {
        RecommendationService::new(Arc::new(provider()))
    }

    pub(super) fn service_with_completion(
        completion: ScriptedCompletion,
    ) -> RecommendationService<CatalogProvider> {
        RecommendationService::new(Arc::new(provider()))
            .with_completion(Arc::new(completion), Duration::from_millis(250))
    }

    pub(super) fn cs_profile() -> StudentProfile {
        StudentProfile {
            major: Some("Computer Science".to_string()),
            gpa: Some(GpaValue::Text("3.8".to_string())),
            state: Some("WA".to_string()),
            guest: false,
        }
    }

    pub(super) fn in_state_questionnaire() -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            in_state_out_of_state: Some("in_state".to_string()),
            cost_of_attendance: Some("20k_to_40k".to_string()),
            ..QuestionnaireAnswers::default()
        }
    }

    pub(super) fn weighted_request() -> RecommendationRequest {
        RecommendationRequest {
            profile: Some(cs_profile()),
            questionnaire: Some(in_state_questionnaire()),
            ..RecommendationRequest::default()
        }
    }

    pub(super) enum ScriptedCompletion {
        Responds(String),
        Fails,
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            match self {
                ScriptedCompletion::Responds(text) => Ok(text.clone()),
                ScriptedCompletion::Fails => {
                    Err(CompletionError::Transport("scripted failure".to_string()))
                }
            }
        }
    }
}

use common::*;
use transfer_match::workflows::recommendation::{
    state_matches, EmptyStateCode, RecommendationRequest, StudentProfile,
};

#[tokio::test]
async fn csv_catalog_feeds_the_full_weighted_pipeline() {
    let outcome = service().recommend(weighted_request()).await;

    assert!(outcome.empty_state.is_none());
    assert!(!outcome.results.is_empty());

    for pair in outcome.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for result in &outcome.results {
        assert!(state_matches(&result.college.location.state, "WA"));
        let breakdown = result.breakdown.expect("weighted results carry breakdowns");
        assert!(breakdown.final_score <= 100);
    }

    let top = &outcome.diagnostics.top[0];
    assert!(top.major_fit >= 90);
}

#[tokio::test]
async fn fraction_and_percent_rates_in_the_export_score_identically() {
    // wa-puget's admission rate is exported as 23 (percent); a fraction
    // export of the same school must produce the same prestige score.
    let fraction_csv = CATALOG_CSV.replace(",23,68,31,", ",0.23,0.68,0.31,");
    let fraction_provider = {
        let colleges = transfer_match::workflows::catalog::CatalogImporter::from_reader(
            std::io::Cursor::new(fraction_csv),
        )
        .expect("catalog imports");
        transfer_match::workflows::catalog::CatalogProvider::new(colleges)
    };
    let fraction_service = transfer_match::workflows::recommendation::RecommendationService::new(
        std::sync::Arc::new(fraction_provider),
    );

    let percent_outcome = service().recommend(weighted_request()).await;
    let fraction_outcome = fraction_service.recommend(weighted_request()).await;

    let prestige_of = |outcome: &transfer_match::workflows::recommendation::RecommendationOutcome| {
        outcome
            .diagnostics
            .top
            .iter()
            .find(|trace| trace.id.0 == "wa-puget")
            .expect("puget ranked")
            .prestige
    };
    assert_eq!(prestige_of(&percent_outcome), prestige_of(&fraction_outcome));
}

#[tokio::test]
async fn completion_outage_still_returns_a_full_list() {
    let outcome = service_with_completion(ScriptedCompletion::Fails)
        .recommend(weighted_request())
        .await;

    assert!(outcome.empty_state.is_none());
    assert!(!outcome.results.is_empty());
    assert!(outcome.diagnostics.ai_degraded);
}

#[tokio::test]
async fn completion_ratings_flow_into_final_scores() {
    let response = r#"[{"id":"wa-cascade","fit":95},{"id":"wa-puget","fit":5}]"#;
    let outcome = service_with_completion(ScriptedCompletion::Responds(response.to_string()))
        .recommend(weighted_request())
        .await;

    let trace_for = |id: &str| {
        outcome
            .diagnostics
            .top
            .iter()
            .find(|trace| trace.id.0 == id)
            .expect("trace present")
    };
    assert_eq!(trace_for("wa-cascade").ai_factor, 95);
    assert_eq!(trace_for("wa-puget").ai_factor, 5);
    // Unrated candidates default to the neutral factor.
    assert_eq!(trace_for("wa-harbor").ai_factor, 50);
}

#[tokio::test]
async fn search_mode_returns_neutral_name_matches() {
    let outcome = service()
        .recommend(RecommendationRequest::name_search("college"))
        .await;

    assert!(outcome.empty_state.is_none());
    assert!(!outcome.results.is_empty());
    for result in &outcome.results {
        assert_eq!(result.score, 50);
        assert!(result.breakdown.is_none());
    }
}

#[tokio::test]
async fn short_search_queries_return_the_query_empty_state() {
    let outcome = service()
        .recommend(RecommendationRequest::name_search("a"))
        .await;

    assert!(outcome.results.is_empty());
    assert_eq!(
        outcome.empty_state.expect("empty state present").code,
        EmptyStateCode::QueryNoResults
    );
}

#[tokio::test]
async fn guests_without_a_state_are_biased_to_the_default_state() {
    let request = RecommendationRequest {
        profile: Some(StudentProfile {
            guest: true,
            ..StudentProfile::default()
        }),
        ..RecommendationRequest::default()
    };
    let outcome = service().recommend(request).await;

    assert!(outcome.empty_state.is_none());
    assert!(outcome.diagnostics.used_fallback_state);
    for result in &outcome.results {
        assert!(state_matches(&result.college.location.state, "Washington"));
    }
}
