use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::workflows::recommendation::completion::{CompletionError, CompletionProvider};
use crate::workflows::recommendation::domain::{
    CampusLocation, College, CollegeId, GpaValue, Ownership, SettingCategory, SizeCategory,
    StudentProfile,
};
use crate::workflows::recommendation::geo::state_matches;
use crate::workflows::recommendation::provider::{
    CandidateBatch, CandidateFilter, CandidateProvider, CandidateSource, ProviderError,
};
use crate::workflows::recommendation::questionnaire::QuestionnaireAnswers;
use crate::workflows::recommendation::service::{RecommendationRequest, RecommendationService};

pub(super) fn college(
    id: &str,
    name: &str,
    state: &str,
    programs: &[&str],
    admission_rate: Option<f64>,
    tuition: Option<u32>,
    ownership: Option<Ownership>,
) -> College {
    College {
        id: CollegeId(id.to_string()),
        name: name.to_string(),
        location: CampusLocation {
            city: "Somewhere".to_string(),
            state: state.to_string(),
        },
        tuition,
        size: SizeCategory::Medium,
        setting: SettingCategory::Suburban,
        admission_rate,
        completion_rate: Some(0.6),
        pell_rate: Some(0.3),
        median_debt: Some(18_000),
        programs: programs.iter().map(|p| p.to_string()).collect(),
        ownership,
    }
}

pub(super) fn catalog() -> Vec<College> {
    vec![
        college(
            "wa-cascade",
            "Cascade State University",
            "WA",
            &["Computer Science", "Mechanical Engineering", "Biology"],
            Some(0.52),
            Some(11_839),
            Some(Ownership::Public),
        ),
        college(
            "wa-puget",
            "Puget Sound Institute",
            "WA",
            &["Computer Science", "Philosophy"],
            Some(0.23),
            Some(52_000),
            Some(Ownership::Private),
        ),
        college(
            "wa-harbor",
            "Harbor Technical College",
            "Washington",
            &["Nursing", "Welding Technology"],
            None,
            Some(6_500),
            Some(Ownership::Public),
        ),
        college(
            "or-willamette",
            "Willamette Valley College",
            "OR",
            &["Agriculture", "Biology"],
            Some(0.78),
            Some(9_800),
            Some(Ownership::Public),
        ),
        college(
            "ca-bayside",
            "Bayside University",
            "CA",
            &["Computer Science", "Film Studies"],
            Some(0.12),
            Some(58_000),
            Some(Ownership::Private),
        ),
    ]
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

pub(super) fn weighted_request(
    profile: StudentProfile,
    questionnaire: QuestionnaireAnswers,
) -> RecommendationRequest {
    RecommendationRequest {
        profile: Some(profile),
        questionnaire: Some(questionnaire),
        ..RecommendationRequest::default()
    }
}

pub(super) enum ProviderMode {
    Normal,
    EmptyWhenScoped,
    FailUnavailable,
    FailTimeout,
}

/// Scriptable in-memory stand-in for the college-data collaborator.
pub(super) struct MemoryProvider {
    colleges: Vec<College>,
    mode: ProviderMode,
}

impl MemoryProvider {
    pub(super) fn new(colleges: Vec<College>) -> Self {
        Self {
            colleges,
            mode: ProviderMode::Normal,
        }
    }

    pub(super) fn with_mode(colleges: Vec<College>, mode: ProviderMode) -> Self {
        Self { colleges, mode }
    }
}

#[async_trait]
impl CandidateProvider for MemoryProvider {
    async fn fetch(&self, filter: &CandidateFilter) -> Result<CandidateBatch, ProviderError> {
        match self.mode {
            ProviderMode::FailUnavailable => {
                return Err(ProviderError::Unavailable("directory offline".to_string()))
            }
            ProviderMode::FailTimeout => return Err(ProviderError::Timeout),
            ProviderMode::EmptyWhenScoped if filter.state.is_some() => {
                return Ok(CandidateBatch {
                    colleges: Vec::new(),
                    source: CandidateSource::Cache,
                })
            }
            _ => {}
        }

        let colleges = match filter.state.as_deref() {
            Some(state) => self
                .colleges
                .iter()
                .filter(|college| state_matches(&college.location.state, state))
                .cloned()
                .collect(),
            None => self.colleges.clone(),
        };
        Ok(CandidateBatch {
            colleges,
            source: CandidateSource::Cache,
        })
    }

    async fn search_by_name(&self, text: &str) -> Result<CandidateBatch, ProviderError> {
        if matches!(self.mode, ProviderMode::FailUnavailable) {
            return Err(ProviderError::Unavailable("directory offline".to_string()));
        }
        let needle = text.trim().to_ascii_lowercase();
        let colleges = self
            .colleges
            .iter()
            .filter(|college| college.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(CandidateBatch {
            colleges,
            source: CandidateSource::Cache,
        })
    }
}

/// Scriptable stand-in for the completion collaborator.
pub(super) enum ScriptedCompletion {
    Responds(String),
    Fails,
    Hangs,
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        match self {
            ScriptedCompletion::Responds(text) => Ok(text.clone()),
            ScriptedCompletion::Fails => {
                Err(CompletionError::Transport("scripted failure".to_string()))
            }
            ScriptedCompletion::Hangs => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(String::new())
            }
        }
    }
}

pub(super) fn offline_service(colleges: Vec<College>) -> RecommendationService<MemoryProvider> {
    RecommendationService::new(Arc::new(MemoryProvider::new(colleges)))
}

pub(super) fn service_with_completion(
    colleges: Vec<College>,
    completion: ScriptedCompletion,
) -> RecommendationService<MemoryProvider> {
    RecommendationService::new(Arc::new(MemoryProvider::new(colleges)))
        .with_completion(Arc::new(completion), Duration::from_millis(200))
}
