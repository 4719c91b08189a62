use serde::{Deserialize, Serialize};

use super::scoring::ScoreBreakdown;

/// Identifier wrapper for catalog colleges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollegeId(pub String);

/// City/state pair as reported by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub city: String,
    pub state: String,
}

/// Enrollment size bucket reported by the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    Unknown,
}

impl SizeCategory {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "small" => Self::Small,
            "medium" | "mid" | "midsize" => Self::Medium,
            "large" => Self::Large,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Unknown => "unknown",
        }
    }
}

/// Campus setting bucket reported by the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingCategory {
    Urban,
    Suburban,
    Rural,
    Unknown,
}

impl SettingCategory {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "urban" | "city" => Self::Urban,
            "suburban" | "suburb" => Self::Suburban,
            "rural" | "town" => Self::Rural,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SettingCategory::Urban => "urban",
            SettingCategory::Suburban => "suburban",
            SettingCategory::Rural => "rural",
            SettingCategory::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Public,
    Private,
}

impl Ownership {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" | "private_nonprofit" | "private_for_profit" => Some(Self::Private),
            _ => None,
        }
    }
}

/// One institution under consideration for recommendation, as returned by the
/// external data provider. Admission/completion/Pell rates may arrive either
/// as 0–1 fractions or 0–100 percentages and are normalized at the point of
/// use, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    pub id: CollegeId,
    pub name: String,
    pub location: CampusLocation,
    pub tuition: Option<u32>,
    pub size: SizeCategory,
    pub setting: SettingCategory,
    pub admission_rate: Option<f64>,
    pub completion_rate: Option<f64>,
    pub pell_rate: Option<f64>,
    pub median_debt: Option<u32>,
    pub programs: Vec<String>,
    pub ownership: Option<Ownership>,
}

/// GPA as submitted by the mobile client, either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GpaValue {
    Number(f64),
    Text(String),
}

impl GpaValue {
    /// A usable GPA in [0, 4]; anything else reads as "no GPA provided".
    pub fn parsed(&self) -> Option<f64> {
        let value = match self {
            GpaValue::Number(value) => Some(*value),
            GpaValue::Text(raw) => raw.trim().parse::<f64>().ok(),
        }?;
        (0.0..=4.0).contains(&value).then_some(value)
    }
}

/// Student profile supplied by the caller; read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub gpa: Option<GpaValue>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub guest: bool,
}

impl StudentProfile {
    pub fn declared_major(&self) -> Option<&str> {
        self.major
            .as_deref()
            .map(str::trim)
            .filter(|major| !major.is_empty())
    }

    pub fn valid_gpa(&self) -> Option<f64> {
        self.gpa.as_ref().and_then(GpaValue::parsed)
    }

    pub fn home_state(&self) -> Option<&str> {
        self.state
            .as_deref()
            .map(str::trim)
            .filter(|state| !state.is_empty())
    }
}

/// Enumerated reasons for returning zero results, surfaced as data rather
/// than errors so the caller can render a specific explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyStateCode {
    QueryNoResults,
    InStateStateMissing,
    InStateNoMatches,
    UpstreamError,
    NetworkTimeout,
}

impl EmptyStateCode {
    pub const fn label(self) -> &'static str {
        match self {
            EmptyStateCode::QueryNoResults => "QUERY_NO_RESULTS",
            EmptyStateCode::InStateStateMissing => "IN_STATE_STATE_MISSING",
            EmptyStateCode::InStateNoMatches => "IN_STATE_NO_MATCHES",
            EmptyStateCode::UpstreamError => "UPSTREAM_ERROR",
            EmptyStateCode::NetworkTimeout => "NETWORK_TIMEOUT",
        }
    }
}

/// Structured explanation for an empty result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyState {
    pub code: EmptyStateCode,
    pub title: String,
    pub message: String,
}

impl EmptyState {
    pub fn new(
        code: EmptyStateCode,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            title: title.into(),
            message: message.into(),
        }
    }

    pub(crate) fn query_too_short() -> Self {
        Self::new(
            EmptyStateCode::QueryNoResults,
            "Keep typing",
            "Enter at least two characters to search for colleges.",
        )
    }

    pub(crate) fn search_miss(query: &str) -> Self {
        Self::new(
            EmptyStateCode::QueryNoResults,
            "No matches",
            format!("No colleges matched \"{query}\". Try a shorter name."),
        )
    }

    pub(crate) fn state_missing() -> Self {
        Self::new(
            EmptyStateCode::InStateStateMissing,
            "Add your state",
            "You asked for in-state colleges but your profile has no home state. Add one to see in-state matches.",
        )
    }

    pub(crate) fn no_in_state_matches(state: &str) -> Self {
        Self::new(
            EmptyStateCode::InStateNoMatches,
            "No in-state matches",
            format!("No colleges in {state} matched your preferences. Try widening your search."),
        )
    }

    pub(crate) fn upstream_error() -> Self {
        Self::new(
            EmptyStateCode::UpstreamError,
            "Something went wrong",
            "We couldn't reach the college directory. Please try again in a moment.",
        )
    }

    pub(crate) fn network_timeout() -> Self {
        Self::new(
            EmptyStateCode::NetworkTimeout,
            "Request timed out",
            "The college directory took too long to respond. Please try again.",
        )
    }
}

/// One ranked match returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub college: College,
    pub score: u8,
    pub score_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown_text: Option<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpa_accepts_number_and_string_forms() {
        assert_eq!(GpaValue::Number(3.8).parsed(), Some(3.8));
        assert_eq!(GpaValue::Text("3.8".to_string()).parsed(), Some(3.8));
        assert_eq!(GpaValue::Text(" 2.5 ".to_string()).parsed(), Some(2.5));
    }

    #[test]
    fn gpa_out_of_range_or_garbage_reads_as_missing() {
        assert_eq!(GpaValue::Number(4.5).parsed(), None);
        assert_eq!(GpaValue::Number(-0.1).parsed(), None);
        assert_eq!(GpaValue::Text("four".to_string()).parsed(), None);
        assert_eq!(GpaValue::Text("".to_string()).parsed(), None);
    }

    #[test]
    fn declared_major_ignores_blank_strings() {
        let profile = StudentProfile {
            major: Some("   ".to_string()),
            ..StudentProfile::default()
        };
        assert_eq!(profile.declared_major(), None);
    }

    #[test]
    fn empty_state_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&EmptyStateCode::InStateNoMatches).expect("serializes");
        assert_eq!(json, "\"IN_STATE_NO_MATCHES\"");
        assert_eq!(
            EmptyStateCode::InStateNoMatches.label(),
            "IN_STATE_NO_MATCHES"
        );
    }
}
