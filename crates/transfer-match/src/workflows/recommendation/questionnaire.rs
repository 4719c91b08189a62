//! Questionnaire capture and normalization.
//!
//! The mobile client submits loosely formatted string answers. Everything is
//! coerced into a fixed enum space before scoring; unrecognized values land
//! on each field's no-preference sentinel, and keys this version does not
//! understand are preserved in an explicit `extra` bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{SettingCategory, SizeCategory};

/// Raw answers exactly as submitted by the caller; read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    #[serde(default)]
    pub cost_of_attendance: Option<String>,
    #[serde(default)]
    pub class_size: Option<String>,
    #[serde(default)]
    pub campus_setting: Option<String>,
    #[serde(default)]
    pub in_state_out_of_state: Option<String>,
    #[serde(default)]
    pub housing: Option<String>,
    #[serde(default)]
    pub transportation: Option<String>,
    #[serde(default)]
    pub ranking_importance: Option<String>,
    #[serde(default)]
    pub continue_education: Option<String>,
    #[serde(default)]
    pub companies_nearby: Option<String>,
    #[serde(default)]
    pub extracurriculars: Option<String>,
    /// Forward-compatibility bucket for keys this version does not model.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl QuestionnaireAnswers {
    pub fn normalize(&self) -> NormalizedQuestionnaire {
        NormalizedQuestionnaire {
            cost: CostBracket::parse(self.cost_of_attendance.as_deref()),
            size: SizePreference::parse(self.class_size.as_deref()),
            setting: SettingPreference::parse(self.campus_setting.as_deref()),
            geography: GeoPreference::parse(self.in_state_out_of_state.as_deref()),
            housing: HousingPreference::parse(self.housing.as_deref()),
            transport: TransportMode::parse(self.transportation.as_deref()),
            ranking_importance: ImportanceLevel::parse(self.ranking_importance.as_deref()),
            continue_education: ContinuePlan::parse(self.continue_education.as_deref()),
            companies_nearby: free_text(self.companies_nearby.as_deref()),
            extracurriculars: free_text(self.extracurriculars.as_deref()),
        }
    }
}

/// Lowercase and collapse `-`/`_`/`/` and runs of whitespace so that
/// "20k_to_40k", "20K-TO-40K", and "20k to 40k" all coerce identically.
fn canon(raw: &str) -> String {
    let replaced: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| match ch {
            '-' | '_' | '/' => ' ',
            ch => ch,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn free_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Annual cost-of-attendance bracket the student says they can afford.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBracket {
    Under10k,
    From10kTo20k,
    From20kTo40k,
    Over40k,
    NoPreference,
}

impl CostBracket {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "under 10k" | "below 10k" | "less than 10k" => Self::Under10k,
            "10k to 20k" | "10k 20k" => Self::From10kTo20k,
            "20k to 40k" | "20k 40k" => Self::From20kTo40k,
            "over 40k" | "above 40k" | "40k plus" | "40k or more" => Self::Over40k,
            _ => Self::NoPreference,
        }
    }

    /// Dollar bounds for the bracket; `None` for no-preference.
    pub(crate) fn bounds(self) -> Option<(u32, u32)> {
        match self {
            CostBracket::Under10k => Some((0, 10_000)),
            CostBracket::From10kTo20k => Some((10_000, 20_000)),
            CostBracket::From20kTo40k => Some((20_000, 40_000)),
            CostBracket::Over40k => Some((40_000, u32::MAX)),
            CostBracket::NoPreference => None,
        }
    }

    /// Brackets that read as a tight budget for weighting purposes.
    pub(crate) fn is_tight(self) -> bool {
        matches!(self, CostBracket::Under10k | CostBracket::From10kTo20k)
    }

    pub(crate) fn is_medium(self) -> bool {
        matches!(self, CostBracket::From20kTo40k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePreference {
    Small,
    Medium,
    Large,
    NoPreference,
}

impl SizePreference {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "small" => Self::Small,
            "medium" | "mid" | "midsize" => Self::Medium,
            "large" => Self::Large,
            _ => Self::NoPreference,
        }
    }

    pub(crate) fn matches(self, category: SizeCategory) -> bool {
        matches!(
            (self, category),
            (SizePreference::Small, SizeCategory::Small)
                | (SizePreference::Medium, SizeCategory::Medium)
                | (SizePreference::Large, SizeCategory::Large)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingPreference {
    Urban,
    Suburban,
    Rural,
    NoPreference,
}

impl SettingPreference {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "urban" | "city" => Self::Urban,
            "suburban" | "suburb" => Self::Suburban,
            "rural" | "town" => Self::Rural,
            _ => Self::NoPreference,
        }
    }

    pub(crate) fn matches(self, category: SettingCategory) -> bool {
        matches!(
            (self, category),
            (SettingPreference::Urban, SettingCategory::Urban)
                | (SettingPreference::Suburban, SettingCategory::Suburban)
                | (SettingPreference::Rural, SettingCategory::Rural)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoPreference {
    InState,
    OutOfState,
    NoPreference,
}

impl GeoPreference {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "in state" | "instate" | "stay in state" => Self::InState,
            "out of state" | "outofstate" | "leave state" => Self::OutOfState,
            _ => Self::NoPreference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingPreference {
    OnCampus,
    OffCampus,
    WithFamily,
    NoPreference,
}

impl HousingPreference {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "on campus" | "oncampus" | "dorm" | "dorms" => Self::OnCampus,
            "off campus" | "offcampus" | "apartment" => Self::OffCampus,
            "with family" | "at home" | "home" => Self::WithFamily,
            _ => Self::NoPreference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    PublicTransit,
    BikeOrWalk,
    NoPreference,
}

impl TransportMode {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "car" | "drive" | "driving" => Self::Car,
            "public transit" | "bus" | "train" | "transit" => Self::PublicTransit,
            "bike" | "walk" | "bike or walk" | "walking" => Self::BikeOrWalk,
            _ => Self::NoPreference,
        }
    }
}

/// How much school rankings matter to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceLevel {
    VeryImportant,
    SomewhatImportant,
    NotImportant,
    NoPreference,
}

impl ImportanceLevel {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoPreference;
        };
        match canon(raw).as_str() {
            "very important" | "very" => Self::VeryImportant,
            "somewhat important" | "somewhat" => Self::SomewhatImportant,
            "not important" | "not at all" => Self::NotImportant,
            _ => Self::NoPreference,
        }
    }
}

/// Whether the student plans further education after transferring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuePlan {
    Yes,
    No,
    Undecided,
}

impl ContinuePlan {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Undecided;
        };
        match canon(raw).as_str() {
            "yes" | "true" | "planning to" | "grad school" => Self::Yes,
            "no" | "false" => Self::No,
            _ => Self::Undecided,
        }
    }
}

/// Canonical questionnaire view consumed by the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedQuestionnaire {
    pub cost: CostBracket,
    pub size: SizePreference,
    pub setting: SettingPreference,
    pub geography: GeoPreference,
    pub housing: HousingPreference,
    pub transport: TransportMode,
    pub ranking_importance: ImportanceLevel,
    pub continue_education: ContinuePlan,
    pub companies_nearby: Option<String>,
    pub extracurriculars: Option<String>,
}

impl Default for NormalizedQuestionnaire {
    fn default() -> Self {
        Self {
            cost: CostBracket::NoPreference,
            size: SizePreference::NoPreference,
            setting: SettingPreference::NoPreference,
            geography: GeoPreference::NoPreference,
            housing: HousingPreference::NoPreference,
            transport: TransportMode::NoPreference,
            ranking_importance: ImportanceLevel::NoPreference,
            continue_education: ContinuePlan::Undecided,
            companies_nearby: None,
            extracurriculars: None,
        }
    }
}

impl NormalizedQuestionnaire {
    /// An unusually long free-text answer signals engagement with the form.
    pub(crate) fn has_long_free_text(&self) -> bool {
        [&self.companies_nearby, &self.extracurriculars]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|text| text.chars().count() > 80))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_and_case_insensitive_coercion() {
        assert_eq!(
            CostBracket::parse(Some("20K_TO_40K")),
            CostBracket::From20kTo40k
        );
        assert_eq!(
            CostBracket::parse(Some("20k-to-40k")),
            CostBracket::From20kTo40k
        );
        assert_eq!(
            GeoPreference::parse(Some("In_State")),
            GeoPreference::InState
        );
        assert_eq!(
            ImportanceLevel::parse(Some("VERY IMPORTANT")),
            ImportanceLevel::VeryImportant
        );
    }

    #[test]
    fn unrecognized_values_canonicalize_to_no_preference() {
        assert_eq!(CostBracket::parse(Some("whatever")), CostBracket::NoPreference);
        assert_eq!(SizePreference::parse(Some("")), SizePreference::NoPreference);
        assert_eq!(
            GeoPreference::parse(Some("abroad")),
            GeoPreference::NoPreference
        );
        assert_eq!(ContinuePlan::parse(Some("maybe?")), ContinuePlan::Undecided);
    }

    #[test]
    fn unknown_keys_land_in_extra_bucket() {
        let raw = r#"{"cost_of_attendance":"under_10k","favorite_color":"green"}"#;
        let answers: QuestionnaireAnswers = serde_json::from_str(raw).expect("deserializes");
        assert!(answers.extra.contains_key("favorite_color"));
        assert_eq!(answers.normalize().cost, CostBracket::Under10k);
    }

    #[test]
    fn long_free_text_detection_counts_characters() {
        let mut answers = QuestionnaireAnswers::default();
        answers.extracurriculars = Some("a".repeat(81));
        assert!(answers.normalize().has_long_free_text());

        answers.extracurriculars = Some("a".repeat(80));
        assert!(!answers.normalize().has_long_free_text());
    }
}
