//! Ranking-pipeline sub-scores.
//!
//! These feed the base score used to order candidates before AI blending.
//! They are distinct from the caller-visible `ScoreBreakdown` dimensions:
//! the blend weights here are fractions over four named fits, renormalized
//! to 1.0 after questionnaire shifts.

use serde::Serialize;

use super::domain::{College, StudentProfile};
use super::questionnaire::{
    ContinuePlan, CostBracket, ImportanceLevel, NormalizedQuestionnaire, SettingPreference,
    SizePreference,
};
use super::scoring::{self, normalize_rate, NEUTRAL_SCORE};

/// A GPA fit below this marks the school as an academic mismatch.
const LOW_GPA_FIT_THRESHOLD: u8 = 40;

/// Ceiling applied to the base score of an academically mismatched school so
/// prestige and preferences alone cannot carry it to the top.
const MISMATCH_BASE_CAP: u8 = 65;

/// Fractional weights over the four base-score fits. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlendWeights {
    pub gpa: f64,
    pub prestige: f64,
    pub major: f64,
    pub preference: f64,
}

impl BlendWeights {
    pub(crate) fn from_questionnaire(questionnaire: Option<&NormalizedQuestionnaire>) -> Self {
        let mut gpa = 0.35;
        let mut prestige = 0.25;
        let major = 0.2;
        let preference = 0.2;

        if let Some(answers) = questionnaire {
            match answers.ranking_importance {
                ImportanceLevel::VeryImportant => prestige += 0.15,
                ImportanceLevel::SomewhatImportant => prestige += 0.05,
                ImportanceLevel::NotImportant | ImportanceLevel::NoPreference => {}
            }
            if answers.continue_education == ContinuePlan::Yes {
                gpa += 0.10;
            }
        }

        let total = gpa + prestige + major + preference;
        Self {
            gpa: gpa / total,
            prestige: prestige / total,
            major: major / total,
            preference: preference / total,
        }
    }
}

/// Expected GPA implied by selectivity; more selective schools expect more.
/// With the rate unknown the band sits at a generic 3.0.
fn implied_gpa_band(admission_rate: Option<f64>) -> f64 {
    match admission_rate.and_then(normalize_rate) {
        Some(rate) => 2.4 + (1.0 - rate) * 1.5,
        None => 3.0,
    }
}

/// Position the student's GPA against the school's implied band. No GPA reads
/// as neutral rather than as a mismatch.
pub(crate) fn gpa_fit_score(gpa: Option<f64>, college: &College) -> u8 {
    let Some(gpa) = gpa else {
        return NEUTRAL_SCORE;
    };
    let margin = gpa - implied_gpa_band(college.admission_rate);
    (70.0 + margin * 60.0).round().clamp(0.0, 100.0) as u8
}

pub(crate) fn major_fit_score(college: &College, major: Option<&str>) -> u8 {
    match major {
        Some(major) if scoring::program_matches(college, major) => 90,
        Some(_) => 20,
        None => NEUTRAL_SCORE,
    }
}

fn bracket_cost_fit(bracket: CostBracket, tuition: u32) -> u8 {
    let Some((_, upper)) = bracket.bounds() else {
        return NEUTRAL_SCORE;
    };
    if tuition <= upper {
        return 90;
    }
    let over_thousands = i64::from((tuition - upper) / 1_000);
    (90 - over_thousands * 3).clamp(20, 90) as u8
}

/// Average of the cost/debt/aid/size/setting sub-fits. Cost is bracket-aware
/// when the student named a budget; size and setting punish explicit
/// mismatches instead of staying neutral.
pub(crate) fn preference_fit_score(
    college: &College,
    questionnaire: Option<&NormalizedQuestionnaire>,
) -> u8 {
    let cost = match (questionnaire.map(|answers| answers.cost), college.tuition) {
        (Some(bracket), Some(tuition)) if bracket != CostBracket::NoPreference => {
            bracket_cost_fit(bracket, tuition)
        }
        _ => scoring::cost_score(college),
    };

    let debt = scoring::debt_score(college);
    let aid = scoring::aid_score(college);

    let size = match questionnaire.map(|answers| answers.size) {
        Some(preference) if preference != SizePreference::NoPreference => {
            if preference.matches(college.size) {
                100
            } else {
                30
            }
        }
        _ => NEUTRAL_SCORE,
    };

    let setting = match questionnaire.map(|answers| answers.setting) {
        Some(preference) if preference != SettingPreference::NoPreference => {
            if preference.matches(college.setting) {
                100
            } else {
                30
            }
        }
        _ => NEUTRAL_SCORE,
    };

    let total =
        u32::from(cost) + u32::from(debt) + u32::from(aid) + u32::from(size) + u32::from(setting);
    (f64::from(total) / 5.0).round() as u8
}

/// Named sub-scores and the blended base used to rank candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseScores {
    pub gpa_fit: u8,
    pub prestige: u8,
    pub major_fit: u8,
    pub preference_fit: u8,
    pub base: u8,
}

pub(crate) fn base_scores(
    college: &College,
    profile: Option<&StudentProfile>,
    questionnaire: Option<&NormalizedQuestionnaire>,
    weights: &BlendWeights,
) -> BaseScores {
    let gpa = profile.and_then(StudentProfile::valid_gpa);
    let gpa_fit = gpa_fit_score(gpa, college);
    let prestige = scoring::prestige_score(college);
    let major_fit = major_fit_score(college, profile.and_then(StudentProfile::declared_major));
    let preference_fit = preference_fit_score(college, questionnaire);

    let blended = f64::from(gpa_fit) * weights.gpa
        + f64::from(prestige) * weights.prestige
        + f64::from(major_fit) * weights.major
        + f64::from(preference_fit) * weights.preference;
    let mut base = blended.round().clamp(0.0, 100.0) as u8;

    if gpa.is_some() && gpa_fit < LOW_GPA_FIT_THRESHOLD {
        base = base.min(MISMATCH_BASE_CAP);
    }

    BaseScores {
        gpa_fit,
        prestige,
        major_fit,
        preference_fit,
        base,
    }
}
