//! Deterministic per-college scoring.
//!
//! Every dimension is a pure function of the candidate and the request
//! inputs; missing data degrades to the neutral midpoint instead of erroring.
//! Admission rate influences prestige only, never academics, so selectivity
//! is not double-counted.

use serde::{Deserialize, Serialize};

use super::domain::{College, Ownership, StudentProfile};
use super::geo::state_matches;
use super::questionnaire::{GeoPreference, NormalizedQuestionnaire};
use super::weights::PreferenceWeights;

/// Neutral midpoint used whenever a dimension has no usable signal.
pub(crate) const NEUTRAL_SCORE: u8 = 50;

/// Tuition above this no longer lowers the cost score further.
const TUITION_SCALE_CAP: u32 = 60_000;

/// Median debt above this no longer lowers the debt score further.
const DEBT_SCALE_CAP: u32 = 50_000;

/// Normalize a rate that may arrive as a 0–1 fraction or a 0–100 percentage
/// into a fraction. Negative, non-finite, or >100% values are unusable.
pub(crate) fn normalize_rate(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    (fraction <= 1.0).then_some(fraction)
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Per-dimension scores plus the weighted aggregate, all integers in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub academics: u8,
    pub cost: u8,
    pub aid: u8,
    pub debt: u8,
    pub location: u8,
    pub size: u8,
    pub setting: u8,
    pub prestige: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_fit: Option<u8>,
    pub final_score: u8,
}

/// Case-insensitive substring match of the major against any program name.
pub(crate) fn program_matches(college: &College, major: &str) -> bool {
    let needle = major.trim().to_ascii_lowercase();
    !needle.is_empty()
        && college
            .programs
            .iter()
            .any(|program| program.to_ascii_lowercase().contains(&needle))
}

pub(crate) fn academics_score(college: &College, profile: Option<&StudentProfile>) -> u8 {
    let mut score: f64 = 50.0;

    if let Some(major) = profile.and_then(StudentProfile::declared_major) {
        if program_matches(college, major) {
            score += 30.0;
        } else {
            // Heavy penalty: a transfer target without the student's program
            // is a poor fit no matter how strong it is otherwise.
            score -= 40.0;
        }
    }

    if let Some(gpa) = profile.and_then(StudentProfile::valid_gpa) {
        let gpa_norm = gpa.clamp(0.0, 4.0) / 4.0;
        score += (gpa_norm * 20.0).round();
    }

    // Public school in the student's own state: articulation agreements make
    // credits far more likely to carry over.
    if college.ownership == Some(Ownership::Public) {
        if let Some(state) = profile.and_then(StudentProfile::home_state) {
            if state_matches(&college.location.state, state) {
                score += 15.0;
            }
        }
    }

    if let Some(rate) = college.completion_rate.and_then(normalize_rate) {
        score += (rate * 20.0).round();
    }

    clamp_score(score)
}

pub(crate) fn cost_score(college: &College) -> u8 {
    match college.tuition {
        Some(tuition) => {
            let capped = f64::from(tuition.min(TUITION_SCALE_CAP));
            clamp_score(100.0 - (capped / f64::from(TUITION_SCALE_CAP) * 100.0).round())
        }
        None => NEUTRAL_SCORE,
    }
}

pub(crate) fn aid_score(college: &College) -> u8 {
    match college.pell_rate.and_then(normalize_rate) {
        Some(rate) => clamp_score(rate * 100.0),
        None => NEUTRAL_SCORE,
    }
}

pub(crate) fn debt_score(college: &College) -> u8 {
    match college.median_debt {
        Some(debt) => {
            let capped = f64::from(debt.min(DEBT_SCALE_CAP));
            clamp_score(100.0 - (capped / f64::from(DEBT_SCALE_CAP) * 100.0).round())
        }
        None => NEUTRAL_SCORE,
    }
}

pub(crate) fn location_score(
    college: &College,
    profile: Option<&StudentProfile>,
    questionnaire: Option<&NormalizedQuestionnaire>,
) -> u8 {
    let mut score = f64::from(NEUTRAL_SCORE);
    let geography = questionnaire
        .map(|answers| answers.geography)
        .unwrap_or(GeoPreference::NoPreference);
    let home_state = profile.and_then(StudentProfile::home_state);

    if let Some(home) = home_state {
        let same_state = state_matches(&college.location.state, home);
        match geography {
            GeoPreference::InState if same_state => score += 25.0,
            GeoPreference::OutOfState if !same_state => score += 25.0,
            _ => {}
        }
    }

    clamp_score(score)
}

pub(crate) fn size_score(college: &College, questionnaire: Option<&NormalizedQuestionnaire>) -> u8 {
    match questionnaire {
        Some(answers) if answers.size.matches(college.size) => 100,
        _ => NEUTRAL_SCORE,
    }
}

pub(crate) fn setting_score(
    college: &College,
    questionnaire: Option<&NormalizedQuestionnaire>,
) -> u8 {
    match questionnaire {
        Some(answers) if answers.setting.matches(college.setting) => 100,
        _ => NEUTRAL_SCORE,
    }
}

/// Lower admission rate reads as higher selectivity, so prestige is the
/// inverse of the normalized rate.
pub(crate) fn prestige_score(college: &College) -> u8 {
    match college.admission_rate.and_then(normalize_rate) {
        Some(rate) => clamp_score((1.0 - rate) * 100.0),
        None => NEUTRAL_SCORE,
    }
}

/// Compute the full deterministic breakdown for one candidate. An AI score is
/// never fetched here; the caller passes one through when it has it, and a
/// nonzero `ai_fit` weight with no score defaults to the neutral midpoint so
/// the dimension is not silently zeroed out.
pub fn score_college(
    college: &College,
    weights: &PreferenceWeights,
    profile: Option<&StudentProfile>,
    questionnaire: Option<&NormalizedQuestionnaire>,
    ai_fit: Option<u8>,
) -> ScoreBreakdown {
    let academics = academics_score(college, profile);
    let cost = cost_score(college);
    let aid = aid_score(college);
    let debt = debt_score(college);
    let location = location_score(college, profile, questionnaire);
    let size = size_score(college, questionnaire);
    let setting = setting_score(college, questionnaire);
    let prestige = prestige_score(college);

    let ai_fit = match ai_fit {
        Some(score) => Some(score.min(100)),
        None if weights.ai_fit > 0 => Some(NEUTRAL_SCORE),
        None => None,
    };

    let weighted_total = f64::from(academics) * f64::from(weights.academics)
        + f64::from(cost) * f64::from(weights.cost)
        + f64::from(location) * f64::from(weights.location)
        + f64::from(prestige) * f64::from(weights.prestige)
        + f64::from(size) * f64::from(weights.size)
        + f64::from(setting) * f64::from(weights.setting)
        + f64::from(aid) * f64::from(weights.aid)
        + f64::from(debt) * f64::from(weights.debt)
        + f64::from(ai_fit.unwrap_or(0)) * f64::from(weights.ai_fit);

    let final_score = clamp_score(weighted_total / 100.0);

    ScoreBreakdown {
        academics,
        cost,
        aid,
        debt,
        location,
        size,
        setting,
        prestige,
        ai_fit,
        final_score,
    }
}
