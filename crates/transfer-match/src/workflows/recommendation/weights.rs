//! Preference-weight derivation.
//!
//! A weight set spreads 100 points across the scoring dimensions based on
//! what the student told us. The builder never fails; with no inputs at all
//! it returns the transfer-student baseline.

use serde::{Deserialize, Serialize};

use super::domain::StudentProfile;
use super::questionnaire::{GeoPreference, ImportanceLevel, NormalizedQuestionnaire};

/// A query must be longer than this to pull weight toward the AI dimension.
const QUERY_WEIGHT_MIN_LEN: usize = 2;

/// Integer weights per scoring dimension. Invariant: the nine values sum to
/// exactly 100; the integer-scaling remainder goes to `ai_fit`, the final
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    pub academics: u8,
    pub cost: u8,
    pub location: u8,
    pub prestige: u8,
    pub size: u8,
    pub setting: u8,
    pub aid: u8,
    pub debt: u8,
    pub ai_fit: u8,
}

impl PreferenceWeights {
    /// Derive a weight set from whatever the caller supplied. Adjustments are
    /// order-dependent: budget first, then query presence, geography, major,
    /// ranking importance, and free-text engagement.
    pub fn build(
        profile: Option<&StudentProfile>,
        questionnaire: Option<&NormalizedQuestionnaire>,
        query: Option<&str>,
    ) -> Self {
        // Transfer-student baseline: academics and cost dominate.
        let mut academics: i32 = 45;
        let mut cost: i32 = 25;
        let mut location: i32 = 15;
        let prestige: i32 = 5;
        let size: i32 = 5;
        let setting: i32 = 5;
        let mut aid: i32 = 0;
        let mut debt: i32 = 0;
        let mut ai_fit: i32 = 0;

        if let Some(answers) = questionnaire {
            if answers.cost.is_tight() {
                cost += 20;
                aid += 10;
                debt += 5;
                academics -= 15;
            } else if answers.cost.is_medium() {
                cost += 5;
            }
        }

        let has_query = query
            .map(str::trim)
            .is_some_and(|text| text.chars().count() > QUERY_WEIGHT_MIN_LEN);
        if has_query {
            ai_fit = 20;
            academics = (academics - 10).max(0);
            cost = (cost - 10).max(0);
        }

        if let Some(answers) = questionnaire {
            match answers.geography {
                GeoPreference::InState => location += 20,
                GeoPreference::OutOfState => location += 5,
                GeoPreference::NoPreference => {}
            }
        }

        if profile.is_some_and(|profile| profile.declared_major().is_some()) {
            academics += 15;
        }

        if let Some(answers) = questionnaire {
            match answers.ranking_importance {
                ImportanceLevel::VeryImportant => academics += 20,
                ImportanceLevel::SomewhatImportant => academics += 10,
                ImportanceLevel::NotImportant | ImportanceLevel::NoPreference => {}
            }

            if answers.has_long_free_text() {
                academics += 5;
            }
        }

        Self::normalized([
            academics, cost, location, prestige, size, setting, aid, debt, ai_fit,
        ])
    }

    /// Scale raw adjustments to integers summing to exactly 100. Each of the
    /// first eight dimensions is floored; the remainder lands on the last so
    /// rounding drift cannot break the invariant. A non-positive total
    /// distributes the budget equally.
    fn normalized(raw: [i32; 9]) -> Self {
        let clamped = raw.map(|weight| i64::from(weight.max(0)));
        let total: i64 = clamped.iter().sum();

        let mut values = [0u8; 9];
        if total <= 0 {
            let share = (100 / values.len()) as u8;
            let mut acc = 0u32;
            for slot in values.iter_mut().take(8) {
                *slot = share;
                acc += u32::from(share);
            }
            values[8] = (100 - acc) as u8;
        } else {
            let mut acc = 0u32;
            for index in 0..8 {
                let scaled = (clamped[index] * 100 / total) as u8;
                values[index] = scaled;
                acc += u32::from(scaled);
            }
            values[8] = (100 - acc) as u8;
        }

        Self {
            academics: values[0],
            cost: values[1],
            location: values[2],
            prestige: values[3],
            size: values[4],
            setting: values[5],
            aid: values[6],
            debt: values[7],
            ai_fit: values[8],
        }
    }

    pub fn total(&self) -> u32 {
        u32::from(self.academics)
            + u32::from(self.cost)
            + u32::from(self.location)
            + u32::from(self.prestige)
            + u32::from(self.size)
            + u32::from(self.setting)
            + u32::from(self.aid)
            + u32::from(self.debt)
            + u32::from(self.ai_fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recommendation::questionnaire::QuestionnaireAnswers;

    fn answers(raw: QuestionnaireAnswers) -> NormalizedQuestionnaire {
        raw.normalize()
    }

    #[test]
    fn baseline_weights_sum_to_one_hundred() {
        let weights = PreferenceWeights::build(None, None, None);
        assert_eq!(weights.total(), 100);
        assert!(weights.academics > weights.cost);
        assert!(weights.cost > weights.prestige);
    }

    #[test]
    fn every_combination_sums_to_one_hundred() {
        let budgets = [None, Some("under_10k"), Some("20k_to_40k"), Some("over_40k")];
        let geographies = [None, Some("in_state"), Some("out_of_state")];
        let queries = [None, Some("machine learning programs")];
        let importances = [None, Some("very_important"), Some("somewhat_important")];

        for budget in budgets {
            for geography in geographies {
                for query in queries {
                    for importance in importances {
                        let raw = QuestionnaireAnswers {
                            cost_of_attendance: budget.map(str::to_string),
                            in_state_out_of_state: geography.map(str::to_string),
                            ranking_importance: importance.map(str::to_string),
                            ..QuestionnaireAnswers::default()
                        };
                        let normalized = answers(raw);
                        let weights =
                            PreferenceWeights::build(None, Some(&normalized), query);
                        assert_eq!(
                            weights.total(),
                            100,
                            "weights must sum to 100 for budget={budget:?} geography={geography:?} query={query:?} importance={importance:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tight_budget_shifts_weight_to_cost_and_aid() {
        let raw = QuestionnaireAnswers {
            cost_of_attendance: Some("under_10k".to_string()),
            ..QuestionnaireAnswers::default()
        };
        let normalized = answers(raw);
        let weights = PreferenceWeights::build(None, Some(&normalized), None);
        let baseline = PreferenceWeights::build(None, None, None);
        assert!(weights.cost > baseline.cost);
        assert!(weights.aid > 0);
        assert!(weights.debt > 0);
        assert!(weights.academics < baseline.academics);
    }

    #[test]
    fn query_presence_reserves_ai_weight() {
        let weights = PreferenceWeights::build(None, None, Some("data science"));
        assert!(weights.ai_fit >= 15);

        let short = PreferenceWeights::build(None, None, Some("ab"));
        assert_eq!(short.ai_fit, 0);
    }

    #[test]
    fn declared_major_and_importance_raise_academics() {
        let profile = StudentProfile {
            major: Some("Biology".to_string()),
            ..StudentProfile::default()
        };
        let raw = QuestionnaireAnswers {
            ranking_importance: Some("very_important".to_string()),
            ..QuestionnaireAnswers::default()
        };
        let normalized = answers(raw);
        let weights = PreferenceWeights::build(Some(&profile), Some(&normalized), None);
        let baseline = PreferenceWeights::build(None, None, None);
        assert!(weights.academics > baseline.academics);
        assert_eq!(weights.total(), 100);
    }
}
