use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use transfer_match::workflows::recommendation::{
    CampusLocation, College, CollegeId, Ownership, SettingCategory, SizeCategory,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct SampleCollege {
    id: &'static str,
    name: &'static str,
    city: &'static str,
    state: &'static str,
    tuition: Option<u32>,
    size: SizeCategory,
    setting: SettingCategory,
    admission_rate: Option<f64>,
    completion_rate: Option<f64>,
    pell_rate: Option<f64>,
    median_debt: Option<u32>,
    programs: &'static [&'static str],
    ownership: Option<Ownership>,
}

const SAMPLE_CATALOG: &[SampleCollege] = &[
    SampleCollege {
        id: "wa-cascade",
        name: "Cascade State University",
        city: "Seattle",
        state: "WA",
        tuition: Some(11_839),
        size: SizeCategory::Large,
        setting: SettingCategory::Urban,
        admission_rate: Some(0.52),
        completion_rate: Some(0.84),
        pell_rate: Some(0.24),
        median_debt: Some(16_500),
        programs: &[
            "Computer Science",
            "Mechanical Engineering",
            "Biology",
            "Business Administration",
        ],
        ownership: Some(Ownership::Public),
    },
    SampleCollege {
        id: "wa-puget",
        name: "Puget Sound Institute",
        city: "Tacoma",
        state: "WA",
        tuition: Some(52_000),
        size: SizeCategory::Small,
        setting: SettingCategory::Suburban,
        admission_rate: Some(23.0),
        completion_rate: Some(68.0),
        pell_rate: Some(31.0),
        median_debt: Some(27_000),
        programs: &["Computer Science", "Philosophy", "Economics"],
        ownership: Some(Ownership::Private),
    },
    SampleCollege {
        id: "wa-harbor",
        name: "Harbor Technical College",
        city: "Aberdeen",
        state: "Washington",
        tuition: Some(6_500),
        size: SizeCategory::Medium,
        setting: SettingCategory::Rural,
        admission_rate: None,
        completion_rate: Some(0.61),
        pell_rate: Some(0.44),
        median_debt: Some(12_000),
        programs: &["Nursing", "Welding Technology", "Marine Systems"],
        ownership: Some(Ownership::Public),
    },
    SampleCollege {
        id: "wa-inland",
        name: "Inland Empire University",
        city: "Spokane",
        state: "WA",
        tuition: Some(24_500),
        size: SizeCategory::Medium,
        setting: SettingCategory::Urban,
        admission_rate: Some(0.64),
        completion_rate: Some(0.72),
        pell_rate: Some(0.33),
        median_debt: Some(21_000),
        programs: &["Computer Science", "Education", "Nursing"],
        ownership: Some(Ownership::Private),
    },
    SampleCollege {
        id: "or-willamette",
        name: "Willamette Valley College",
        city: "Salem",
        state: "OR",
        tuition: Some(9_800),
        size: SizeCategory::Medium,
        setting: SettingCategory::Rural,
        admission_rate: Some(0.78),
        completion_rate: Some(0.55),
        pell_rate: Some(0.38),
        median_debt: Some(15_000),
        programs: &["Agriculture", "Biology", "Environmental Science"],
        ownership: Some(Ownership::Public),
    },
    SampleCollege {
        id: "ca-bayside",
        name: "Bayside University",
        city: "Oakland",
        state: "CA",
        tuition: Some(58_000),
        size: SizeCategory::Large,
        setting: SettingCategory::Urban,
        admission_rate: Some(0.12),
        completion_rate: Some(0.91),
        pell_rate: Some(0.18),
        median_debt: Some(31_000),
        programs: &["Computer Science", "Film Studies", "Architecture"],
        ownership: Some(Ownership::Private),
    },
    SampleCollege {
        id: "id-sawtooth",
        name: "Sawtooth College",
        city: "Boise",
        state: "ID",
        tuition: Some(8_900),
        size: SizeCategory::Small,
        setting: SettingCategory::Rural,
        admission_rate: Some(0.85),
        completion_rate: Some(0.49),
        pell_rate: Some(0.41),
        median_debt: Some(13_500),
        programs: &["Forestry", "Business Administration"],
        ownership: Some(Ownership::Public),
    },
];

/// Built-in catalog used by the demo command and as the default server
/// backing when no CSV export is configured.
pub(crate) fn sample_catalog() -> Vec<College> {
    SAMPLE_CATALOG
        .iter()
        .map(|sample| College {
            id: CollegeId(sample.id.to_string()),
            name: sample.name.to_string(),
            location: CampusLocation {
                city: sample.city.to_string(),
                state: sample.state.to_string(),
            },
            tuition: sample.tuition,
            size: sample.size,
            setting: sample.setting,
            admission_rate: sample.admission_rate,
            completion_rate: sample.completion_rate,
            pell_rate: sample.pell_rate,
            median_debt: sample.median_debt,
            programs: sample.programs.iter().map(|p| p.to_string()).collect(),
            ownership: sample.ownership,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_covers_multiple_states() {
        let catalog = sample_catalog();
        assert!(catalog.len() >= 5);
        assert!(catalog
            .iter()
            .any(|college| college.location.state == "WA"));
        assert!(catalog
            .iter()
            .any(|college| college.location.state == "OR"));
    }
}
