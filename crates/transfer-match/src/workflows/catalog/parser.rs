use std::io::Read;

use serde::Deserialize;

use super::CatalogImportError;
use crate::workflows::recommendation::domain::{
    CampusLocation, College, CollegeId, Ownership, SettingCategory, SizeCategory,
};

/// One row of the catalog export. Cells are lenient: blank numeric fields
/// deserialize to `None`, and category strings coerce through the same
/// parsers as the rest of the engine.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    tuition: Option<u32>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    setting: Option<String>,
    #[serde(default)]
    admission_rate: Option<f64>,
    #[serde(default)]
    completion_rate: Option<f64>,
    #[serde(default)]
    pell_rate: Option<f64>,
    #[serde(default)]
    median_debt: Option<u32>,
    #[serde(default)]
    programs: Option<String>,
    #[serde(default)]
    ownership: Option<String>,
}

impl CatalogRow {
    fn into_college(self) -> College {
        let programs = self
            .programs
            .as_deref()
            .map(split_programs)
            .unwrap_or_default();

        College {
            id: CollegeId(self.id.trim().to_string()),
            name: self.name.trim().to_string(),
            location: CampusLocation {
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
            },
            tuition: self.tuition,
            size: self
                .size
                .as_deref()
                .map(SizeCategory::parse)
                .unwrap_or(SizeCategory::Unknown),
            setting: self
                .setting
                .as_deref()
                .map(SettingCategory::parse)
                .unwrap_or(SettingCategory::Unknown),
            admission_rate: self.admission_rate,
            completion_rate: self.completion_rate,
            pell_rate: self.pell_rate,
            median_debt: self.median_debt,
            programs,
            ownership: self.ownership.as_deref().and_then(Ownership::parse),
        }
    }
}

fn split_programs(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|program| !program.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_catalog<R: Read>(reader: R) -> Result<Vec<College>, CatalogImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut colleges = Vec::new();

    for row in csv_reader.deserialize::<CatalogRow>() {
        let row = row?;
        if row.id.trim().is_empty() || row.name.trim().is_empty() {
            continue;
        }
        colleges.push(row.into_college());
    }

    Ok(colleges)
}
