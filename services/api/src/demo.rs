use crate::infra::sample_catalog;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use transfer_match::error::AppError;
use transfer_match::workflows::catalog::CatalogProvider;
use transfer_match::workflows::recommendation::{
    GpaValue, QuestionnaireAnswers, RecommendationRequest, RecommendationService, StudentProfile,
};

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Free-text search query (boosts matching names and programs)
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Declared major, e.g. "Computer Science"
    #[arg(long)]
    pub(crate) major: Option<String>,
    /// GPA on a 4.0 scale
    #[arg(long)]
    pub(crate) gpa: Option<String>,
    /// Home state, abbreviation or full name
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Restrict results to the home state
    #[arg(long)]
    pub(crate) in_state: bool,
    /// Cost-of-attendance bracket, e.g. "20k_to_40k"
    #[arg(long)]
    pub(crate) budget: Option<String>,
    /// Maximum number of results to print
    #[arg(long, default_value_t = 5)]
    pub(crate) max_results: usize,
    /// Optional catalog CSV to rank against instead of the bundled sample
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

/// Run the full weighted pipeline offline and print the ranking. No AI
/// augmentation here: factors stay neutral, which keeps the command
/// deterministic for demos.
pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let provider = match &args.catalog_csv {
        Some(path) => CatalogProvider::from_csv_path(path)?,
        None => CatalogProvider::new(sample_catalog()),
    };
    let service = RecommendationService::new(Arc::new(provider));

    let profile = StudentProfile {
        major: args.major.clone(),
        gpa: args.gpa.clone().map(GpaValue::Text),
        state: args.state.clone(),
        guest: false,
    };
    let questionnaire = QuestionnaireAnswers {
        in_state_out_of_state: args.in_state.then(|| "in_state".to_string()),
        cost_of_attendance: args.budget.clone(),
        ..QuestionnaireAnswers::default()
    };

    let request = RecommendationRequest {
        query: args.query.clone(),
        profile: Some(profile),
        questionnaire: Some(questionnaire),
        max_results: args.max_results,
        weighted: true,
    };

    let outcome = service.recommend(request).await;

    if let Some(empty_state) = &outcome.empty_state {
        println!("{} — {}", empty_state.title, empty_state.message);
        println!("({})", empty_state.code.label());
        return Ok(());
    }

    println!(
        "Ranked {} of {} candidates (state: {}):",
        outcome.results.len(),
        outcome.diagnostics.scored,
        outcome
            .diagnostics
            .resolved_state
            .as_deref()
            .unwrap_or("any"),
    );
    println!();

    for (rank, result) in outcome.results.iter().enumerate() {
        println!(
            "{:>2}. {:<30} {:>3}  {}",
            rank + 1,
            result.college.name,
            result.score,
            result.score_text
        );
        println!("      {}", result.reason);
        if let Some(breakdown) = &result.breakdown_text {
            println!("      {breakdown}");
        }
    }

    if !outcome.diagnostics.notes.is_empty() {
        println!();
        println!("Notes:");
        for note in &outcome.diagnostics.notes {
            println!("  - {note}");
        }
    }

    Ok(())
}
