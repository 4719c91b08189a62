//! Human-readable rendering of scores and ranking factors.

use super::scoring::ScoreBreakdown;

pub(crate) fn score_text(score: u8) -> String {
    let label = if score >= 85 {
        "Excellent match"
    } else if score >= 70 {
        "Strong match"
    } else if score >= 55 {
        "Good match"
    } else if score >= 40 {
        "Fair match"
    } else {
        "Weak match"
    };
    format!("{label} ({score}/100)")
}

pub(crate) fn breakdown_text(breakdown: &ScoreBreakdown) -> String {
    let mut text = format!(
        "Academics {} · Cost {} · Aid {} · Debt {} · Location {} · Size {} · Setting {} · Prestige {}",
        breakdown.academics,
        breakdown.cost,
        breakdown.aid,
        breakdown.debt,
        breakdown.location,
        breakdown.size,
        breakdown.setting,
        breakdown.prestige,
    );
    if let Some(ai_fit) = breakdown.ai_fit {
        text.push_str(&format!(" · AI fit {ai_fit}"));
    }
    text.push_str(&format!(" → {} overall", breakdown.final_score));
    text
}

/// "Top factors: X (score), Y (score)" from the two strongest named factors,
/// with an optional disclosure when the fallback state shaped the results.
pub(crate) fn reason(
    gpa_fit: u8,
    prestige: u8,
    major_fit: u8,
    preference_fit: u8,
    ai_factor: u8,
    query_match: Option<u8>,
    fallback_note: Option<&str>,
) -> String {
    let mut factors: Vec<(&'static str, u8)> = vec![
        ("GPA fit", gpa_fit),
        ("prestige", prestige),
        ("major match", major_fit),
        ("preference fit", preference_fit),
        ("AI fit", ai_factor),
    ];
    if let Some(score) = query_match {
        factors.push(("query match", score));
    }
    // Stable sort keeps the declaration order on ties, so output is
    // deterministic for identical inputs.
    factors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut reason = format!(
        "Top factors: {} ({}), {} ({})",
        factors[0].0, factors[0].1, factors[1].0, factors[1].1
    );
    if let Some(note) = fallback_note {
        reason.push(' ');
        reason.push_str(note);
    }
    reason
}
