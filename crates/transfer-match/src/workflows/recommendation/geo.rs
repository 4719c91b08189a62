//! US state matching across free-text representations.
//!
//! Profile state, questionnaire answers, and provider records all spell
//! states differently ("WA", "wa.", "Washington", "washington state"); every
//! comparison in the engine funnels through [`state_matches`].

/// Abbreviation → full name for the 50 states plus DC.
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("al", "alabama"),
    ("ak", "alaska"),
    ("az", "arizona"),
    ("ar", "arkansas"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("de", "delaware"),
    ("dc", "district of columbia"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("hi", "hawaii"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ia", "iowa"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("me", "maine"),
    ("md", "maryland"),
    ("ma", "massachusetts"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("ms", "mississippi"),
    ("mo", "missouri"),
    ("mt", "montana"),
    ("ne", "nebraska"),
    ("nv", "nevada"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("ny", "new york"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("vt", "vermont"),
    ("va", "virginia"),
    ("wa", "washington"),
    ("wv", "west virginia"),
    ("wi", "wisconsin"),
    ("wy", "wyoming"),
];

/// Trim, lowercase, strip periods, and drop a trailing "state" token so that
/// "Washington State" and "wa." compare cleanly.
fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase().replace('.', "");
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.len() > 1 && tokens.last() == Some(&"state") {
        tokens.pop();
    }
    tokens.join(" ")
}

fn expand(normalized: &str) -> Option<&'static str> {
    if normalized.len() != 2 {
        return None;
    }
    STATE_ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| *abbreviation == normalized)
        .map(|(_, name)| *name)
}

/// Whether two free-text state representations denote the same US state.
pub fn state_matches(left: &str, right: &str) -> bool {
    let left = normalize(left);
    let right = normalize(right);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right {
        return true;
    }

    let left_full = expand(&left).unwrap_or(left.as_str());
    let right_full = expand(&right).unwrap_or(right.as_str());
    left_full == right_full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviation_matches_full_name_both_directions() {
        assert!(state_matches("WA", "Washington"));
        assert!(state_matches("Washington", "wa"));
        assert!(state_matches("n.y.", "New York"));
    }

    #[test]
    fn trailing_state_token_is_ignored() {
        assert!(state_matches("Washington State", "WA"));
        assert!(state_matches("washington state", "washington"));
    }

    #[test]
    fn different_states_do_not_match() {
        assert!(!state_matches("WA", "Oregon"));
        assert!(!state_matches("new york", "new jersey"));
    }

    #[test]
    fn blank_or_unknown_inputs_never_match() {
        assert!(!state_matches("", "WA"));
        assert!(!state_matches("  ", "  "));
        assert!(!state_matches("zz", "washington"));
    }
}
