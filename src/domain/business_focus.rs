use std::sync::LazyLock;

use regex::Regex;

use super::text::{char_len, truncate_with_ellipsis};

const MAX_FOCUS_LEN: usize = 100;

static PURPOSE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Word boundary keeps "we" from matching the tail of words like "Zimbabwe".
        r"(?i)\b(?:we|our company|our mission is to) (?:provide|offer|deliver|create|build|help|enable|empower|transform)[\w\s,]+",
        r"(?i)(?:dedicated|committed) to [\w\s,]+",
        r"(?i)(?:specializ|focuse|concentrate)(?:e|ed|es|ing) (?:in|on) [\w\s,]+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// One-line statement of what the company does, built from whatever the
/// scraper found. Rules are tried in order; the last one always applies.
pub fn synthesize_business_focus(
    description: &str,
    achievements: &[String],
    products: &[String],
    industry: &str,
) -> String {
    if let Some(focus) = purpose_statement(description) {
        return focus;
    }

    if !products.is_empty() {
        let product_types = products.iter().take(3).map(String::as_str).collect::<Vec<_>>();
        let connector = match industry.to_lowercase().starts_with("in the") {
            true => "",
            false => "in the ",
        };
        return format!(
            "providing {} {}{} industry",
            product_types.join(", "),
            connector,
            industry
        );
    }

    if let Some(achievement) = achievements.first() {
        // Only capitalised achievements are lower-cased; others are kept verbatim.
        let starts_upper = achievement.chars().next().is_some_and(char::is_uppercase);
        let achievement = match starts_upper {
            true => achievement.to_lowercase(),
            false => achievement.to_string(),
        };
        return format!("known for {}", achievement);
    }

    format!(
        "delivering innovative solutions and services in the {} sector",
        industry
    )
}

fn purpose_statement(description: &str) -> Option<String> {
    if char_len(description) <= MAX_FOCUS_LEN {
        return None;
    }

    PURPOSE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(description))
        .map(|found| truncate_with_ellipsis(found.as_str(), MAX_FOCUS_LEN).trim().to_string())
}
