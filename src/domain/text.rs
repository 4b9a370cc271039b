use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` down to `max` characters, the last three being "...".
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    match char_len(text) > max {
        true => {
            let kept: String = text.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
        false => text.to_string(),
    }
}

/// Whitespace-normalizes every item and keeps the first of each
/// case-insensitive duplicate.
pub fn dedup_normalized<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items
        .into_iter()
        .map(|item| normalize_whitespace(&item))
        .filter(|item| !item.is_empty())
        .unique_by(|item| item.to_lowercase())
        .collect()
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;

    text.chars()
        .flat_map(|c| {
            let cased: Vec<char> = match previous_is_letter {
                true => c.to_lowercase().collect(),
                false => c.to_uppercase().collect(),
            };
            previous_is_letter = c.is_alphabetic();
            cased
        })
        .collect()
}

pub fn first_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}

pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Company name guessed from a bare domain, e.g. "acmebeauty.com" -> "Acmebeauty".
/// Never empty: an empty first label falls back to the whole domain, then to
/// [`UNKNOWN_COMPANY`].
pub fn name_from_domain(domain: &str) -> String {
    let domain = domain.trim().trim_matches('.');
    let label = match first_label(domain).trim() {
        "" => domain,
        label => label,
    };

    match label.is_empty() {
        true => UNKNOWN_COMPANY.to_string(),
        false => title_case(label),
    }
}
