use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::text::char_len;

use super::{CompletionRequest, Oracle};

const MIN_BODY_LEN: usize = 50;
const MIN_REFINED_SUBJECT_LEN: usize = 10;
const MIN_REFINED_BODY_LEN: usize = 100;
const PROFESSIONAL_THRESHOLD: f64 = 0.7;

const CASUAL_PHRASES: &[&str] = &[
    "hey there", "what's up", "awesome", "cool", "yeah", "super", "totally", "btw", "gonna",
    "wanna", "gotta", "u", "ur", "thx",
];

const PROFESSIONAL_PHRASES: &[&str] = &[
    "dear", "sincerely", "best regards", "thank you", "opportunity", "value", "solution",
    "expertise", "professional", "looking forward",
];

const GREETINGS: &[&str] = &["dear", "hello", "hi", "greetings"];
const CLOSINGS: &[&str] = &["sincerely", "regards", "thank you", "best"];

/// Casual wording and its formal replacement, longest phrases first.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("Hey there", "Hello"),
    ("What's up", "I hope this email finds you well"),
    ("Hey", "Hello"),
    ("Awesome", "Excellent"),
    ("Cool", "Impressive"),
    ("Yeah", "Yes"),
    ("Wanna", "Want to"),
    ("Gonna", "Going to"),
    ("BTW", "By the way"),
    ("Thanks", "Thank you"),
    ("Thx", "Thank you"),
];

const SYSTEM_PROMPT: &str = "You are an expert email editor specializing in business development and partnership emails. \
Refine the email to be conversational and approachable yet still professional: only modify text that appears to be \
placeholders or has grammatical or contextual errors, do not change the email's content, tone, or industry focus, \
preserve the writer's voice, and keep it short and to the point. \
Answer with the subject on the first line and the body after it.";

#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("email subject and body cannot be empty")]
    EmptyEmail,
    #[error("email body is too short for meaningful refinement")]
    BodyTooShort,
    #[error("language model request failed: {0}")]
    Oracle(#[from] anyhow::Error),
    #[error("error parsing refined email content: {0}")]
    Unparseable(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefineRequest {
    pub subject: String,
    pub body: String,
    pub recipient_email: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefinedEmail {
    pub subject: String,
    pub body: String,
}

pub async fn refine_email(oracle: &dyn Oracle, request: &RefineRequest) -> Result<RefinedEmail, RefineError> {
    if request.subject.trim().is_empty() || request.body.trim().is_empty() {
        return Err(RefineError::EmptyEmail);
    }
    if char_len(&request.body) < MIN_BODY_LEN {
        return Err(RefineError::BodyTooShort);
    }

    let company_name = request.company_name.as_deref().unwrap_or_default();
    let industry = request.industry.as_deref().unwrap_or_default();

    let prompt = format!(
        "Refine this email for {} in the {} industry.\n\
        Make it sound like a real person talking - casual but still professional:\n\
        - Replace any stuffy corporate language with more conversational phrases\n\
        - Keep it friendly and approachable while maintaining expertise\n\
        - Include conversational transitions and a natural flow\n\
        Current Subject: {}\n\
        Current Body: {}",
        company_name, industry, request.subject, request.body
    );
    let completion = CompletionRequest::new(prompt)
        .system(SYSTEM_PROMPT)
        .temperature(0.7)
        .max_tokens(2000);

    let reply = oracle.complete(completion).await?;
    let mut refined = parse_refined_email(&reply, &request.subject)?;

    let score = professional_score(&refined.body);
    if score < PROFESSIONAL_THRESHOLD {
        log::warn!("Professional score too low ({:.2}), enforcing tone", score);
        refined.body = enforce_professional_tone(&refined.body, company_name);
    }

    Ok(refined)
}

/// Splits a model reply into subject (first line) and body (the rest).
fn parse_refined_email(reply: &str, original_subject: &str) -> Result<RefinedEmail, RefineError> {
    let (first_line, rest) = reply
        .trim()
        .split_once('\n')
        .ok_or_else(|| RefineError::Unparseable("reply has no body".to_string()))?;

    let subject = first_line.replace("Subject: ", "").trim().to_string();
    let subject = match char_len(&subject) < MIN_REFINED_SUBJECT_LEN {
        true => {
            log::warn!("Generated subject was too short, using original");
            original_subject.to_string()
        }
        false => subject,
    };

    let body = rest.replace("Body: ", "").trim().to_string();
    if char_len(&body) < MIN_REFINED_BODY_LEN {
        return Err(RefineError::Unparseable(
            "generated email body is too short or empty".to_string(),
        ));
    }

    Ok(RefinedEmail { subject, body })
}

fn phrase_pattern(phrase: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).unwrap()
}

static CASUAL_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| CASUAL_PHRASES.iter().map(|p| phrase_pattern(p)).collect());

static PROFESSIONAL_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| PROFESSIONAL_PHRASES.iter().map(|p| phrase_pattern(p)).collect());

/// Share of tone markers in `text` that are professional; 0.5 with no markers.
pub fn professional_score(text: &str) -> f64 {
    let count = |patterns: &[Regex]| patterns.iter().filter(|p| p.is_match(text)).count();
    let casual = count(&CASUAL_PATTERNS);
    let professional = count(&PROFESSIONAL_PATTERNS);

    match casual + professional {
        0 => 0.5,
        total => professional as f64 / total as f64,
    }
}

static GREETING_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| GREETINGS.iter().map(|p| phrase_pattern(p)).collect());

static CLOSING_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| CLOSINGS.iter().map(|p| phrase_pattern(p)).collect());

/// Capitalised and lower-case form of every casual phrase.
static REPLACEMENT_PATTERNS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    REPLACEMENTS
        .iter()
        .flat_map(|(casual, formal)| {
            [
                (casual.to_string(), formal.to_string()),
                (casual.to_lowercase(), formal.to_lowercase()),
            ]
        })
        .map(|(casual, formal)| {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&casual))).unwrap();
            (pattern, formal)
        })
        .collect()
});

pub fn enforce_professional_tone(text: &str, company_name: &str) -> String {
    let mut text = text.to_string();

    if !GREETING_PATTERNS.iter().any(|p| p.is_match(&text)) {
        text = format!("Dear {} Team,\n\n{}", company_name, text);
    }
    if !CLOSING_PATTERNS.iter().any(|p| p.is_match(&text)) {
        text = format!("{}\n\nBest regards,\n[Your Name]\n[Your Position]", text);
    }

    REPLACEMENT_PATTERNS
        .iter()
        .fold(text, |text, (pattern, formal)| {
            pattern.replace_all(&text, formal.as_str()).into_owned()
        })
}
