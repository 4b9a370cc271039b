use super::{CompletionRequest, Oracle};

pub const ACHIEVEMENT_PLACEHOLDER: &str = "specific achievement or aspect of their business";
pub const INDUSTRY_PLACEHOLDER: &str = "Industry";
pub const MEETING_TIMES_PLACEHOLDER: &str = "specific dates/times";

const FREE_MAIL_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "outlook.com", "yahoo.com"];
const DEFAULT_MEETING_TIMES: &str = "Tuesday at 10 AM ET, Wednesday at 3 PM ET, Thursday at 1 PM ET";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates concise, professional email content. \
Respond only with the exact text requested without any additional commentary, explanations, or quotation marks.";

/// Recipient's domain, unless it is a personal mailbox provider.
fn business_domain(recipient_email: &str) -> Option<&str> {
    recipient_email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty())
        .filter(|domain| !FREE_MAIL_DOMAINS.contains(&domain.to_lowercase().as_str()))
}

fn company_name(domain: Option<&str>) -> String {
    let label = domain.and_then(|d| d.split('.').next()).unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => "the company".to_string(),
    }
}

fn placeholder_prompt(placeholder: &str, domain: Option<&str>, company: &str) -> String {
    match (placeholder, domain) {
        (ACHIEVEMENT_PLACEHOLDER, Some(domain)) => format!(
            "Based on the company name '{}' from domain '{}', what is likely their main business focus or value proposition? \
            Provide a brief, specific description of what problem they likely solve for customers. Keep it concise (25 words or less).",
            company, domain
        ),
        (ACHIEVEMENT_PLACEHOLDER, None) => "Generate a generic business value proposition that would be impressive to mention \
            in a cold email (25 words or less)."
            .to_string(),
        (INDUSTRY_PLACEHOLDER, Some(domain)) => format!(
            "Based on the company name '{}' from domain '{}', what industry is this company likely in? Respond with just the industry name.",
            company, domain
        ),
        (INDUSTRY_PLACEHOLDER, None) => "Generate a specific industry name that would be relevant for B2B sales outreach. \
            Respond with just the industry name."
            .to_string(),
        (MEETING_TIMES_PLACEHOLDER, _) => format!(
            "Suggest 3 professional meeting time slots for next week. Format as '{}'. Respond with just the formatted time slots.",
            DEFAULT_MEETING_TIMES
        ),
        (other, _) => format!(
            "Generate appropriate content for the placeholder '{}' in a professional email. \
            Keep it concise, specific, and realistic. Respond with just the content for the placeholder.",
            other
        ),
    }
}

fn fallback_content(placeholder: &str, company: &str) -> String {
    match placeholder {
        ACHIEVEMENT_PLACEHOLDER => format!("innovative solutions in the {} sector", company),
        INDUSTRY_PLACEHOLDER => "Technology".to_string(),
        MEETING_TIMES_PLACEHOLDER => DEFAULT_MEETING_TIMES.to_string(),
        other => format!("[{}]", other),
    }
}

/// Text for a template placeholder addressed to `recipient_email`.
/// Falls back to canned content when the model is unavailable.
pub async fn fill_placeholder(oracle: &dyn Oracle, placeholder: &str, recipient_email: &str) -> String {
    let domain = business_domain(recipient_email);
    let company = company_name(domain);

    let request = CompletionRequest::new(placeholder_prompt(placeholder, domain, &company))
        .system(SYSTEM_PROMPT)
        .temperature(0.7)
        .max_tokens(50);

    match oracle.complete(request).await {
        Ok(content) => {
            let content = content.replace(['"', '\''], "");
            match content.trim().is_empty() {
                true => fallback_content(placeholder, &company),
                false => content.trim().to_string(),
            }
        }
        Err(e) => {
            log::error!("Generation error for placeholder {:?}: {:?}", placeholder, e);
            fallback_content(placeholder, &company)
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;

    struct FailingOracle;

    #[async_trait]
    impl Oracle for FailingOracle {
        async fn complete(&self, _request: CompletionRequest) -> anyhow::Result<String> {
            Err(anyhow!("timeout"))
        }
    }

    struct EchoOracle;

    #[async_trait]
    impl Oracle for EchoOracle {
        async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String> {
            Ok(format!("\"{}\"", request.prompt))
        }
    }

    #[test]
    fn free_mail_domains_are_not_businesses() {
        assert_eq!(business_domain("jane@gmail.com"), None);
        assert_eq!(business_domain("jane@Yahoo.com"), None);
        assert_eq!(business_domain("jane@glam.com"), Some("glam.com"));
        assert_eq!(business_domain("not-an-email"), None);
    }

    #[test]
    fn company_name_capitalizes_label() {
        assert_eq!(company_name(Some("GLAM.com")), "Glam");
        assert_eq!(company_name(None), "the company");
    }

    #[tokio::test]
    async fn failing_oracle_uses_fallbacks() {
        assert_eq!(
            fill_placeholder(&FailingOracle, ACHIEVEMENT_PLACEHOLDER, "jo@glam.com").await,
            "innovative solutions in the Glam sector"
        );
        assert_eq!(
            fill_placeholder(&FailingOracle, INDUSTRY_PLACEHOLDER, "jo@glam.com").await,
            "Technology"
        );
        assert_eq!(
            fill_placeholder(&FailingOracle, MEETING_TIMES_PLACEHOLDER, "jo@glam.com").await,
            DEFAULT_MEETING_TIMES
        );
        assert_eq!(
            fill_placeholder(&FailingOracle, "Your Name", "jo@glam.com").await,
            "[Your Name]"
        );
    }

    #[tokio::test]
    async fn quotes_are_removed_from_answers() {
        let content = fill_placeholder(&EchoOracle, INDUSTRY_PLACEHOLDER, "jo@glam.com").await;

        assert!(content.starts_with("Based on the company name Glam from domain glam.com"));
        assert!(!content.contains('"'));
        assert!(!content.contains('\''));
    }

    #[tokio::test]
    async fn personal_mailbox_gets_generic_prompt() {
        let content = fill_placeholder(&EchoOracle, INDUSTRY_PLACEHOLDER, "jo@gmail.com").await;

        assert!(content.starts_with("Generate a specific industry name"));
    }
}
