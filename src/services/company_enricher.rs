//! Turns a scraped [`CompanyProfile`] into outreach-ready copy with the help
//! of the language model.
//!
//! Each model call has a local fallback, so enrichment never fails: a broken
//! oracle only shows up as `ai_enhanced: false` and plainer wording.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::CompanyProfile;

use super::{CompletionRequest, Oracle};

const FOCUS_SYSTEM_PROMPT: &str = "You are an expert at identifying a company's core business focus and value proposition. \
Given a company description, extract or formulate a clear, concise business focus statement that highlights what makes \
the company unique, emphasizes their main value proposition and uses active, impactful language. \
The statement should be immediately useful in a business email context.";

const FOCUS_AREAS_SYSTEM_PROMPT: &str = "You are an expert AI consultant who identifies specific technical opportunities for companies. \
Given a company's business focus and industry, generate three tailored focus areas: a design focus (UI/UX), \
a development focus (technical architecture) and an AI integration focus. Each must be heavily industry-specific, \
one concise sentence, and focused on business value.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert business analyst. Answer strictly in `Key: value` lines, \
one small sentence per value, using only the facts provided.";

const DEFAULT_DESIGN_FOCUS: &str = "UI/UX optimization for improved user engagement";
const DEFAULT_DEV_FOCUS: &str = "Scalable, AI-powered architecture";
const DEFAULT_AI_FOCUS: &str = "Custom AI solutions for automation and efficiency";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusAreas {
    pub design_focus: String,
    pub dev_focus: String,
    pub ai_focus: String,
}

impl Default for FocusAreas {
    fn default() -> Self {
        FocusAreas {
            design_focus: DEFAULT_DESIGN_FOCUS.to_string(),
            dev_focus: DEFAULT_DEV_FOCUS.to_string(),
            ai_focus: DEFAULT_AI_FOCUS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProfile {
    #[serde(flatten)]
    pub profile: CompanyProfile,
    #[serde(flatten)]
    pub focus_areas: FocusAreas,
    pub key_achievements: String,
    pub market_position: String,
    pub products_summary: String,
    pub values: String,
    pub ai_enhanced: bool,
}

pub async fn enrich_profile(oracle: &dyn Oracle, profile: CompanyProfile) -> EnrichedProfile {
    let description = working_description(&profile);

    let business_focus = match ask_business_focus(oracle, &description).await {
        Some(focus) => focus,
        None => profile.business_focus.clone(),
    };

    let focus_areas = ask_focus_areas(oracle, &business_focus, &profile.industry).await;

    let analysis = ask_analysis(oracle, &profile, &description, &business_focus).await;
    let ai_enhanced = analysis.is_some();
    let analysis = analysis.unwrap_or_default();

    let field = |key: &str, fallback: String| {
        analysis
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or(fallback)
    };
    let key_achievements = field("key_achievements", profile.achievements.join(", "));
    let market_position = field(
        "market_position",
        format!("An established player in the {} industry", profile.industry),
    );
    let products_summary = field("products_summary", profile.products.join(", "));
    let values = field("company_values", String::new());

    EnrichedProfile {
        profile: CompanyProfile {
            business_focus,
            ..profile
        },
        focus_areas,
        key_achievements,
        market_position,
        products_summary,
        values,
        ai_enhanced,
    }
}

/// The scraped description, or one stitched together from the other fields.
fn working_description(profile: &CompanyProfile) -> String {
    if !profile.description.is_empty() {
        return profile.description.clone();
    }

    let mut parts = vec![format!("Company: {}", profile.company_name)];
    if !profile.products.is_empty() {
        parts.push(format!("Products/Services: {}", profile.products.join(", ")));
    }
    if !profile.achievements.is_empty() {
        parts.push(format!(
            "Notable achievements: {}",
            profile.achievements.join(", ")
        ));
    }

    parts.join(" ")
}

async fn ask_business_focus(oracle: &dyn Oracle, description: &str) -> Option<String> {
    let prompt = format!(
        "Based on this company description, provide a clear business focus/value proposition statement:\n\n\
        {}\n\n\
        Requirements:\n\
        - Keep it under 20 words\n\
        - Make it specific and meaningful\n\
        - Focus on their core value to customers\n\
        - Use present tense, active voice\n\
        - Don't use generic phrases like \"leading provider\" unless truly applicable",
        description
    );
    let request = CompletionRequest::new(prompt)
        .system(FOCUS_SYSTEM_PROMPT)
        .temperature(0.7)
        .max_tokens(100);

    match oracle.complete(request).await {
        Ok(text) => {
            let focus = text.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
            (!focus.is_empty()).then(|| focus.to_string())
        }
        Err(e) => {
            log::error!("Error extracting business focus: {:?}", e);
            None
        }
    }
}

async fn ask_focus_areas(oracle: &dyn Oracle, business_focus: &str, industry: &str) -> FocusAreas {
    let prompt = format!(
        "Company Information:\n\
        Industry: {}\n\
        Business Focus: {}\n\n\
        Generate three specific focus areas that would provide immediate value to this company.\n\
        Format as JSON with three fields: design_focus, dev_focus, ai_focus",
        industry, business_focus
    );
    let request = CompletionRequest::new(prompt)
        .system(FOCUS_AREAS_SYSTEM_PROMPT)
        .temperature(0.7)
        .json_object();

    let text = match oracle.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Error generating focus areas: {:?}", e);
            return FocusAreas::default();
        }
    };

    match serde_json::from_str::<FocusAreas>(&text) {
        Ok(areas) => {
            let defaults = FocusAreas::default();
            let or_default = |value: String, fallback: String| match value.trim().is_empty() {
                true => fallback,
                false => value,
            };
            FocusAreas {
                design_focus: or_default(areas.design_focus, defaults.design_focus),
                dev_focus: or_default(areas.dev_focus, defaults.dev_focus),
                ai_focus: or_default(areas.ai_focus, defaults.ai_focus),
            }
        }
        Err(e) => {
            log::error!("Unparseable focus areas {:?}: {:?}", text, e);
            FocusAreas::default()
        }
    }
}

async fn ask_analysis(
    oracle: &dyn Oracle,
    profile: &CompanyProfile,
    description: &str,
    business_focus: &str,
) -> Option<HashMap<String, String>> {
    let prompt = format!(
        "Analyze this company:\n\
        Name: {}\n\
        Industry: {}\n\
        Description: {}\n\
        Business Focus: {}\n\
        Products/Services: {}\n\
        Achievements: {}\n\n\
        Respond in this format:\n\
        Key Achievements: [major achievements and milestones]\n\
        Market Position: [current market position and competitive advantages]\n\
        Products Summary: [overview of main products/services]\n\
        Company Values: [core values and mission]",
        profile.company_name,
        profile.industry,
        description,
        business_focus,
        profile.products.join(", "),
        profile.achievements.join(", ")
    );
    let request = CompletionRequest::new(prompt)
        .system(ANALYSIS_SYSTEM_PROMPT)
        .temperature(0.5);

    match oracle.complete(request).await {
        Ok(text) => {
            let fields = parse_structured_response(&text);
            match fields.is_empty() {
                true => {
                    log::error!("Analysis response had no fields: {:?}", text);
                    None
                }
                false => Some(fields),
            }
        }
        Err(e) => {
            log::error!("Error in AI enhancement: {:?}", e);
            None
        }
    }
}

/// Parses `Key: value` lines into snake_case keys. Lines without a colon
/// continue the previous value.
pub fn parse_structured_response(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match line.split_once(':') {
            Some((key, value)) => {
                if let Some((key, values)) = current.take() {
                    fields.insert(key, values.join("\n").trim().to_string());
                }
                let key = key.trim().to_lowercase().replace(' ', "_");
                current = Some((key, vec![value.trim().to_string()]));
            }
            None => {
                if let Some((_, values)) = current.as_mut() {
                    values.push(line.to_string());
                }
            }
        }
    }

    if let Some((key, values)) = current {
        fields.insert(key, values.join("\n").trim().to_string());
    }

    fields
}
