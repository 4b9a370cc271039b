use serde::Serialize;

use super::{
    business_focus::synthesize_business_focus,
    signals::PageSignals,
    tables::{DEFAULT_INDUSTRY, DOMAIN_INDUSTRY_KEYWORDS},
    text::{dedup_normalized, name_from_domain},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub achievements: Vec<String>,
    pub products: Vec<String>,
    pub description: String,
    pub business_focus: String,
}

/// Accumulates page signals for one domain.
///
/// Scalars are set at most once: the first page to supply a value keeps it.
/// Lists grow with every page and are deduplicated in [`ProfileDraft::finish`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileDraft {
    company_name: Option<String>,
    industry: Option<String>,
    description: Option<String>,
    achievements: Vec<String>,
    products: Vec<String>,
}

impl ProfileDraft {
    pub fn absorb(mut self, page: PageSignals) -> Self {
        self.company_name = self
            .company_name
            .or(page.company_name.filter(|name| !name.is_empty()));
        self.industry = self.industry.or(page.industry);
        self.description = self.description.or(page.description);
        self.achievements.extend(page.achievements);
        self.products.extend(page.products);
        self
    }

    pub fn finish(self, domain: &str) -> CompanyProfile {
        let company_name = self
            .company_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| name_from_domain(domain));
        let industry = self
            .industry
            .filter(|industry| !industry.is_empty())
            .unwrap_or_else(|| guess_industry_from_domain(domain).to_string());
        let description = self.description.unwrap_or_default();
        let achievements = dedup_normalized(self.achievements);
        let products = dedup_normalized(self.products);

        let business_focus =
            synthesize_business_focus(&description, &achievements, &products, &industry);

        CompanyProfile {
            company_name,
            industry,
            achievements,
            products,
            description,
            business_focus,
        }
    }
}

/// Industry implied by keywords embedded in the domain itself.
pub fn guess_industry_from_domain(domain: &str) -> &'static str {
    let domain = domain.to_lowercase();

    DOMAIN_INDUSTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| domain.contains(keyword))
        .map(|(_, industry)| *industry)
        .unwrap_or(DEFAULT_INDUSTRY)
}
