use std::{sync::Arc, time::Duration};

use rand::Rng;

use crate::domain::{
    signals::{page_signals, PageSignals},
    text::first_label,
    CompanyProfile, ProfileDraft,
};

use super::PageFetcher;

const DIRECTORY_URL: &str = "https://www.linkedin.com/company";

pub struct CompanyScraper {
    fetcher: Arc<dyn PageFetcher>,
    min_delay: Duration,
    max_delay: Duration,
}

impl CompanyScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, (min_delay, max_delay): (Duration, Duration)) -> Self {
        CompanyScraper {
            fetcher,
            min_delay,
            max_delay,
        }
    }

    /// Builds a profile for `domain`.
    ///
    /// Every candidate page is tried in order, one at a time. Pages that fail
    /// to load simply contribute nothing, so the returned profile is always
    /// fully populated, falling back to guesses derived from the domain name.
    pub async fn extract(&self, domain: &str) -> CompanyProfile {
        let domain = clean_domain(domain);
        let urls = candidate_urls(&domain);
        log::info!("Researching {} across {} pages", domain, urls.len());

        let mut draft = ProfileDraft::default();

        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause()).await;
            }

            let markup = self.fetcher.fetch(url).await;
            let signals = match markup.is_empty() {
                true => PageSignals::default(),
                false => page_signals(&markup, &domain),
            };
            draft = draft.absorb(signals);
        }

        let profile = draft.finish(&domain);
        log::info!(
            "Profile for {}: name={}, industry={}, {} achievements, {} products",
            domain,
            profile.company_name,
            profile.industry,
            profile.achievements.len(),
            profile.products.len()
        );

        profile
    }

    fn pause(&self) -> Duration {
        match self.max_delay > self.min_delay {
            true => rand::thread_rng().gen_range(self.min_delay..=self.max_delay),
            false => self.min_delay,
        }
    }
}

/// Strips scheme, path and a leading "www." from user input.
pub fn clean_domain(input: &str) -> String {
    let input = input.trim();
    let without_scheme = match input.split_once("://") {
        Some((scheme, rest))
            if scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("http") =>
        {
            rest
        }
        _ => input,
    };
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    let host = match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    };

    host.to_lowercase()
}

/// Pages probed for a domain. Earlier pages win scalar fields.
pub fn candidate_urls(domain: &str) -> Vec<String> {
    vec![
        format!("https://{}", domain),
        format!("https://{}/about", domain),
        format!("https://{}/about-us", domain),
        format!("https://{}/company", domain),
        format!("{}/{}", DIRECTORY_URL, first_label(domain)),
    ]
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use itertools::Itertools;

    use super::{candidate_urls, clean_domain, CompanyScraper};
    use crate::services::PageFetcher;

    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with_page(mut self, url: &str, markup: &str) -> Self {
            self.pages.insert(url.to_string(), markup.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> String {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().unwrap_or_default()
        }
    }

    fn scraper(fetcher: Arc<StubFetcher>) -> CompanyScraper {
        CompanyScraper::new(fetcher, (Duration::ZERO, Duration::ZERO))
    }

    #[test]
    fn clean_domain_strips_scheme_path_and_www() {
        assert_eq!(clean_domain("https://www.acme.com/about/team"), "acme.com");
        assert_eq!(clean_domain("http://acme.com"), "acme.com");
        assert_eq!(clean_domain(" acme.com "), "acme.com");
        assert_eq!(clean_domain("HTTPS://WWW.Acme.com/About"), "acme.com");
        assert_eq!(clean_domain("https://www./x"), "");
    }

    #[test]
    fn candidate_urls_in_fixed_order() {
        assert_eq!(
            candidate_urls("sugarcosmetics.com"),
            vec![
                "https://sugarcosmetics.com",
                "https://sugarcosmetics.com/about",
                "https://sugarcosmetics.com/about-us",
                "https://sugarcosmetics.com/company",
                "https://www.linkedin.com/company/sugarcosmetics",
            ]
        );
    }

    #[tokio::test]
    async fn all_fetches_failing_still_yields_full_profile() {
        let fetcher = Arc::new(StubFetcher::default());

        let profile = scraper(fetcher.clone()).extract("https://acmebeauty.com/").await;

        assert_eq!(profile.company_name, "Acmebeauty");
        assert_eq!(profile.industry, "Beauty & Cosmetics");
        assert_eq!(
            profile.business_focus,
            "delivering innovative solutions and services in the Beauty & Cosmetics sector"
        );
        assert_eq!(fetcher.requested.lock().unwrap().len(), 5);
    }

    #[test]
    fn pause_stays_within_configured_range() {
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(40);
        let scraper = CompanyScraper::new(Arc::new(StubFetcher::default()), (min, max));

        let pauses: Vec<Duration> = (0..200).map(|_| scraper.pause()).collect();

        assert!(pauses.iter().all(|pause| (min..=max).contains(pause)));
        assert!(pauses.iter().any(|pause| *pause != pauses[0]));
    }

    #[tokio::test]
    async fn degenerate_domains_still_get_a_name() {
        for input in ["https://", ".com", "https://www./x"] {
            let profile = scraper(Arc::new(StubFetcher::default())).extract(input).await;

            assert!(!profile.company_name.is_empty(), "empty name for {:?}", input);
            assert!(!profile.industry.is_empty());
            assert!(!profile.business_focus.is_empty());
        }
    }

    #[tokio::test]
    async fn earlier_page_description_wins() {
        let first = "<html><body><p>Acme builds dependable rockets for road runner enthusiasts.</p></body></html>";
        let second = "<html><body><p>An entirely different description that also qualifies nicely.</p></body></html>";
        let fetcher = Arc::new(
            StubFetcher::default()
                .with_page("https://acme.com/about", first)
                .with_page("https://acme.com/company", second),
        );

        let profile = scraper(fetcher).extract("acme.com").await;

        assert_eq!(
            profile.description,
            "Acme builds dependable rockets for road runner enthusiasts."
        );
    }

    #[tokio::test]
    async fn lists_accumulate_without_duplicates() {
        let home = r#"<html><body><div class="products"><ul><li>Lip Gloss</li><li>Eye Liner</li></ul></div></body></html>"#;
        let about = r#"<html><body><div class="services"><ul><li>lip   gloss</li><li>Nail Polish</li></ul></div></body></html>"#;
        let fetcher = Arc::new(
            StubFetcher::default()
                .with_page("https://glam.com", home)
                .with_page("https://glam.com/about-us", about),
        );

        let profile = scraper(fetcher).extract("glam.com").await;

        assert_eq!(profile.products, vec!["Lip Gloss", "Eye Liner", "Nail Polish"]);
        assert!(profile
            .products
            .iter()
            .map(|p| p.to_lowercase())
            .all_unique());
        assert_eq!(
            profile.business_focus,
            "providing Lip Gloss, Eye Liner, Nail Polish in the Technology industry"
        );
    }
}
