//! Heuristic company signals read out of a single page's markup.
//!
//! Every extractor here is pure and best-effort: a missing selector or an
//! unmatched pattern yields an empty value, never an error. Where several
//! heuristics compete, they are listed as an ordered matcher table and the
//! first one producing a value wins.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{
    tables::{
        ABOUT_SECTIONS, ACHIEVEMENT_SECTIONS, ACHIEVEMENT_WORDS, BROADER_CATEGORIES,
        DEFAULT_INDUSTRY, GENERIC_PRODUCT_TERMS, INDUSTRIES, INDUSTRY_TAG_SELECTOR,
        MAIN_CONTENT_SELECTORS, MAX_ACHIEVEMENTS_PER_PAGE, MAX_PRODUCTS_PER_PAGE,
        NAVIGATION_WORDS, PRODUCT_HEADINGS, PRODUCT_LINKS, PRODUCT_SECTIONS, TITLE_BOILERPLATE,
    },
    text::{char_len, dedup_normalized, name_from_domain, normalize_whitespace, truncate_with_ellipsis},
};

const MAX_ACHIEVEMENT_LEN: usize = 150;

type Matcher = fn(&Html) -> Option<String>;

/// What one page contributed to a profile.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageSignals {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub products: Vec<String>,
}

pub fn page_signals(markup: &str, domain: &str) -> PageSignals {
    let document = Html::parse_document(markup);

    let description = extract_description(&document);

    PageSignals {
        company_name: Some(extract_company_name(&document, domain)),
        industry: Some(extract_industry(&document)),
        description: (!description.is_empty()).then_some(description),
        achievements: extract_achievements(&document),
        products: extract_products(&document),
    }
}

// Name

const NAME_MATCHERS: &[Matcher] = &[logo_alt_text, cleaned_title, short_heading, organization_markup];

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    TITLE_BOILERPLATE
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

pub fn extract_company_name(document: &Html, domain: &str) -> String {
    NAME_MATCHERS
        .iter()
        .find_map(|matcher| matcher(document))
        .unwrap_or_else(|| name_from_domain(domain))
}

fn logo_alt_text(document: &Html) -> Option<String> {
    select(
        document,
        r#"img[alt*="logo"], img[alt*="Logo"], img[class*="logo"], img[class*="Logo"]"#,
    )
    .into_iter()
    .filter_map(|img| img.value().attr("alt"))
    .map(str::trim)
    .find(|alt| char_len(alt) > 2 && !alt.to_lowercase().contains("logo"))
    .map(str::to_string)
}

fn cleaned_title(document: &Html) -> Option<String> {
    let title = first(document, "title").map(element_text)?;

    let cleaned = TITLE_PATTERNS.iter().fold(title, |title, pattern| {
        pattern.replace_all(&title, "").into_owned()
    });
    let cleaned = cleaned.trim();

    (char_len(cleaned) > 2).then(|| cleaned.to_string())
}

fn short_heading(document: &Html) -> Option<String> {
    select(document, "h1")
        .into_iter()
        .map(element_text)
        .find(|text| !text.is_empty() && char_len(text) < 50)
}

fn organization_markup(document: &Html) -> Option<String> {
    select(document, r#"[itemtype*="schema.org/Organization"]"#)
        .into_iter()
        .filter_map(|org| select_within(org, r#"[itemprop="name"]"#).into_iter().next())
        .map(element_text)
        .find(|name| !name.is_empty())
}

// Industry

static INDUSTRY_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    INDUSTRIES
        .iter()
        .map(|industry| (*industry, whole_word(&[*industry])))
        .collect()
});

static CATEGORY_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    BROADER_CATEGORIES
        .iter()
        .map(|(category, keywords)| (*category, whole_word(keywords)))
        .collect()
});

pub fn extract_industry(document: &Html) -> String {
    industry_tag(document)
        .or_else(|| {
            let text = industry_text(document);
            match_specific_industry(&text)
                .or_else(|| match_broader_category(&text))
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string())
}

/// First entry of the specific industry list found as a whole word.
pub fn match_specific_industry(text: &str) -> Option<&'static str> {
    INDUSTRY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(industry, _)| *industry)
}

/// Canonical category of the first keyword group with a whole-word hit.
pub fn match_broader_category(text: &str) -> Option<&'static str> {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(category, _)| *category)
}

fn industry_tag(document: &Html) -> Option<String> {
    first(document, INDUSTRY_TAG_SELECTOR)
        .map(element_text)
        .filter(|text| !text.is_empty() && char_len(text) < 50)
}

fn industry_text(document: &Html) -> String {
    let meta = ["description", "keywords"]
        .iter()
        .filter_map(|name| meta_content(document, name));

    let sections = MAIN_CONTENT_SELECTORS
        .iter()
        .filter_map(|css| first(document, css))
        .map(|section| section.text().collect::<String>());

    meta.chain(sections).join(" ")
}

// Achievements

static ACHIEVEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| whole_word(ACHIEVEMENT_WORDS));

pub fn extract_achievements(document: &Html) -> Vec<String> {
    let section_items = ACHIEVEMENT_SECTIONS
        .iter()
        .filter_map(|css| first(document, css))
        .flat_map(|section| select_within(section, "li"))
        .map(element_text)
        .filter(|text| (16..200).contains(&char_len(text)));

    let paragraphs = select(document, "p")
        .into_iter()
        .map(element_text)
        .filter(|text| (21..200).contains(&char_len(text)))
        .filter(|text| ACHIEVEMENT_PATTERN.is_match(text));

    dedup_normalized(section_items.chain(paragraphs))
        .into_iter()
        .map(|achievement| truncate_with_ellipsis(&achievement, MAX_ACHIEVEMENT_LEN))
        .take(MAX_ACHIEVEMENTS_PER_PAGE)
        .collect()
}

// Description

const DESCRIPTION_MATCHERS: &[Matcher] = &[long_meta_description, about_section, body_paragraph];

pub fn extract_description(document: &Html) -> String {
    DESCRIPTION_MATCHERS
        .iter()
        .find_map(|matcher| matcher(document))
        .unwrap_or_default()
}

fn long_meta_description(document: &Html) -> Option<String> {
    meta_content(document, "description").filter(|desc| char_len(desc) > 50)
}

fn about_section(document: &Html) -> Option<String> {
    ABOUT_SECTIONS
        .iter()
        .filter_map(|css| first(document, css))
        .filter_map(|section| {
            let paragraphs = select_within(section, "p");
            if paragraphs.is_empty() {
                return None;
            }

            let combined = paragraphs.into_iter().take(2).map(element_text).join(" ");
            let combined = normalize_whitespace(&combined);

            (char_len(&combined) > 50).then_some(combined)
        })
        .next()
}

fn body_paragraph(document: &Html) -> Option<String> {
    select(document, "body p")
        .into_iter()
        .map(element_text)
        .find(|text| (51..300).contains(&char_len(text)))
}

// Products

pub fn extract_products(document: &Html) -> Vec<String> {
    let section_entries = PRODUCT_SECTIONS
        .iter()
        .filter_map(|css| first(document, css))
        .flat_map(|section| {
            let mut entries = select_within(section, PRODUCT_HEADINGS);
            entries.extend(select_within(section, "li"));
            entries
        })
        .map(element_text)
        .filter(|text| (4..50).contains(&char_len(text)));

    let links = select(document, PRODUCT_LINKS)
        .into_iter()
        .map(element_text)
        .filter(|text| (4..50).contains(&char_len(text)))
        .filter(|text| {
            let lower = text.to_lowercase();
            !NAVIGATION_WORDS.iter().any(|word| lower.contains(word))
        });

    dedup_normalized(section_entries.chain(links))
        .into_iter()
        .filter(|product| !GENERIC_PRODUCT_TERMS.contains(&product.to_lowercase().as_str()))
        .take(MAX_PRODUCTS_PER_PAGE)
        .collect()
}

// Markup helpers

fn whole_word(words: &[&str]) -> Regex {
    let alternatives = words.iter().map(|word| regex::escape(word)).join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).unwrap()
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!("Invalid selector {}: {:?}", css, e);
            None
        }
    }
}

fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => document.select(&selector).collect(),
        None => vec![],
    }
}

fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => element.select(&selector).collect(),
        None => vec![],
    }
}

fn first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    select(document, css).into_iter().next()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    first(document, &format!(r#"meta[name="{}"]"#, name))
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
