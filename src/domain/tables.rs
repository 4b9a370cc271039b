//! Keyword and selector tables consumed by the page signal extractors.
//!
//! Order matters in every table: matchers walk them front to back and stop
//! at the first hit.

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
];

/// Applied in order to the page title, each removing every match.
pub const TITLE_BOILERPLATE: &[&str] = &[
    r"(?i)\s+[-|]\s+.*$",
    r"(?i)\s*[\(\[\{].*?[\)\]\}]",
    r"(?i)Home\s*[-|]?\s*",
    r"(?i)Welcome\s*[-|]?\s*",
    r"(?i)Official\s*[-|]?\s*",
    r"(?i)Website\s*[-|]?\s*",
];

pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main", ".main", "#main", ".content", "#content", "article", ".about", "#about",
];

pub const INDUSTRY_TAG_SELECTOR: &str = ".org-top-card-summary__info-item, .industry-tag";

pub const INDUSTRIES: &[&str] = &[
    "Cosmetics", "Beauty", "Makeup", "Skincare", "Personal Care",
    "Technology", "Software", "IT Services", "SaaS", "Cloud Computing",
    "Healthcare", "Medical", "Pharmaceuticals", "Biotech", "Life Sciences",
    "Finance", "Banking", "Insurance", "Investment", "Wealth Management",
    "Education", "EdTech", "E-learning", "Academic", "Training",
    "Manufacturing", "Production", "Industrial", "Engineering", "Construction",
    "Retail", "E-commerce", "Consumer Goods", "Shopping", "Merchandising",
    "Consulting", "Professional Services", "Business Services", "Advisory",
    "Marketing", "Advertising", "Digital Marketing", "PR", "Communications",
    "Real Estate", "Property", "Housing", "Architecture", "Interior Design",
    "Energy", "Utilities", "Renewable Energy", "Oil & Gas", "Electricity",
    "Automotive", "Transportation", "Mobility", "Vehicles", "Auto Parts",
    "Agriculture", "Farming", "Food Production", "Agritech", "Cultivation",
    "Telecommunications", "Telecom", "Networking", "Internet Services", "Mobile",
    "Media", "Publishing", "Broadcasting", "News", "Digital Media",
    "Entertainment", "Gaming", "Film", "Music", "Arts",
    "Travel", "Tourism", "Hospitality", "Hotels", "Vacation",
    "Food & Beverage", "Restaurants", "Catering", "Food Service", "Culinary",
    "Fashion", "Apparel", "Clothing", "Textiles", "Accessories",
];

pub const BROADER_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beauty & Cosmetics",
        &["beauty", "makeup", "cosmetic", "skin", "hair", "personal care", "salon"],
    ),
    (
        "Technology",
        &["tech", "software", "digital", "online", "platform", "app", "web"],
    ),
    (
        "Healthcare",
        &["health", "medical", "wellness", "therapy", "clinic", "doctor", "patient"],
    ),
    (
        "Finance",
        &["finance", "banking", "money", "investment", "financial", "bank", "loan"],
    ),
    (
        "Retail",
        &["shop", "store", "retail", "buy", "purchase", "product", "consumer"],
    ),
    (
        "Education",
        &["education", "school", "learn", "student", "teach", "training", "course"],
    ),
];

pub const DEFAULT_INDUSTRY: &str = "Technology";

/// Substring keywords matched against the bare domain when no page was readable.
pub const DOMAIN_INDUSTRY_KEYWORDS: &[(&str, &str)] = &[
    ("beauty", "Beauty & Cosmetics"),
    ("cosmetic", "Beauty & Cosmetics"),
    ("makeup", "Beauty & Cosmetics"),
    ("tech", "Technology"),
    ("software", "Software Development"),
    ("digital", "Digital Services"),
    ("health", "Healthcare"),
    ("medical", "Healthcare"),
    ("pharma", "Pharmaceuticals"),
    ("bank", "Banking & Finance"),
    ("finance", "Financial Services"),
    ("invest", "Investment Services"),
    ("edu", "Education"),
    ("learn", "Education & Training"),
    ("school", "Education"),
    ("shop", "Retail"),
    ("store", "Retail"),
    ("food", "Food & Beverage"),
    ("restaurant", "Food & Beverage"),
    ("consult", "Consulting Services"),
    ("advisor", "Advisory Services"),
    ("travel", "Travel & Tourism"),
    ("hotel", "Hospitality"),
    ("media", "Media & Entertainment"),
    ("design", "Design Services"),
    ("creative", "Creative Services"),
    ("law", "Legal Services"),
    ("legal", "Legal Services"),
    ("energy", "Energy"),
    ("power", "Energy"),
    ("construct", "Construction"),
    ("build", "Construction & Engineering"),
    ("real", "Real Estate"),
    ("property", "Real Estate"),
    ("transport", "Transportation & Logistics"),
    ("logistics", "Logistics Services"),
    ("market", "Marketing Services"),
    ("fashion", "Fashion & Apparel"),
    ("cloth", "Fashion & Apparel"),
    ("wear", "Fashion & Apparel"),
    ("auto", "Automotive"),
    ("car", "Automotive"),
    ("insurance", "Insurance Services"),
    ("secure", "Security Services"),
    ("agri", "Agriculture"),
    ("farm", "Agriculture & Farming"),
];

pub const ACHIEVEMENT_SECTIONS: &[&str] = &[
    ".achievements", "#achievements", ".awards", "#awards",
    ".milestones", "#milestones", ".about-us", "#about-us",
    ".highlights", "#highlights", ".features", "#features",
    ".timeline", "#timeline", ".history", "#history",
];

pub const ACHIEVEMENT_WORDS: &[&str] = &[
    "award", "recognition", "honor", "prize", "achievement",
    "success", "milestone", "leader", "innovation", "breakthrough",
    "patent", "launch", "expand", "growth", "increase", "improve",
    "first", "best", "top", "leading", "premier", "excellence",
    "recognized", "renowned", "celebrated", "distinguished",
    "trusted", "certified", "approved", "endorsed", "featured",
];

pub const ABOUT_SECTIONS: &[&str] = &[
    ".about", "#about", ".about-us", "#about-us",
    ".company", "#company", ".description", "#description",
    ".mission", "#mission", ".vision", "#vision",
];

pub const PRODUCT_SECTIONS: &[&str] = &[
    ".products", "#products", ".services", "#services",
    ".offerings", "#offerings", ".solutions", "#solutions",
    ".shop", "#shop", ".catalog", "#catalog",
];

pub const PRODUCT_HEADINGS: &str = "h2, h3, h4, .product-title, .product-name";

pub const PRODUCT_LINKS: &str = r#"a[href*="product"], a[href*="shop"], a[href*="category"]"#;

/// Link text containing any of these is navigation, not a product.
pub const NAVIGATION_WORDS: &[&str] = &["home", "about", "contact", "more"];

pub const GENERIC_PRODUCT_TERMS: &[&str] = &["home", "about us", "contact", "products", "services"];

pub const MAX_ACHIEVEMENTS_PER_PAGE: usize = 3;
pub const MAX_PRODUCTS_PER_PAGE: usize = 5;
