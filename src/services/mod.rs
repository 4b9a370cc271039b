pub mod company_enricher;
pub mod company_scraper;
pub mod draft_sink;
pub mod email_refiner;
pub mod gmail_client;
pub mod openai_client;
pub mod page_fetcher;
pub mod placeholder_writer;

pub use company_enricher::*;
pub use company_scraper::*;
pub use draft_sink::*;
pub use email_refiner::*;
pub use gmail_client::*;
pub use openai_client::*;
pub use page_fetcher::*;
pub use placeholder_writer::*;
