use std::{net::TcpListener, sync::Arc};

use env_logger::Env;
use prospect::{
    configuration::get_configuration,
    services::{CompanyScraper, DraftAssets, GmailDraftSink, HttpPageFetcher, OpenaiClient},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let fetcher = HttpPageFetcher::new(configuration.scraper.request_timeout());
    let scraper = CompanyScraper::new(Arc::new(fetcher), configuration.scraper.delay_range());
    let oracle = OpenaiClient::new(configuration.api_keys.openai, configuration.oracle.model);
    let draft_assets = DraftAssets::new(
        configuration.gmail.signature_image_path.clone(),
        configuration.gmail.attachment_path.clone(),
    );
    let draft_sink = GmailDraftSink::new(configuration.gmail);

    log::info!("Listening on {}", listener.local_addr()?);

    run(
        listener,
        scraper,
        Arc::new(oracle),
        Arc::new(draft_sink),
        draft_assets,
    )?
    .await
}
