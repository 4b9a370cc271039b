use std::{net::TcpListener, sync::Arc};

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{content_route, default_route, draft_route, refine_route, research_route},
    services::{CompanyScraper, DraftAssets, DraftSink, Oracle},
};

pub fn run(
    listener: TcpListener,
    scraper: CompanyScraper,
    oracle: Arc<dyn Oracle>,
    draft_sink: Arc<dyn DraftSink>,
    draft_assets: DraftAssets,
) -> Result<Server, std::io::Error> {
    let scraper = web::Data::new(scraper);
    let oracle: web::Data<dyn Oracle> = web::Data::from(oracle);
    let draft_sink: web::Data<dyn DraftSink> = web::Data::from(draft_sink);
    let draft_assets = web::Data::new(draft_assets);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(web::scope("/research").service(research_route::research))
            .service(web::scope("/generate-content").service(content_route::generate_content))
            .service(web::scope("/refine-email").service(refine_route::refine))
            .service(web::scope("/create-draft").service(draft_route::create_draft))
            .service(web::scope("/oauth").service(draft_route::oauth_callback))
            .app_data(scraper.clone())
            .app_data(oracle.clone())
            .app_data(draft_sink.clone())
            .app_data(draft_assets.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
