use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::{clean_domain, enrich_profile, CompanyScraper, EnrichedProfile, Oracle};

use super::FailureResponse;

#[derive(Deserialize)]
struct ResearchQuery {
    domain: String,
}

#[derive(Serialize)]
struct ResearchResponse {
    success: bool,
    #[serde(flatten)]
    profile: EnrichedProfile,
}

#[get("")]
async fn research(
    scraper: web::Data<CompanyScraper>,
    oracle: web::Data<dyn Oracle>,
    query: web::Query<ResearchQuery>,
) -> HttpResponse {
    let domain = clean_domain(&query.domain);
    if domain.is_empty() {
        return HttpResponse::BadRequest().json(FailureResponse::new("Domain is required"));
    }

    let profile = scraper.extract(&domain).await;
    let profile = enrich_profile(oracle.get_ref(), profile).await;

    HttpResponse::Ok().json(ResearchResponse {
        success: true,
        profile,
    })
}
