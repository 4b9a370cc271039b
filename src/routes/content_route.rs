use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::{fill_placeholder, Oracle};

#[derive(Deserialize)]
struct GenerateContentBody {
    placeholder: String,
    recipient_email: String,
    #[serde(default)]
    template_name: String,
}

#[derive(Serialize)]
struct GenerateContentResponse {
    success: bool,
    content: String,
}

#[post("")]
async fn generate_content(
    oracle: web::Data<dyn Oracle>,
    body: web::Json<GenerateContentBody>,
) -> HttpResponse {
    log::info!(
        "Generating {:?} for {} ({})",
        body.placeholder,
        body.recipient_email,
        body.template_name
    );
    let content = fill_placeholder(oracle.get_ref(), &body.placeholder, &body.recipient_email).await;

    HttpResponse::Ok().json(GenerateContentResponse {
        success: true,
        content,
    })
}
