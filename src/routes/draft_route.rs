use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::{DraftAssets, DraftError, DraftMessage, DraftSink};

use super::FailureResponse;

#[derive(Deserialize)]
struct CreateDraftBody {
    recipient_email: String,
    subject: String,
    body: String,
}

#[derive(Serialize)]
struct CreateDraftResponse {
    success: bool,
    draft_id: String,
}

#[derive(Serialize)]
struct AuthRequiredResponse {
    success: bool,
    auth_required: bool,
    auth_url: String,
}

#[post("")]
async fn create_draft(
    sink: web::Data<dyn DraftSink>,
    assets: web::Data<DraftAssets>,
    body: web::Json<CreateDraftBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let message = assets
        .dress(DraftMessage::new(body.recipient_email, body.subject, body.body))
        .await;

    match sink.create_draft(&message).await {
        Ok(draft_id) => HttpResponse::Ok().json(CreateDraftResponse {
            success: true,
            draft_id,
        }),
        Err(DraftError::AuthorizationRequired { auth_url }) => {
            HttpResponse::Ok().json(AuthRequiredResponse {
                success: false,
                auth_required: true,
                auth_url,
            })
        }
        Err(e) => {
            log::error!("Failed to create draft: {:?}", e);
            HttpResponse::InternalServerError()
                .json(FailureResponse::new(format!("Failed to create draft: {}", e)))
        }
    }
}

#[derive(Deserialize)]
struct OauthCallbackQuery {
    code: String,
}

#[get("/callback")]
async fn oauth_callback(
    sink: web::Data<dyn DraftSink>,
    query: web::Query<OauthCallbackQuery>,
) -> HttpResponse {
    match sink.authorize(&query.code).await {
        Ok(()) => HttpResponse::Ok().body("Authorization complete, you can close this window."),
        Err(e) => {
            log::error!("Authorization callback failed: {:?}", e);
            HttpResponse::BadRequest().json(FailureResponse::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::{http::StatusCode, test, web, App};
    use async_trait::async_trait;

    use super::{create_draft, oauth_callback};
    use crate::services::{DraftAssets, DraftError, DraftMessage, DraftSink};

    #[derive(Default)]
    struct MemorySink {
        authorized: Mutex<bool>,
        drafts: Mutex<Vec<DraftMessage>>,
    }

    #[async_trait]
    impl DraftSink for MemorySink {
        async fn create_draft(&self, message: &DraftMessage) -> Result<String, DraftError> {
            if !*self.authorized.lock().unwrap() {
                return Err(DraftError::AuthorizationRequired {
                    auth_url: self.authorization_url()?,
                });
            }
            let mut drafts = self.drafts.lock().unwrap();
            drafts.push(message.clone());
            Ok(format!("draft-{}", drafts.len()))
        }

        fn authorization_url(&self) -> Result<String, DraftError> {
            Ok("https://accounts.example/auth".to_string())
        }

        async fn authorize(&self, code: &str) -> Result<(), DraftError> {
            match code {
                "good" => {
                    *self.authorized.lock().unwrap() = true;
                    Ok(())
                }
                _ => Err(DraftError::Api {
                    status: 400,
                    message: "invalid_grant".to_string(),
                }),
            }
        }
    }

    fn draft_request() -> test::TestRequest {
        test::TestRequest::post()
            .uri("/create-draft")
            .set_json(serde_json::json!({
                "recipient_email": "jo@glam.com",
                "subject": "Hello Glam",
                "body": "Hi Jo,\n• Design\n• Development"
            }))
    }

    #[actix_web::test]
    async fn unauthorized_sink_asks_for_consent_then_saves_drafts() {
        let memory = Arc::new(MemorySink::default());
        let sink: Arc<dyn DraftSink> = memory.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sink))
                .app_data(web::Data::new(DraftAssets::default()))
                .service(web::scope("/create-draft").service(create_draft))
                .service(web::scope("/oauth").service(oauth_callback)),
        )
        .await;

        let body: serde_json::Value =
            test::call_and_read_body_json(&app, draft_request().to_request()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["auth_required"], true);
        assert_eq!(body["auth_url"], "https://accounts.example/auth");

        let bad = test::TestRequest::get().uri("/oauth/callback?code=bad").to_request();
        assert_eq!(test::call_service(&app, bad).await.status(), StatusCode::BAD_REQUEST);

        let good = test::TestRequest::get().uri("/oauth/callback?code=good").to_request();
        assert_eq!(test::call_service(&app, good).await.status(), StatusCode::OK);

        let body: serde_json::Value =
            test::call_and_read_body_json(&app, draft_request().to_request()).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["draft_id"], "draft-1");

        let drafts = memory.drafts.lock().unwrap();
        let html = drafts[0].html_body.as_deref().unwrap();
        assert!(html.contains("<ul><li>Design</li><li>Development</li></ul>"));
    }
}
