use actix_web::{post, web, HttpResponse};
use serde::Serialize;

use crate::services::{refine_email, Oracle, RefineError, RefineRequest};

use super::FailureResponse;

#[derive(Serialize)]
struct RefineResponse {
    success: bool,
    subject: String,
    body: String,
}

#[post("")]
async fn refine(oracle: web::Data<dyn Oracle>, body: web::Json<RefineRequest>) -> HttpResponse {
    match refine_email(oracle.get_ref(), &body).await {
        Ok(refined) => HttpResponse::Ok().json(RefineResponse {
            success: true,
            subject: refined.subject,
            body: refined.body,
        }),
        Err(e @ (RefineError::EmptyEmail | RefineError::BodyTooShort)) => {
            HttpResponse::BadRequest().json(FailureResponse::new(e))
        }
        Err(e) => {
            log::error!("Email refinement failed: {:?}", e);
            HttpResponse::InternalServerError().json(FailureResponse::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App};
    use async_trait::async_trait;

    use super::refine;
    use crate::services::{CompletionRequest, Oracle};

    struct UnusedOracle;

    #[async_trait]
    impl Oracle for UnusedOracle {
        async fn complete(&self, _request: CompletionRequest) -> anyhow::Result<String> {
            unreachable!("validation happens before the model is asked")
        }
    }

    #[actix_web::test]
    async fn short_body_is_a_bad_request() {
        let oracle: Arc<dyn Oracle> = Arc::new(UnusedOracle);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(oracle))
                .service(web::scope("/refine-email").service(refine)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/refine-email")
            .set_json(serde_json::json!({
                "subject": "Hello",
                "body": "Too short.",
                "recipient_email": "jo@glam.com"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "email body is too short for meaningful refinement"
        );
    }
}
