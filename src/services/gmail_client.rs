use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::configuration::GmailSettings;

use super::{build_mime_message, DraftError, DraftMessage, DraftSink};

const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DRAFTS_URI: &str = "https://gmail.googleapis.com/gmail/v1/users/me/drafts";
const COMPOSE_SCOPE: &str = "https://www.googleapis.com/auth/gmail.compose";

/// Seconds shaved off the expiry so a token is never used right at the edge.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<u64>,
}

impl StoredToken {
    fn is_expired(&self, now: u64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now + EXPIRY_MARGIN_SECS >= expires_at)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct DraftResponse {
    id: String,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Saves drafts to the authorized user's Gmail mailbox.
pub struct GmailDraftSink {
    http: reqwest::Client,
    settings: GmailSettings,
}

impl GmailDraftSink {
    pub fn new(settings: GmailSettings) -> Self {
        GmailDraftSink {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn authorization_required(&self) -> DraftError {
        match self.authorization_url() {
            Ok(auth_url) => DraftError::AuthorizationRequired { auth_url },
            Err(e) => e,
        }
    }

    async fn load_token(&self) -> Option<StoredToken> {
        let contents = match tokio::fs::read_to_string(&self.settings.token_path).await {
            Ok(contents) => contents,
            Err(e) => {
                log::debug!("No token at {}: {}", self.settings.token_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(e) => {
                log::warn!("Ignoring unreadable token file: {:?}", e);
                None
            }
        }
    }

    async fn save_token(&self, token: &StoredToken) -> Result<(), DraftError> {
        let contents = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.settings.token_path, contents).await?;
        Ok(())
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<StoredToken, DraftError> {
        let mut form = form.to_vec();
        form.push(("client_id", self.settings.client_id.as_str()));
        form.push(("client_secret", self.settings.client_secret.as_str()));

        let response = self.http.post(TOKEN_URI).form(&form).send().await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            log::warn!("Token endpoint rejected the grant: {}", status);
            return Err(self.authorization_required());
        }
        if !status.is_success() {
            return Err(DraftError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(StoredToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token.expires_in.map(|secs| unix_now() + secs),
        })
    }

    /// A usable access token, refreshing an expired one when possible.
    async fn access_token(&self) -> Result<String, DraftError> {
        let token = self.load_token().await.ok_or_else(|| self.authorization_required())?;
        if !token.is_expired(unix_now()) {
            return Ok(token.access_token);
        }

        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| self.authorization_required())?;
        log::info!("Refreshing expired Gmail access token");

        let mut refreshed = self
            .request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await?;
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = token.refresh_token.clone();
        }
        self.save_token(&refreshed).await?;

        Ok(refreshed.access_token)
    }
}

#[async_trait]
impl DraftSink for GmailDraftSink {
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, DraftError> {
        let access_token = self.access_token().await?;
        let raw = URL_SAFE.encode(build_mime_message(message));

        let response = self
            .http
            .post(DRAFTS_URI)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "message": { "raw": raw } }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.authorization_required());
        }
        if !status.is_success() {
            return Err(DraftError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let draft: DraftResponse = response.json().await?;
        log::info!("Created draft {} for {}", draft.id, message.recipient);
        Ok(draft.id)
    }

    fn authorization_url(&self) -> Result<String, DraftError> {
        if self.settings.client_id.is_empty() || self.settings.client_secret.is_empty() {
            return Err(DraftError::NotConfigured);
        }

        let url = Url::parse_with_params(
            AUTH_URI,
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", COMPOSE_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )?;
        Ok(url.to_string())
    }

    async fn authorize(&self, code: &str) -> Result<(), DraftError> {
        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
            ])
            .await?;
        self.save_token(&token).await?;
        log::info!("Stored Gmail token at {}", self.settings.token_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use url::Url;

    use super::*;

    fn settings(token_path: PathBuf) -> GmailSettings {
        GmailSettings {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8000/oauth/callback".to_string(),
            token_path,
            signature_image_path: None,
            attachment_path: None,
        }
    }

    fn temp_token_path() -> PathBuf {
        std::env::temp_dir().join(format!("prospect-token-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn authorization_url_requests_offline_compose_access() {
        let sink = GmailDraftSink::new(settings(temp_token_path()));

        let url = Url::parse(&sink.authorization_url().unwrap()).unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert!(params.contains(&("scope".to_string(), COMPOSE_SCOPE.to_string())));
        assert!(params.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(params.contains(&("access_type".to_string(), "offline".to_string())));
        assert!(params.contains(&("prompt".to_string(), "consent".to_string())));
        assert!(params.contains(&(
            "redirect_uri".to_string(),
            "http://127.0.0.1:8000/oauth/callback".to_string()
        )));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut settings = settings(temp_token_path());
        settings.client_id = String::new();

        assert!(matches!(
            GmailDraftSink::new(settings).authorization_url(),
            Err(DraftError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn missing_token_requires_authorization() {
        let sink = GmailDraftSink::new(settings(temp_token_path()));

        let result = sink
            .create_draft(&DraftMessage::new("jo@glam.com", "Hello", "Body"))
            .await;

        match result {
            Err(DraftError::AuthorizationRequired { auth_url }) => {
                assert!(auth_url.starts_with(AUTH_URI))
            }
            other => panic!("expected authorization error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn expired_token_without_refresh_requires_authorization() {
        let path = temp_token_path();
        let token = StoredToken {
            access_token: "stale".to_string(),
            refresh_token: None,
            expires_at: Some(1),
        };
        tokio::fs::write(&path, serde_json::to_string(&token).unwrap())
            .await
            .unwrap();
        let sink = GmailDraftSink::new(settings(path.clone()));

        let result = sink.access_token().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(result, Err(DraftError::AuthorizationRequired { .. })));
    }

    #[tokio::test]
    async fn fresh_token_is_used_as_is() {
        let path = temp_token_path();
        let sink = GmailDraftSink::new(settings(path.clone()));
        let token = StoredToken {
            access_token: "fresh".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(unix_now() + 3600),
        };
        sink.save_token(&token).await.unwrap();

        let access_token = sink.access_token().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(access_token.unwrap(), "fresh");
    }

    #[test]
    fn expiry_includes_margin() {
        let token = StoredToken {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: Some(1_000),
        };

        assert!(!token.is_expired(900));
        assert!(token.is_expired(950));
        assert!(!StoredToken { expires_at: None, ..token }.is_expired(u64::MAX - EXPIRY_MARGIN_SECS));
    }
}
