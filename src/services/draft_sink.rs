use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use itertools::Itertools;

pub const SIGNATURE_CONTENT_ID: &str = "signature";

const BULLET: &str = "• ";
const CRLF: &str = "\r\n";
const BASE64_LINE_LEN: usize = 76;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("mailbox authorization required")]
    AuthorizationRequired { auth_url: String },
    #[error("mail client id and secret are not configured")]
    NotConfigured,
    #[error("mail API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("token storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub inline_image: Option<DraftAttachment>,
    pub attachments: Vec<DraftAttachment>,
}

impl DraftMessage {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        DraftMessage {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            html_body: None,
            inline_image: None,
            attachments: vec![],
        }
    }
}

/// Somewhere drafts can be saved for a human to review and send.
#[async_trait]
pub trait DraftSink: Send + Sync {
    /// Stores the draft and returns its id.
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, DraftError>;

    fn authorization_url(&self) -> Result<String, DraftError>;

    /// Completes authorization with the code handed to the redirect URI.
    async fn authorize(&self, code: &str) -> Result<(), DraftError>;
}

/// Files added to every outgoing draft.
#[derive(Debug, Clone, Default)]
pub struct DraftAssets {
    pub signature_image: Option<PathBuf>,
    pub attachment: Option<PathBuf>,
}

impl DraftAssets {
    pub fn new(signature_image: Option<PathBuf>, attachment: Option<PathBuf>) -> Self {
        DraftAssets {
            signature_image,
            attachment,
        }
    }

    /// Adds the html rendition, the inline signature and the attachment.
    /// Missing files are skipped.
    pub async fn dress(&self, mut message: DraftMessage) -> DraftMessage {
        if let Some(path) = &self.signature_image {
            message.inline_image = load_attachment(path).await;
        }
        if let Some(path) = &self.attachment {
            message.attachments.extend(load_attachment(path).await);
        }

        message.html_body = Some(render_html_body(&message.body, message.inline_image.is_some()));
        message
    }
}

pub async fn load_attachment(path: &Path) -> Option<DraftAttachment> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Skipping attachment {}: {}", path.display(), e);
            return None;
        }
    };
    let filename = path.file_name()?.to_string_lossy().to_string();

    Some(DraftAttachment {
        content_type: content_type_for(&filename).to_string(),
        filename,
        bytes,
    })
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// `**bold**` spans become `<strong>`; unbalanced markers are closed at the end.
fn embolden(text: &str) -> String {
    text.split("**")
        .enumerate()
        .map(|(index, part)| match index % 2 {
            1 => format!("<strong>{}</strong>", part),
            _ => part.to_string(),
        })
        .collect()
}

/// Html rendition of a plain-text body: bold spans, `• ` bullet lists and
/// line breaks, followed by the signature image when there is one.
pub fn render_html_body(body: &str, with_signature: bool) -> String {
    let body = embolden(body);
    let content = body
        .split('\n')
        .chunk_by(|line| line.starts_with(BULLET))
        .into_iter()
        .map(|(is_list, mut lines)| match is_list {
            true => format!(
                "<ul>{}</ul>",
                lines
                    .map(|line| format!("<li>{}</li>", line.trim_start_matches(BULLET).trim()))
                    .join("")
            ),
            false => lines.join("<br>"),
        })
        .join("");

    let signature = match with_signature {
        true => format!(
            "<br><br>\n<img src=\"cid:{}\" alt=\"Signature\" style=\"max-width: 200px;\">\n",
            SIGNATURE_CONTENT_ID
        ),
        false => String::new(),
    };

    format!(
        "<html>\n<body style=\"font-family: Arial, sans-serif; line-height: 1.6;\">\n{}\n{}</body>\n</html>\n",
        content, signature
    )
}

fn wrapped_base64(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .chunks(BASE64_LINE_LEN)
        .into_iter()
        .map(|line| line.collect::<String>())
        .join(CRLF)
}

fn encode_header(value: &str) -> String {
    match value.is_ascii() {
        true => value.to_string(),
        false => format!("=?utf-8?B?{}?=", STANDARD.encode(value)),
    }
}

fn new_boundary() -> String {
    format!("=_{}", uuid::Uuid::new_v4().simple())
}

fn text_part(content_type: &str, text: &str) -> String {
    [
        format!("Content-Type: {}; charset=\"utf-8\"", content_type),
        "Content-Transfer-Encoding: base64".to_string(),
        String::new(),
        wrapped_base64(text.as_bytes()),
    ]
    .join(CRLF)
}

fn binary_part(attachment: &DraftAttachment, disposition: &str, content_id: Option<&str>) -> String {
    let mut headers = vec![
        format!("Content-Type: {}", attachment.content_type),
        "Content-Transfer-Encoding: base64".to_string(),
    ];
    if let Some(content_id) = content_id {
        headers.push(format!("Content-ID: <{}>", content_id));
    }
    headers.push(match disposition {
        "inline" => "Content-Disposition: inline".to_string(),
        _ => format!(
            "Content-Disposition: attachment; filename=\"{}\"",
            attachment.filename.replace('"', "")
        ),
    });

    [headers.join(CRLF), String::new(), wrapped_base64(&attachment.bytes)].join(CRLF)
}

fn multipart(boundary: &str, parts: &[String]) -> String {
    let mut body = parts
        .iter()
        .map(|part| format!("--{}{}{}", boundary, CRLF, part))
        .join(CRLF);
    body.push_str(&format!("{}--{}--", CRLF, boundary));
    body
}

/// RFC 822 message: multipart/mixed holding a text/html alternative, the
/// inline signature image and any attachments.
pub fn build_mime_message(message: &DraftMessage) -> String {
    let mixed = new_boundary();
    let alternative = new_boundary();

    let html = message
        .html_body
        .clone()
        .unwrap_or_else(|| render_html_body(&message.body, message.inline_image.is_some()));
    let alternatives = [text_part("text/plain", &message.body), text_part("text/html", &html)];

    let mut parts = vec![format!(
        "Content-Type: multipart/alternative; boundary=\"{}\"{}{}{}",
        alternative,
        CRLF,
        CRLF,
        multipart(&alternative, &alternatives)
    )];
    if let Some(image) = &message.inline_image {
        parts.push(binary_part(image, "inline", Some(SIGNATURE_CONTENT_ID)));
    }
    parts.extend(
        message
            .attachments
            .iter()
            .map(|attachment| binary_part(attachment, "attachment", None)),
    );

    let headers = [
        format!("To: {}", message.recipient),
        format!("Subject: {}", encode_header(&message.subject)),
        "MIME-Version: 1.0".to_string(),
        format!("Content-Type: multipart/mixed; boundary=\"{}\"", mixed),
    ];

    format!(
        "{}{}{}{}{}",
        headers.join(CRLF),
        CRLF,
        CRLF,
        multipart(&mixed, &parts),
        CRLF
    )
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};

    use super::*;

    fn pdf() -> DraftAttachment {
        DraftAttachment {
            filename: "Brochure.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4 brochure".to_vec(),
        }
    }

    #[test]
    fn bold_markers_become_strong() {
        assert_eq!(
            embolden("We **ship** fast and **scale**"),
            "We <strong>ship</strong> fast and <strong>scale</strong>"
        );
        assert_eq!(embolden("plain"), "plain");
    }

    #[test]
    fn bullets_become_a_list() {
        let html = render_html_body("We offer:\n• Design\n• Development\nThanks", false);

        assert!(html.contains("We offer:<ul><li>Design</li><li>Development</li></ul>Thanks"));
        assert!(!html.contains("cid:signature"));
    }

    #[test]
    fn newlines_become_breaks_and_signature_is_referenced() {
        let html = render_html_body("Hello\n\nBye", true);

        assert!(html.contains("Hello<br><br>Bye"));
        assert!(html.contains("<img src=\"cid:signature\""));
        assert!(html.starts_with("<html>"));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("sig.PNG"), "image/png");
        assert_eq!(content_type_for("deck.pdf"), "application/pdf");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn mime_message_nests_parts() {
        let mut message = DraftMessage::new("jo@glam.com", "Hello Glam", "Hi **Jo**");
        message.inline_image = Some(DraftAttachment {
            filename: "signature.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        });
        message.attachments.push(pdf());

        let raw = build_mime_message(&message);

        assert!(raw.starts_with("To: jo@glam.com\r\nSubject: Hello Glam\r\nMIME-Version: 1.0\r\n"));
        assert!(raw.contains("Content-Type: multipart/mixed; boundary="));
        assert!(raw.contains("Content-Type: multipart/alternative; boundary="));
        assert!(raw.contains("Content-Type: text/plain; charset=\"utf-8\""));
        assert!(raw.contains("Content-Type: text/html; charset=\"utf-8\""));
        assert!(raw.contains("Content-ID: <signature>\r\nContent-Disposition: inline"));
        assert!(raw.contains("Content-Disposition: attachment; filename=\"Brochure.pdf\""));
        assert!(raw.contains(&STANDARD.encode(b"%PDF-1.4 brochure")));
        assert!(raw.contains(&STANDARD.encode("Hi **Jo**")));
    }

    #[test]
    fn non_ascii_subject_is_encoded() {
        let raw = build_mime_message(&DraftMessage::new("jo@glam.com", "Café idea", "Body"));

        assert!(raw.contains(&format!("Subject: =?utf-8?B?{}?=", STANDARD.encode("Café idea"))));
    }

    #[test]
    fn long_payloads_are_wrapped() {
        let wrapped = wrapped_base64(&[7u8; 200]);

        assert!(wrapped.split(CRLF).all(|line| line.len() <= BASE64_LINE_LEN));
        assert_eq!(wrapped.replace(CRLF, ""), STANDARD.encode([7u8; 200]));
    }

    #[tokio::test]
    async fn dress_skips_missing_files() {
        let assets = DraftAssets::new(
            Some(PathBuf::from("/nonexistent/signature.png")),
            Some(PathBuf::from("/nonexistent/brochure.pdf")),
        );

        let message = assets.dress(DraftMessage::new("jo@glam.com", "Subject", "Body")).await;

        assert_eq!(message.inline_image, None);
        assert!(message.attachments.is_empty());
        assert!(message.html_body.unwrap().contains("Body"));
    }

    #[tokio::test]
    async fn dress_attaches_existing_files() {
        let path = std::env::temp_dir().join(format!("prospect-{}.pdf", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"%PDF").await.unwrap();
        let assets = DraftAssets::new(None, Some(path.clone()));

        let message = assets.dress(DraftMessage::new("jo@glam.com", "Subject", "Body")).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].content_type, "application/pdf");
        assert_eq!(message.attachments[0].bytes, b"%PDF".to_vec());
    }
}
