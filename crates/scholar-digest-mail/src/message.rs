use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::{Deserialize, Serialize};

use crate::MailError;

/// A Gmail message in the `users.messages.get` (format=full) wire shape.
/// The same shape is read back from JSON fixture files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    pub label_ids: Vec<String>,
    pub snippet: String,
    pub payload: Option<MessagePart>,
}

/// One node of the MIME part tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePart {
    pub mime_type: String,
    pub headers: Vec<Header>,
    pub body: Option<PartBody>,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartBody {
    pub data: String,
    pub attachment_id: String,
    pub size: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Message {
    /// The Subject header, or "" when the message has none.
    pub fn subject(&self) -> &str {
        self.payload
            .as_ref()
            .map(|p| p.header("Subject"))
            .unwrap_or("")
    }

    /// The decoded `text/html` body of the message.
    pub fn html_body(&self) -> Result<Vec<u8>, MailError> {
        let part = self
            .payload
            .as_ref()
            .and_then(|p| p.find_part("text/html"))
            .ok_or_else(|| MailError::NoHtmlBody(self.id.clone()))?;
        let data = part.body.as_ref().map(|b| b.data.as_str()).unwrap_or("");
        decode_body(data)
    }

    /// Builds a single-part message with the given subject and HTML body.
    /// Handy for tests and offline experiments.
    pub fn with_html(id: impl Into<String>, subject: impl Into<String>, html: &str) -> Self {
        Message {
            id: id.into(),
            payload: Some(MessagePart {
                mime_type: "text/html".to_string(),
                headers: vec![Header {
                    name: "Subject".to_string(),
                    value: subject.into(),
                }],
                body: Some(PartBody {
                    data: STANDARD.encode(html),
                    size: html.len() as i64,
                    ..PartBody::default()
                }),
                ..MessagePart::default()
            }),
            ..Message::default()
        }
    }
}

impl MessagePart {
    /// Value of the first header with the given name, or "".
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
            .unwrap_or("")
    }

    /// Depth-first search of the part tree for the first part whose mime type
    /// starts with `mime_type` and carries inline body data. Attachment-only
    /// parts are skipped.
    fn find_part(&self, mime_type: &str) -> Option<&MessagePart> {
        for p in &self.parts {
            if let Some(found) = p.find_part(mime_type) {
                return Some(found);
            }
        }
        if self.mime_type.starts_with(mime_type)
            && self
                .body
                .as_ref()
                .is_some_and(|b| !b.data.is_empty() && b.attachment_id.is_empty())
        {
            return Some(self);
        }
        None
    }
}

/// Gmail serves body data as standard or URL-safe base64 depending on the
/// endpoint; try both.
fn decode_body(data: &str) -> Result<Vec<u8>, MailError> {
    match STANDARD.decode(data) {
        Ok(b) => Ok(b),
        Err(_) => Ok(URL_SAFE.decode(data)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_header_lookup() {
        let msg = Message::with_html("m1", "\"deep learning\" - new articles", "<p>hi</p>");
        assert_eq!(msg.subject(), "\"deep learning\" - new articles");
    }

    #[test]
    fn subject_empty_without_payload() {
        let msg = Message::default();
        assert_eq!(msg.subject(), "");
    }

    #[test]
    fn html_body_single_part() {
        let msg = Message::with_html("m1", "s", "<h3>title</h3>");
        assert_eq!(msg.html_body().unwrap(), b"<h3>title</h3>");
    }

    #[test]
    fn html_body_nested_multipart() {
        let html = "<h3><a href=\"x\">t</a></h3>";
        let msg = Message {
            id: "m2".to_string(),
            payload: Some(MessagePart {
                mime_type: "multipart/alternative".to_string(),
                parts: vec![
                    MessagePart {
                        mime_type: "text/plain".to_string(),
                        body: Some(PartBody {
                            data: STANDARD.encode("plain"),
                            ..PartBody::default()
                        }),
                        ..MessagePart::default()
                    },
                    MessagePart {
                        mime_type: "text/html; charset=UTF-8".to_string(),
                        body: Some(PartBody {
                            data: STANDARD.encode(html),
                            ..PartBody::default()
                        }),
                        ..MessagePart::default()
                    },
                ],
                ..MessagePart::default()
            }),
            ..Message::default()
        };
        assert_eq!(msg.html_body().unwrap(), html.as_bytes());
    }

    #[test]
    fn html_body_url_safe_base64() {
        let html = "<div>??~</div>"; // encodes to bytes that differ between alphabets
        let mut msg = Message::with_html("m3", "s", html);
        if let Some(part) = msg.payload.as_mut() {
            if let Some(body) = part.body.as_mut() {
                body.data = URL_SAFE.encode(html);
            }
        }
        assert_eq!(msg.html_body().unwrap(), html.as_bytes());
    }

    #[test]
    fn html_body_missing_is_an_error() {
        let msg = Message {
            id: "m4".to_string(),
            payload: Some(MessagePart {
                mime_type: "text/plain".to_string(),
                body: Some(PartBody {
                    data: STANDARD.encode("plain only"),
                    ..PartBody::default()
                }),
                ..MessagePart::default()
            }),
            ..Message::default()
        };
        assert!(matches!(msg.html_body(), Err(MailError::NoHtmlBody(_))));
    }

    #[test]
    fn attachment_parts_are_skipped() {
        let msg = Message {
            id: "m5".to_string(),
            payload: Some(MessagePart {
                mime_type: "text/html".to_string(),
                body: Some(PartBody {
                    data: "ignored".to_string(),
                    attachment_id: "att-1".to_string(),
                    ..PartBody::default()
                }),
                ..MessagePart::default()
            }),
            ..Message::default()
        };
        assert!(msg.html_body().is_err());
    }
}
