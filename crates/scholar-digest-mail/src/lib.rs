use thiserror::Error;

pub mod fetch;
pub mod fixtures;
pub mod message;
pub mod subject;

pub use fetch::{GmailClient, Label};
pub use message::{Header, Message, MessagePart, PartBody};
pub use subject::normalize_and_split;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("message {0} has no text/html body part")]
    NoHtmlBody(String),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gmail API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("fixture read error: {0}")]
    FixtureIo(#[from] std::io::Error),
    #[error("fixture parse error: {0}")]
    FixtureJson(#[from] serde_json::Error),
}
