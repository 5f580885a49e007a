use std::path::Path;

use crate::{MailError, Message};

/// Reads Gmail messages from a JSON fixture file (an array of messages in
/// the API wire shape) instead of fetching them from the API.
pub fn read_messages(path: &Path) -> Result<Vec<Message>, MailError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
