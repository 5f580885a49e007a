use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use crate::{MailError, Message};

const BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// A thin Gmail REST client over a ready OAuth bearer token.
///
/// Token acquisition (consent flow, refresh) is the caller's problem; this
/// client only searches, fetches and batch-modifies messages.
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListLabelsResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageId>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageId {
    id: String,
}

impl GmailClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            token: token.into(),
            user: "me".to_string(),
        }
    }

    /// Overrides the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Lists all labels of the account.
    pub async fn list_labels(&self) -> Result<Vec<Label>, MailError> {
        let url = format!("{}/users/{}/labels", self.base_url, self.user);
        let resp: ListLabelsResponse = self.get_json(&url, &[]).await?;
        Ok(resp.labels)
    }

    /// Searches for message ids matching a Gmail query, following pagination.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, MailError> {
        let url = format!("{}/users/{}/messages", self.base_url, self.user);
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = vec![("q", query)];
            if let Some(ref token) = page_token {
                params.push(("pageToken", token.as_str()));
            }
            let resp: ListMessagesResponse = self.get_json(&url, &params).await?;
            ids.extend(resp.messages.into_iter().map(|m| m.id));
            match resp.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(ids)
    }

    /// Searches for matching messages and fetches their full payloads with at
    /// most `concurrency` requests in flight. Individual fetch failures are
    /// logged and skipped, like every other per-message error downstream.
    /// Results come back in search-result order, not completion order, so the
    /// aggregate's refs are stable across runs.
    pub async fn fetch_messages(
        &self,
        query: &str,
        concurrency: usize,
    ) -> Result<Vec<Message>, MailError> {
        tracing::info!(query, "searching messages");
        let ids = self.search(query).await?;
        tracing::info!(count = ids.len(), "messages found, fetching bodies");

        let bar = ProgressBar::new(ids.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len}") {
            bar.set_style(style);
        }

        let mut fetched = Vec::with_capacity(ids.len());
        let mut fetches = futures_util::stream::iter(ids.iter().enumerate().map(|(i, id)| {
            let bar = bar.clone();
            async move {
                let res = self.get_message(id).await;
                bar.inc(1);
                (i, id, res)
            }
        }))
        .buffer_unordered(concurrency.max(1));

        while let Some((i, id, res)) = fetches.next().await {
            match res {
                Ok(msg) => fetched.push((i, msg)),
                Err(e) => tracing::warn!(id = %id, error = %e, "failed to fetch message"),
            }
        }
        bar.finish_and_clear();
        Ok(in_search_order(fetched))
    }

    /// Removes the UNREAD label from all given messages in one batch call.
    pub async fn mark_read(&self, messages: &[Message]) -> Result<(), MailError> {
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let url = format!("{}/users/{}/messages/batchModify", self.base_url, self.user);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "ids": ids, "removeLabelIds": ["UNREAD"] }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get_message(&self, id: &str) -> Result<Message, MailError> {
        let url = format!("{}/users/{}/messages/{}", self.base_url, self.user, id);
        self.get_json(&url, &[("format", "full")]).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MailError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

/// Restores the search-result order of concurrently fetched messages. The
/// indices are positions in the id list the search returned.
fn in_search_order(mut fetched: Vec<(usize, Message)>) -> Vec<Message> {
    fetched.sort_by_key(|(i, _)| *i);
    fetched.into_iter().map(|(_, m)| m).collect()
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, MailError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(MailError::Api {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_wire_shape() {
        let resp: ListMessagesResponse = serde_json::from_str(
            r#"{"messages": [{"id": "a"}, {"id": "b"}], "nextPageToken": "t", "resultSizeEstimate": 2}"#,
        )
        .unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.next_page_token.as_deref(), Some("t"));
    }

    #[test]
    fn fetched_messages_come_back_in_search_order() {
        let msg = |id: &str| Message {
            id: id.to_string(),
            ..Message::default()
        };
        // completion order scrambled, with one fetch (index 2) failed and gone
        let fetched = vec![(3, msg("d")), (0, msg("a")), (1, msg("b"))];

        let ordered = in_search_order(fetched);
        let ids: Vec<&str> = ordered.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
    }

    #[test]
    fn list_response_last_page() {
        let resp: ListMessagesResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(resp.messages.is_empty());
        assert!(resp.next_page_token.is_none());
    }
}
