//! Capture server REST client
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic; the UI runs every
//! call on a background executor and hands the result back to its own thread.

use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body};

use super::ApiError;
use crate::models::{
    Attachment, EmailPage, FilterSyntaxEntry, Mailbox, MessageId, RelayData, RelayRequest,
};
use crate::search::SuggestionSource;

/// Upper bound for a single body payload (raw sources can be large)
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// REST client for the capture server API
#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:8080")
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// List one page of messages matching `query`
    pub fn list_emails(&self, query: &str, page: u32) -> Result<EmailPage, ApiError> {
        let url = self.url("/emails/");
        debug!("Listing emails (query={:?}, page={})", query, page);
        let result = self
            .agent
            .get(&url)
            .query("query", query)
            .query("page", page.to_string())
            .call();
        read_json(&url, check(&url, result)?)
    }

    /// Fetch the text of one body version
    pub fn body(&self, id: &MessageId, version: &str) -> Result<String, ApiError> {
        let url = self.url(&format!(
            "/emails/{}/body/{}",
            urlencoding::encode(id.as_str()),
            urlencoding::encode(version)
        ));
        let mut response = check(&url, self.agent.get(&url).call())?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| ApiError::Decode {
                url,
                reason: e.to_string(),
            })
    }

    /// List attachments of a message
    pub fn attachments(&self, id: &MessageId) -> Result<Vec<Attachment>, ApiError> {
        let url = self.url(&format!(
            "/emails/{}/attachments/",
            urlencoding::encode(id.as_str())
        ));
        let attachments: Option<Vec<Attachment>> =
            read_json(&url, check(&url, self.agent.get(&url).call())?)?;
        Ok(attachments.unwrap_or_default())
    }

    /// Download URL for an attachment's content
    pub fn attachment_content_url(&self, id: &MessageId, attachment_id: &str) -> String {
        self.url(&format!(
            "/emails/{}/attachments/{}/content",
            urlencoding::encode(id.as_str()),
            urlencoding::encode(attachment_id)
        ))
    }

    /// Completion candidates for a partial filter token, in server order
    pub fn filter_suggestions(&self, term: &str) -> Result<Vec<String>, ApiError> {
        let url = self.url("/filters/suggestions");
        let result = self.agent.get(&url).query("term", term).call();
        let candidates: Option<Vec<String>> = read_json(&url, check(&url, result)?)?;
        Ok(candidates.unwrap_or_default())
    }

    /// Full filter syntax help table
    pub fn filter_syntax(&self) -> Result<Vec<FilterSyntaxEntry>, ApiError> {
        let url = self.url("/filters/suggestions");
        let entries: Option<Vec<FilterSyntaxEntry>> =
            read_json(&url, check(&url, self.agent.get(&url).call())?)?;
        Ok(entries.unwrap_or_default())
    }

    /// List mailboxes known to the server
    pub fn mailboxes(&self) -> Result<Vec<Mailbox>, ApiError> {
        let url = self.url("/mailboxes");
        let mailboxes: Option<Vec<Mailbox>> =
            read_json(&url, check(&url, self.agent.get(&url).call())?)?;
        Ok(mailboxes.unwrap_or_default())
    }

    /// Delete a single message
    pub fn delete_email(&self, id: &MessageId) -> Result<(), ApiError> {
        let url = self.url(&format!("/emails/{}", urlencoding::encode(id.as_str())));
        check(&url, self.agent.delete(&url).call())?;
        Ok(())
    }

    /// Delete every captured message
    pub fn delete_all(&self) -> Result<(), ApiError> {
        let url = self.url("/emails/");
        check(&url, self.agent.delete(&url).call())?;
        Ok(())
    }

    /// Defaults for the relay dialog
    pub fn relay_data(&self, id: &MessageId) -> Result<RelayData, ApiError> {
        let url = self.url(&format!(
            "/emails/{}/relay",
            urlencoding::encode(id.as_str())
        ));
        read_json(&url, check(&url, self.agent.get(&url).call())?)
    }

    /// Release a message through a configured relay
    pub fn relay(&self, id: &MessageId, request: &RelayRequest) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/emails/{}/relay",
            urlencoding::encode(id.as_str())
        ));
        check(&url, self.agent.post(&url).send_json(request))?;
        Ok(())
    }
}

impl SuggestionSource for ApiClient {
    fn lookup(&self, term: &str) -> Result<Vec<String>, ApiError> {
        self.filter_suggestions(term)
    }
}

/// Turn transport failures and non-2xx statuses into `ApiError`
fn check(
    url: &str,
    result: Result<Response<Body>, ureq::Error>,
) -> Result<Response<Body>, ApiError> {
    let mut response = result.map_err(|e| ApiError::Transport {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.body_mut().read_to_string().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn read_json<T: DeserializeOwned>(url: &str, mut response: Response<Body>) -> Result<T, ApiError> {
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
