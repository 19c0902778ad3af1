//! Release/relay dialog payloads

use serde::{Deserialize, Serialize};

use super::message::{EmailAddress, null_as_default};

/// Defaults offered by the server when opening the relay dialog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayData {
    pub sender: EmailAddress,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipients: Vec<EmailAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relay_names: Vec<String>,
}

/// Body of `POST /api/emails/{id}/relay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub relay_name: String,
    pub sender: String,
    pub recipients: Vec<String>,
}
