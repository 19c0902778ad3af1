//! Captured message header as returned by the listing endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a captured message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An email address with optional display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe"), empty when absent
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Email address (e.g., "john@example.com")
    pub address: String,
}

impl EmailAddress {
    /// Create a new email address with just the address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            address: address.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Short label for list rows: the name when present, otherwise the address
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.address
        } else {
            &self.name
        }
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        if self.name.trim().is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.name, self.address)
        }
    }
}

/// Join a list of addresses for a header line
pub fn display_addresses(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(EmailAddress::display)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A captured message as listed by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: EmailAddress,
    #[serde(rename = "tos", alias = "to", default, deserialize_with = "null_as_default")]
    pub to: Vec<EmailAddress>,
    #[serde(rename = "ccs", alias = "cc", default, deserialize_with = "null_as_default")]
    pub cc: Vec<EmailAddress>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub has_attachments: bool,
    /// Plain text preview of the body
    #[serde(default)]
    pub preview: String,
    /// Available body representations in server order (e.g. "html", "raw")
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_versions: Vec<String>,
}

impl Message {
    /// Create a builder for constructing a Message
    pub fn builder(id: MessageId) -> MessageBuilder {
        MessageBuilder::new(id)
    }
}

/// Builder for Message, mostly used by tests and fixtures
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(id: MessageId) -> Self {
        Self {
            message: Message {
                id,
                subject: String::new(),
                from: EmailAddress::default(),
                to: Vec::new(),
                cc: Vec::new(),
                date: Utc::now(),
                has_attachments: false,
                preview: String::new(),
                body_versions: Vec::new(),
            },
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = subject.into();
        self
    }

    pub fn from(mut self, from: EmailAddress) -> Self {
        self.message.from = from;
        self
    }

    pub fn to(mut self, to: Vec<EmailAddress>) -> Self {
        self.message.to = to;
        self
    }

    pub fn cc(mut self, cc: Vec<EmailAddress>) -> Self {
        self.message.cc = cc;
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.message.date = date;
        self
    }

    pub fn has_attachments(mut self, has_attachments: bool) -> Self {
        self.message.has_attachments = has_attachments;
        self
    }

    pub fn preview(mut self, preview: impl Into<String>) -> Self {
        self.message.preview = preview.into();
        self
    }

    pub fn body_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.body_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// The server encodes empty Go slices as `null`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    null_as_default(deserializer)
}
