//! Paginated listing and mailbox models

use serde::{Deserialize, Serialize};

use super::message::{Message, null_as_default};

/// Pagination block returned alongside a page of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_matches: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_matches: 0,
            is_first_page: true,
            is_last_page: true,
        }
    }
}

/// One page of the message listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<Message>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// A mailbox (recipient bucket) known to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub name: String,
}

impl Mailbox {
    /// The search query selecting this mailbox
    pub fn query(&self) -> String {
        format!("mailbox:{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_email_list_is_empty() {
        let json = r#"{
            "emails": null,
            "pagination": {
                "current_page": 1,
                "total_pages": 0,
                "total_matches": 0,
                "is_first_page": true,
                "is_last_page": true
            }
        }"#;
        let page: EmailPage = serde_json::from_str(json).unwrap();
        assert!(page.emails.is_empty());
        assert!(page.pagination.is_last_page);
    }

    #[test]
    fn test_mailbox_query() {
        let mailbox = Mailbox {
            name: "qa@example.com".to_string(),
        };
        assert_eq!(mailbox.query(), "mailbox:qa@example.com");
    }
}
