//! Release (relay) dialog state
//!
//! The dialog offers the server's relay names and the message's original
//! sender and recipients, each of which may be overridden. A failed release
//! keeps the dialog open with its inputs and carries the server's message.

use crate::api::ApiError;
use crate::models::{MessageId, RelayData, RelayRequest};

/// Original value or an operator-typed override
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChoice {
    Original,
    Override(String),
}

/// Why the form cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayFormError {
    #[error("no relay is configured on the server")]
    NoRelay,
    #[error("sender must not be empty")]
    EmptySender,
    #[error("at least one recipient is required")]
    NoRecipients,
}

/// What the UI should do after a release attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Released; close the dialog
    Released,
    /// Show a notification with this text; the dialog stays open
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RelayDialog {
    message_id: MessageId,
    data: RelayData,
    relay_name: Option<String>,
    sender: AddressChoice,
    recipients: AddressChoice,
    pending: bool,
    last_error: Option<String>,
}

impl RelayDialog {
    /// Open the dialog with the defaults fetched from the server
    pub fn new(message_id: MessageId, data: RelayData) -> Self {
        let relay_name = data.relay_names.first().cloned();
        Self {
            message_id,
            data,
            relay_name,
            sender: AddressChoice::Original,
            recipients: AddressChoice::Original,
            pending: false,
            last_error: None,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn relay_names(&self) -> &[String] {
        &self.data.relay_names
    }

    pub fn relay_name(&self) -> Option<&str> {
        self.relay_name.as_deref()
    }

    pub fn sender(&self) -> &AddressChoice {
        &self.sender
    }

    pub fn recipients(&self) -> &AddressChoice {
        &self.recipients
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Original sender as shown next to the "original" option
    pub fn original_sender(&self) -> String {
        self.data.sender.display()
    }

    pub fn original_recipients(&self) -> String {
        crate::models::display_addresses(&self.data.recipients)
    }

    pub fn select_relay(&mut self, name: &str) {
        if self.data.relay_names.iter().any(|n| n == name) {
            self.relay_name = Some(name.to_string());
        }
    }

    pub fn set_sender(&mut self, choice: AddressChoice) {
        self.sender = choice;
    }

    pub fn set_recipients(&mut self, choice: AddressChoice) {
        self.recipients = choice;
    }

    /// Build the request body from the current inputs
    pub fn request(&self) -> Result<RelayRequest, RelayFormError> {
        let relay_name = self.relay_name.clone().ok_or(RelayFormError::NoRelay)?;

        let sender = match &self.sender {
            AddressChoice::Original => self.data.sender.address.clone(),
            AddressChoice::Override(value) => value.trim().to_string(),
        };
        if sender.is_empty() {
            return Err(RelayFormError::EmptySender);
        }

        let recipients: Vec<String> = match &self.recipients {
            AddressChoice::Original => self
                .data
                .recipients
                .iter()
                .map(|a| a.address.clone())
                .collect(),
            AddressChoice::Override(value) => parse_recipients(value),
        };
        if recipients.is_empty() {
            return Err(RelayFormError::NoRecipients);
        }

        Ok(RelayRequest {
            relay_name,
            sender,
            recipients,
        })
    }

    /// Validate and mark the release as in flight
    pub fn submit(&mut self) -> Result<RelayRequest, RelayFormError> {
        let request = self.request()?;
        self.pending = true;
        self.last_error = None;
        Ok(request)
    }

    /// Handle the server's answer to a release
    pub fn finish(&mut self, result: Result<(), ApiError>) -> RelayOutcome {
        self.pending = false;
        match result {
            Ok(()) => RelayOutcome::Released,
            Err(e) => {
                let message = e.user_message();
                self.last_error = Some(message.clone());
                RelayOutcome::Failed(message)
            }
        }
    }
}

/// Split an override list on commas, semicolons and whitespace
fn parse_recipients(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailAddress;

    fn dialog() -> RelayDialog {
        RelayDialog::new(
            MessageId::new("m1"),
            RelayData {
                sender: EmailAddress::with_name("Alice", "alice@example.com"),
                recipients: vec![
                    EmailAddress::new("bob@example.com"),
                    EmailAddress::new("carol@example.com"),
                ],
                relay_names: vec!["smtp-main".to_string(), "smtp-backup".to_string()],
            },
        )
    }

    #[test]
    fn test_defaults_use_original_addresses() {
        let request = dialog().request().unwrap();
        assert_eq!(
            request,
            RelayRequest {
                relay_name: "smtp-main".to_string(),
                sender: "alice@example.com".to_string(),
                recipients: vec![
                    "bob@example.com".to_string(),
                    "carol@example.com".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_overrides() {
        let mut dialog = dialog();
        dialog.select_relay("smtp-backup");
        dialog.select_relay("unknown");
        dialog.set_sender(AddressChoice::Override(" qa@example.com ".to_string()));
        dialog.set_recipients(AddressChoice::Override(
            "x@example.com, y@example.com;z@example.com".to_string(),
        ));

        let request = dialog.request().unwrap();
        assert_eq!(request.relay_name, "smtp-backup");
        assert_eq!(request.sender, "qa@example.com");
        assert_eq!(request.recipients.len(), 3);
    }

    #[test]
    fn test_invalid_form() {
        let mut dialog = dialog();
        dialog.set_recipients(AddressChoice::Override(" , ".to_string()));
        assert_eq!(dialog.request().unwrap_err(), RelayFormError::NoRecipients);

        dialog.set_sender(AddressChoice::Override(String::new()));
        assert_eq!(dialog.request().unwrap_err(), RelayFormError::EmptySender);

        let empty = RelayDialog::new(MessageId::new("m1"), RelayData::default());
        assert_eq!(empty.request().unwrap_err(), RelayFormError::NoRelay);
    }

    #[test]
    fn test_failure_keeps_inputs() {
        let mut dialog = dialog();
        dialog.set_sender(AddressChoice::Override("qa@example.com".to_string()));
        dialog.submit().unwrap();
        assert!(dialog.is_pending());

        let outcome = dialog.finish(Err(ApiError::Status {
            status: 500,
            message: "cannot relay message (id=m1): dial tcp: refused\n".to_string(),
        }));
        assert_eq!(
            outcome,
            RelayOutcome::Failed("cannot relay message (id=m1): dial tcp: refused".to_string())
        );
        assert!(!dialog.is_pending());
        assert_eq!(
            dialog.sender(),
            &AddressChoice::Override("qa@example.com".to_string())
        );
        assert!(dialog.last_error().is_some());
    }

    #[test]
    fn test_success() {
        let mut dialog = dialog();
        dialog.submit().unwrap();
        assert_eq!(dialog.finish(Ok(())), RelayOutcome::Released);
    }
}
