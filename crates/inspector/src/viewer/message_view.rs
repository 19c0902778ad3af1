//! State of one open message
//!
//! A [`MessageView`] exists from the moment a message is opened until the
//! viewer returns to the list or opens another message. It owns the render
//! surface, the image policy and the version selector for that message.

use crate::body::{
    BodyError, BodyVersionSelector, BodyVersionSet, ExternalImagePolicy, RenderTarget,
};
use crate::models::{Attachment, Message, MessageId};

/// A body fetch keyed by the message and its request sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRequest {
    pub message_id: MessageId,
    pub version: String,
    pub seq: u64,
}

/// An attachment listing fetch for the open message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentsRequest {
    pub message_id: MessageId,
    pub seq: u64,
}

/// Result of handing a body response to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOutcome {
    /// Content (or an error notice) now fills the surface
    Rendered,
    /// The response belongs to a superseded request
    Discarded,
}

#[derive(Debug, Clone)]
pub struct MessageView {
    message: Message,
    selector: BodyVersionSelector,
    target: RenderTarget,
    policy: ExternalImagePolicy,
    body_seq: u64,
    attachments: Option<Vec<Attachment>>,
    attachments_seq: u64,
}

impl MessageView {
    pub(crate) fn new(message: Message, seq: u64) -> Self {
        let selector =
            BodyVersionSelector::new(BodyVersionSet::new(message.body_versions.iter().cloned()));
        let target = RenderTarget::new(message.id.clone());
        Self {
            message,
            selector,
            target,
            policy: ExternalImagePolicy::hidden(),
            body_seq: seq,
            attachments: None,
            attachments_seq: seq,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn id(&self) -> &MessageId {
        &self.message.id
    }

    pub fn selector(&self) -> &BodyVersionSelector {
        &self.selector
    }

    pub fn selected_version(&self) -> &str {
        self.selector.selected()
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub(crate) fn target_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }

    pub fn policy(&self) -> &ExternalImagePolicy {
        &self.policy
    }

    pub(crate) fn policy_mut(&mut self) -> &mut ExternalImagePolicy {
        &mut self.policy
    }

    /// Attachments once loaded; `None` while the fetch is in flight
    pub fn attachments(&self) -> Option<&[Attachment]> {
        self.attachments.as_deref()
    }

    pub(crate) fn body_request(&self) -> BodyRequest {
        BodyRequest {
            message_id: self.message.id.clone(),
            version: self.selector.selected().to_string(),
            seq: self.body_seq,
        }
    }

    pub(crate) fn attachments_request(&self) -> AttachmentsRequest {
        AttachmentsRequest {
            message_id: self.message.id.clone(),
            seq: self.attachments_seq,
        }
    }

    pub(crate) fn select_version(&mut self, tag: &str, seq: u64) -> Result<BodyRequest, BodyError> {
        self.selector.select(tag)?;
        self.body_seq = seq;
        Ok(self.body_request())
    }

    pub(crate) fn is_current_body(&self, request: &BodyRequest) -> bool {
        request.message_id == self.message.id && request.seq == self.body_seq
    }

    pub(crate) fn set_attachments(
        &mut self,
        request: &AttachmentsRequest,
        attachments: Vec<Attachment>,
    ) -> bool {
        if request.message_id != self.message.id || request.seq != self.attachments_seq {
            return false;
        }
        self.attachments = Some(attachments);
        true
    }

    /// Surface is unbound from the window
    pub(crate) fn detach(&mut self) {
        self.target.detach();
    }
}
