//! Viewer orchestration
//!
//! The controller performs no I/O. Each operation returns the request the
//! caller must run (on a background executor) and each `receive_*` takes the
//! matching response back. Responses that no longer match the open message
//! or the latest request are discarded.

use log::{debug, warn};

use super::message_view::{AttachmentsRequest, BodyOutcome, BodyRequest, MessageView};
use super::state::{ListRequest, ViewState};
use crate::api::ApiError;
use crate::body::{BodyError, IsolatedBodyRenderer};
use crate::models::{Attachment, EmailPage, Mailbox, Message, MessageId};

/// Fetches to run after a message was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequests {
    pub body: BodyRequest,
    /// Only when the message reports attachments
    pub attachments: Option<AttachmentsRequest>,
}

#[derive(Debug, Default)]
pub struct EmailListController {
    state: ViewState,
    view: Option<MessageView>,
    renderer: IsolatedBodyRenderer,
    seq: u64,
}

impl EmailListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose bodies load inline parts from the server at `server_url`
    pub fn with_server_url(server_url: &str) -> Self {
        Self {
            renderer: IsolatedBodyRenderer::with_server_url(server_url),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The open message, if any
    pub fn view(&self) -> Option<&MessageView> {
        self.view.as_ref()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn transition(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }

    fn request_list(&mut self) -> ListRequest {
        let (state, request) = std::mem::take(&mut self.state).request_list();
        self.state = state;
        request
    }

    // ---- Listing ----

    /// Fetch the current page again
    pub fn refresh(&mut self) -> ListRequest {
        self.request_list()
    }

    /// Search with the literal query text, from page 1
    pub fn submit_query(&mut self, query: &str) -> ListRequest {
        self.transition(|s| s.with_query(query));
        self.request_list()
    }

    pub fn select_mailbox(&mut self, mailbox: &Mailbox) -> ListRequest {
        self.transition(|s| s.with_mailbox(mailbox));
        self.request_list()
    }

    pub fn show_all(&mut self) -> ListRequest {
        self.transition(ViewState::with_all_emails);
        self.request_list()
    }

    /// `None` when already on the last page
    pub fn next_page(&mut self) -> Option<ListRequest> {
        if !self.state.can_go_next() {
            return None;
        }
        self.transition(ViewState::next_page);
        Some(self.request_list())
    }

    /// `None` when already on the first page
    pub fn prev_page(&mut self) -> Option<ListRequest> {
        if !self.state.can_go_prev() {
            return None;
        }
        self.transition(ViewState::prev_page);
        Some(self.request_list())
    }

    /// Store a listing response. Returns the error of a current request.
    pub fn receive_list(
        &mut self,
        request: &ListRequest,
        result: Result<EmailPage, ApiError>,
    ) -> Result<bool, ApiError> {
        if !self.state.is_current(request) {
            debug!("Dropping stale listing response (seq {})", request.seq);
            return Ok(false);
        }
        let page = result?;
        self.transition(|s| s.receive_page(request, page));
        Ok(true)
    }

    // ---- Message view ----

    /// Open a message: the surface and image policy start fresh before any fetch
    pub fn open_message(&mut self, message: Message) -> OpenRequests {
        if let Some(previous) = self.view.as_mut() {
            previous.detach();
        }

        let seq = self.next_seq();
        let has_attachments = message.has_attachments;
        let id = message.id.clone();
        let view = MessageView::new(message, seq);

        let requests = OpenRequests {
            body: view.body_request(),
            attachments: has_attachments.then(|| view.attachments_request()),
        };

        debug!(
            "Opening message {} with body version {}",
            id, requests.body.version
        );
        self.view = Some(view);
        self.transition(|s| s.open(id));
        requests
    }

    /// Back to the list; the surface is detached
    pub fn close_message(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.detach();
        }
        self.transition(ViewState::close);
    }

    /// Switch the open message to another body version
    pub fn switch_version(&mut self, tag: &str) -> Result<BodyRequest, BodyError> {
        let seq = self.seq + 1;
        let view = self.view.as_mut().ok_or(BodyError::NoOpenMessage)?;
        let request = view.select_version(tag, seq)?;
        self.seq = seq;
        Ok(request)
    }

    /// Render a body response into the open surface if it is still current
    pub fn receive_body(
        &mut self,
        request: &BodyRequest,
        result: Result<String, ApiError>,
    ) -> BodyOutcome {
        let Some(view) = self.view.as_mut().filter(|v| v.is_current_body(request)) else {
            debug!(
                "Dropping body {} of message {} (seq {})",
                request.version, request.message_id, request.seq
            );
            return BodyOutcome::Discarded;
        };

        match result {
            Ok(payload) => {
                let policy = *view.policy();
                self.renderer
                    .render(view.target_mut(), &request.version, &payload, &policy);
            }
            Err(e) => {
                warn!(
                    "Failed to fetch body {} of message {}: {}",
                    request.version, request.message_id, e
                );
                self.renderer.render_error(
                    view.target_mut(),
                    &format!("Body not available: {}", e.user_message()),
                );
            }
        }
        BodyOutcome::Rendered
    }

    /// Show or hide external images of the open message. Returns true if anything changed.
    pub fn set_image_display(&mut self, display: bool) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        if !view.policy_mut().set_display(display) {
            return false;
        }
        let policy = *view.policy();
        self.renderer.apply_image_policy(view.target_mut(), &policy);
        true
    }

    pub fn toggle_images(&mut self) -> bool {
        let display = self.view.as_ref().is_some_and(|v| !v.policy().display());
        self.set_image_display(display)
    }

    /// Store the attachment listing of the open message
    pub fn receive_attachments(
        &mut self,
        request: &AttachmentsRequest,
        result: Result<Vec<Attachment>, ApiError>,
    ) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        match result {
            Ok(attachments) => view.set_attachments(request, attachments),
            Err(e) => {
                warn!(
                    "Failed to list attachments of message {}: {}",
                    request.message_id, e
                );
                view.set_attachments(request, Vec::new())
            }
        }
    }

    /// A message was deleted on the server: leave it if open and reload the list
    pub fn message_deleted(&mut self, id: &MessageId) -> ListRequest {
        if self.view.as_ref().is_some_and(|v| v.id() == id) {
            self.close_message();
        }
        self.request_list()
    }

    /// Every message was deleted on the server
    pub fn all_deleted(&mut self) -> ListRequest {
        self.close_message();
        self.transition(ViewState::with_all_emails);
        self.request_list()
    }
}
