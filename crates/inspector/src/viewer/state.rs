//! Listing state of the viewer
//!
//! [`ViewState`] is a plain value; every change goes through a transition
//! that consumes the old state and returns the new one.

use crate::models::{EmailPage, Mailbox, Message, MessageId, Pagination};

/// Which pane is shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Message(MessageId),
}

/// A listing fetch, tagged so late responses can be recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub query: String,
    pub page: u32,
    pub seq: u64,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    query: String,
    page: u32,
    pagination: Pagination,
    emails: Vec<Message>,
    mode: ViewMode,
    list_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            pagination: Pagination::default(),
            emails: Vec::new(),
            mode: ViewMode::List,
            list_seq: 0,
        }
    }
}

impl ViewState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn emails(&self) -> &[Message] {
        &self.emails
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn open_message_id(&self) -> Option<&MessageId> {
        match &self.mode {
            ViewMode::Message(id) => Some(id),
            ViewMode::List => None,
        }
    }

    pub fn can_go_prev(&self) -> bool {
        !self.pagination.is_first_page && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.pagination.is_last_page
    }

    /// New search: always restarts from page 1
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into().trim().to_string(),
            page: 1,
            ..self
        }
    }

    pub fn with_mailbox(self, mailbox: &Mailbox) -> Self {
        self.with_query(mailbox.query())
    }

    /// Show every message again
    pub fn with_all_emails(self) -> Self {
        self.with_query("")
    }

    pub fn next_page(self) -> Self {
        if !self.can_go_next() {
            return self;
        }
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub fn prev_page(self) -> Self {
        if !self.can_go_prev() {
            return self;
        }
        Self {
            page: self.page - 1,
            ..self
        }
    }

    pub fn open(self, id: MessageId) -> Self {
        Self {
            mode: ViewMode::Message(id),
            ..self
        }
    }

    pub fn close(self) -> Self {
        Self {
            mode: ViewMode::List,
            ..self
        }
    }

    /// Issue a fetch for the current query and page
    pub fn request_list(self) -> (Self, ListRequest) {
        let seq = self.list_seq + 1;
        let request = ListRequest {
            query: self.query.clone(),
            page: self.page,
            seq,
        };
        (
            Self {
                list_seq: seq,
                ..self
            },
            request,
        )
    }

    /// Whether `request` is the latest listing fetch
    pub fn is_current(&self, request: &ListRequest) -> bool {
        request.seq == self.list_seq
    }

    /// Store a fetched page; responses to superseded requests leave the state unchanged
    pub fn receive_page(self, request: &ListRequest, page: EmailPage) -> Self {
        if !self.is_current(request) {
            return self;
        }
        let current = page.pagination.current_page.max(1);
        Self {
            page: current,
            pagination: page.pagination,
            emails: page.emails,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, total: u32) -> EmailPage {
        EmailPage {
            emails: Vec::new(),
            pagination: Pagination {
                current_page: current,
                total_pages: total,
                total_matches: u64::from(total) * 10,
                is_first_page: current == 1,
                is_last_page: current >= total,
            },
        }
    }

    fn loaded(current: u32, total: u32) -> ViewState {
        let (state, request) = ViewState::default().request_list();
        state.receive_page(&request, page(current, total))
    }

    #[test]
    fn test_query_resets_page() {
        let state = loaded(1, 3).next_page();
        assert_eq!(state.page(), 2);

        let state = state.with_query("  from:qa@example.com ");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query(), "from:qa@example.com");
    }

    #[test]
    fn test_mailbox_sets_query() {
        let state = ViewState::default().with_mailbox(&Mailbox {
            name: "inbox".to_string(),
        });
        assert_eq!(state.query(), "mailbox:inbox");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_pagination_bounds() {
        let state = loaded(1, 2);
        assert!(!state.can_go_prev());
        assert_eq!(state.clone().prev_page().page(), 1);

        let state = state.next_page();
        assert_eq!(state.page(), 2);

        let (state, request) = state.request_list();
        let state = state.receive_page(&request, page(2, 2));
        assert!(!state.can_go_next());
        assert_eq!(state.clone().next_page().page(), 2);
        assert_eq!(state.prev_page().page(), 1);
    }

    #[test]
    fn test_stale_page_is_ignored() {
        let (state, old) = ViewState::default().with_query("a").request_list();
        let (state, new) = state.with_query("ab").request_list();

        let state = state.receive_page(&new, page(1, 1));
        let state = state.receive_page(&old, page(4, 9));
        assert_eq!(state.pagination().total_pages, 1);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_open_and_close() {
        let state = ViewState::default().open(MessageId::new("m1"));
        assert_eq!(state.open_message_id(), Some(&MessageId::new("m1")));

        let state = state.close();
        assert_eq!(state.mode(), &ViewMode::List);
    }
}
