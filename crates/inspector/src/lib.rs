//! Inspector crate - client logic for the captured-email viewer
//!
//! This crate provides platform-independent viewer functionality including:
//! - Domain models (Message, Attachment, EmailPage, RelayData)
//! - Blocking REST client for the capture server
//! - Isolated, multi-version body rendering with an external-image policy
//! - Token-aware search autocomplete with stale-response suppression
//! - The viewer controller that keys every fetch to the open message
//!
//! This crate has zero UI dependencies.

pub mod api;
pub mod body;
pub mod models;
pub mod search;
pub mod settings;
pub mod viewer;

pub use api::{ApiClient, ApiError};
pub use body::{
    BodyError, BodyKind, BodyVersionSelector, BodyVersionSet, ExternalImagePolicy,
    IsolatedBodyRenderer, NavigationGuard, RenderTarget, SurfaceNode, pick_default,
};
pub use models::{
    Attachment, EmailAddress, EmailPage, FilterSyntaxEntry, Mailbox, Message, MessageId,
    Pagination, RelayData, RelayRequest, display_addresses,
};
pub use search::{
    AutocompleteInput, GhostText, KeyOutcome, PendingLookup, ResolvedLookup, SearchToken,
    SuggestionEngine, SuggestionSource, current_token,
};
pub use settings::ViewerConfig;
pub use viewer::{
    AddressChoice, AttachmentsRequest, BodyOutcome, BodyRequest, EmailListController,
    ListRequest, MessageView, OpenRequests, RelayDialog, RelayOutcome, ViewState,
};
