//! Viewer state and orchestration

mod controller;
mod message_view;
mod relay;
mod state;

pub use controller::{EmailListController, OpenRequests};
pub use message_view::{AttachmentsRequest, BodyOutcome, BodyRequest, MessageView};
pub use relay::{AddressChoice, RelayDialog, RelayFormError, RelayOutcome};
pub use state::{ListRequest, ViewMode, ViewState};
