//! Domain models for the captured-email viewer

mod attachment;
mod filter;
mod listing;
mod message;
mod relay;

pub use attachment::Attachment;
pub use filter::FilterSyntaxEntry;
pub use listing::{EmailPage, Mailbox, Pagination};
pub use message::{EmailAddress, Message, MessageBuilder, MessageId, display_addresses};
pub use relay::{RelayData, RelayRequest};
