//! Reusable UI components

mod email_row;
mod filter_help;
mod mailbox_item;
mod relay_dialog;
pub mod search_box;

pub use email_row::EmailRow;
pub use filter_help::FilterHelp;
pub use mailbox_item::MailboxItem;
pub use relay_dialog::RelayDialogView;
pub use search_box::{SearchBox, SearchBoxEvent};
