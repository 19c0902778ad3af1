//! Main content views

mod email_list;
mod email_view;

pub use email_list::EmailListView;
pub use email_view::EmailView;
