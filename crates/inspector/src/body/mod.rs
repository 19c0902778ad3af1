//! Message body rendering
//!
//! This module provides:
//! - Body version tags and default version selection
//! - The isolated rendering surface for the open message
//! - The sanitizing renderer for markup and text versions
//! - The external image display policy

mod policy;
mod render;
mod surface;
pub mod version;

pub use policy::ExternalImagePolicy;
pub use render::{IsolatedBodyRenderer, sanitize};
pub use surface::{
    HIDDEN_MARKER_ATTR, HIDDEN_SRC_ATTR, ImageElement, NavigationGuard, RenderTarget, SURFACE_CSP,
    SurfaceNode, html_escape, is_network_url, url_origin, url_scheme,
};
pub use version::{BodyKind, BodyVersionSelector, BodyVersionSet, pick_default};

/// Errors from body version handling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    /// The requested tag is not among the message's body versions
    #[error("body version {tag:?} is not available (have: {})", available.join(", "))]
    UnavailableVersion { tag: String, available: Vec<String> },

    #[error("no message is open")]
    NoOpenMessage,
}
