//! Filter syntax help entries

use serde::{Deserialize, Serialize};

/// One row of the filter syntax help table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSyntaxEntry {
    /// Command keyword, e.g. "mailbox"
    pub command: String,
    /// Completion template, e.g. "mailbox:<name>"
    pub suggestion: String,
    pub description: String,
}
