//! Search input completion
//!
//! Token extraction, suggestion lookups with stale-response suppression, and
//! the accept/dismiss/submit/blur rules of the search box.

mod autocomplete;
mod suggest;
mod tokenizer;

pub use autocomplete::{
    AutocompleteInput, BlurTicket, DEFAULT_BLUR_GRACE, GhostText, KeyOutcome,
};
pub use suggest::{
    ApplyOutcome, PendingLookup, ResolvedLookup, SuggestionEngine, SuggestionSource,
    accept_candidate,
};
pub use tokenizer::{SearchToken, current_token};
