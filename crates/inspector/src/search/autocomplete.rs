//! Keyboard and focus rules of the search input
//!
//! [`AutocompleteInput`] owns the input text, the caret and the suggestion
//! engine. The UI forwards edits, key presses and focus changes and applies
//! the returned [`KeyOutcome`] to its event propagation.

use std::time::Duration;

use super::suggest::{ApplyOutcome, PendingLookup, ResolvedLookup, SuggestionEngine};
use super::tokenizer::current_token;

/// Default delay between losing focus and clearing the suggestion
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(200);

/// Whether a key press was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; outer bindings must not see the key
    Handled,
    /// Not consumed; let the key reach outer bindings
    Propagate,
}

/// Preview of the displayed suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostText<'a> {
    /// The input as typed is a prefix; draw the remainder after it
    Completion(&'a str),
    /// The suggestion differs before its end (caret mid-text, other case); show all of it
    Replacement(&'a str),
}

/// Identifies one blur; stale once focus returns or the input changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurTicket(u64);

/// Search input with ghost-text completion
#[derive(Debug, Clone)]
pub struct AutocompleteInput {
    text: String,
    /// Byte offset into `text`
    caret: usize,
    engine: SuggestionEngine,
    focused: bool,
    blur_generation: u64,
    blur_grace: Duration,
}

impl Default for AutocompleteInput {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_GRACE)
    }
}

impl AutocompleteInput {
    pub fn new(blur_grace: Duration) -> Self {
        Self {
            text: String::new(),
            caret: 0,
            engine: SuggestionEngine::new(),
            focused: false,
            blur_generation: 0,
            blur_grace,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn blur_grace(&self) -> Duration {
        self.blur_grace
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Full-text suggestion currently displayed
    pub fn suggestion(&self) -> Option<&str> {
        self.engine.displayed()
    }

    /// How to preview the suggestion next to the input
    pub fn ghost_text(&self) -> Option<GhostText<'_>> {
        let suggestion = self.engine.displayed()?;
        match suggestion.strip_prefix(self.text.as_str()) {
            Some("") => None,
            Some(rest) => Some(GhostText::Completion(rest)),
            None => Some(GhostText::Replacement(suggestion)),
        }
    }

    /// Whether `text` and `caret` differ from what the input last saw
    pub fn differs(&self, text: &str, caret: usize) -> bool {
        text != self.text || caret.min(text.len()) != self.caret
    }

    /// The input changed (typing, paste or a caret move).
    ///
    /// Returns the lookup to resolve for the new token, if any.
    pub fn edit(&mut self, text: impl Into<String>, caret: usize) -> Option<PendingLookup> {
        self.text = text.into();
        self.caret = caret.min(self.text.len());
        self.blur_generation += 1;

        if let Some(suggestion) = self.engine.displayed()
            && !extends(suggestion, &self.text)
        {
            self.engine.clear_displayed();
        }

        let token = current_token(&self.text, self.caret);
        self.engine.suggest(&token, &self.text)
    }

    /// Apply a resolved lookup; stale results are dropped
    pub fn apply(&mut self, resolved: ResolvedLookup) -> ApplyOutcome {
        self.engine.apply(resolved)
    }

    /// Tab: take the suggestion as the new input
    pub fn accept(&mut self) -> KeyOutcome {
        let Some(suggestion) = self.engine.displayed() else {
            return KeyOutcome::Propagate;
        };
        if suggestion == self.text {
            return KeyOutcome::Propagate;
        }

        self.text = suggestion.to_string();
        self.caret = self.text.len();
        self.engine.clear();
        KeyOutcome::Handled
    }

    /// Escape: drop the suggestion, keep the text
    pub fn dismiss(&mut self) -> KeyOutcome {
        if self.engine.displayed().is_none() {
            return KeyOutcome::Propagate;
        }
        self.engine.clear();
        KeyOutcome::Handled
    }

    /// Enter: the outer submit runs on the literal input text
    pub fn submit(&mut self) -> KeyOutcome {
        self.engine.clear();
        KeyOutcome::Propagate
    }

    /// Focus left the input; call [`Self::blur_elapsed`] after the grace delay
    pub fn blur(&mut self) -> BlurTicket {
        self.focused = false;
        self.blur_generation += 1;
        BlurTicket(self.blur_generation)
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.blur_generation += 1;
    }

    /// The grace delay of `ticket` ran out. Returns true if the suggestion was cleared.
    pub fn blur_elapsed(&mut self, ticket: BlurTicket) -> bool {
        if self.focused || ticket.0 != self.blur_generation {
            return false;
        }
        self.engine.clear();
        true
    }

    /// Replace the input without issuing a lookup (e.g. mailbox selection)
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.len();
        self.engine.clear();
    }
}

/// Suggestion still completes what was typed
fn extends(suggestion: &str, text: &str) -> bool {
    suggestion.chars().count() > text.chars().count()
        && suggestion.to_lowercase().starts_with(&text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::search::SuggestionSource;

    struct Source;

    impl SuggestionSource for Source {
        fn lookup(&self, term: &str) -> Result<Vec<String>, ApiError> {
            let all = ["mailbox:", "has:attachment", "subject:"];
            let term = term.to_lowercase();
            Ok(all
                .iter()
                .filter(|c| c.starts_with(&term))
                .map(|c| c.to_string())
                .collect())
        }
    }

    fn type_text(input: &mut AutocompleteInput, text: &str) {
        if let Some(pending) = input.edit(text, text.len()) {
            input.apply(pending.resolve(&Source));
        }
    }

    #[test]
    fn test_accept_replaces_input() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "from:a@x.test mail");
        assert_eq!(input.suggestion(), Some("from:a@x.test mailbox:"));
        assert_eq!(input.ghost_text(), Some(GhostText::Completion("box:")));

        assert_eq!(input.accept(), KeyOutcome::Handled);
        assert_eq!(input.text(), "from:a@x.test mailbox:");
        assert_eq!(input.caret(), input.text().len());
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_accept_without_suggestion_propagates() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "zzz");
        assert_eq!(input.accept(), KeyOutcome::Propagate);
        assert_eq!(input.text(), "zzz");
    }

    #[test]
    fn test_dismiss_keeps_text() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "has");
        assert!(input.suggestion().is_some());

        assert_eq!(input.dismiss(), KeyOutcome::Handled);
        assert_eq!(input.text(), "has");
        assert_eq!(input.suggestion(), None);

        // Nothing left to dismiss: let outer Escape bindings run
        assert_eq!(input.dismiss(), KeyOutcome::Propagate);
    }

    #[test]
    fn test_submit_clears_and_propagates() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "sub");
        assert!(input.suggestion().is_some());

        assert_eq!(input.submit(), KeyOutcome::Propagate);
        assert_eq!(input.text(), "sub");
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_lookup_resolving_after_submit_is_dropped() {
        let mut input = AutocompleteInput::default();
        let pending = input.edit("mail", 4).unwrap();
        input.submit();
        assert_eq!(input.apply(pending.resolve(&Source)), ApplyOutcome::Stale);
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_blur_clears_after_grace() {
        let mut input = AutocompleteInput::default();
        input.focus();
        type_text(&mut input, "mail");

        let ticket = input.blur();
        assert!(input.suggestion().is_some());
        assert!(input.blur_elapsed(ticket));
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_refocus_cancels_blur() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "mail");

        let ticket = input.blur();
        input.focus();
        assert!(!input.blur_elapsed(ticket));
        assert!(input.suggestion().is_some());
    }

    #[test]
    fn test_edit_during_grace_cancels_blur() {
        let mut input = AutocompleteInput::default();
        let ticket = input.blur();
        type_text(&mut input, "mail");
        assert!(!input.blur_elapsed(ticket));
        assert!(input.suggestion().is_some());
    }

    #[test]
    fn test_edit_clears_ghost_that_no_longer_matches() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "mail");
        assert!(input.suggestion().is_some());

        // Lookup still in flight; the old ghost must not linger
        let pending = input.edit("maix", 4);
        assert!(pending.is_some());
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_edit_keeps_ghost_that_still_matches() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "mail");
        let _pending = input.edit("mailb", 5);
        assert_eq!(input.ghost_text(), Some(GhostText::Completion("ox:")));
    }

    #[test]
    fn test_mid_text_suggestion_previews_whole_query() {
        let mut input = AutocompleteInput::default();
        if let Some(pending) = input.edit("foo ma baz", 6) {
            input.apply(pending.resolve(&Source));
        }
        assert_eq!(input.suggestion(), Some("foo mailbox:"));
        assert_eq!(
            input.ghost_text(),
            Some(GhostText::Replacement("foo mailbox:"))
        );
    }

    #[test]
    fn test_case_differing_suggestion_previews_whole_query() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "MA");
        assert_eq!(input.suggestion(), Some("mailbox:"));
        assert_eq!(input.ghost_text(), Some(GhostText::Replacement("mailbox:")));

        assert_eq!(input.accept(), KeyOutcome::Handled);
        assert_eq!(input.text(), "mailbox:");
    }

    #[test]
    fn test_caret_move_recomputes_token() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "sub has");
        assert_eq!(input.suggestion(), Some("sub has:attachment"));

        assert!(!input.differs("sub has", 7));
        assert!(input.differs("sub has", 3));
        if let Some(pending) = input.edit("sub has", 3) {
            input.apply(pending.resolve(&Source));
        }
        assert_eq!(input.suggestion(), Some("subject:"));
        assert_eq!(input.ghost_text(), Some(GhostText::Replacement("subject:")));
    }

    #[test]
    fn test_set_text_clears_suggestion() {
        let mut input = AutocompleteInput::default();
        type_text(&mut input, "mail");
        input.set_text("mailbox:qa");
        assert_eq!(input.text(), "mailbox:qa");
        assert_eq!(input.suggestion(), None);
    }
}
