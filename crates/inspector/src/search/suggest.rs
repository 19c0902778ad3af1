//! Filter-token suggestion engine
//!
//! A lookup is issued per edit and resolved off the UI thread. Every lookup
//! takes the next sequence number; only the result of the latest one may
//! change the displayed suggestion.

use log::debug;

use super::tokenizer::SearchToken;
use crate::api::ApiError;

/// Something that can list completion candidates for a partial token
pub trait SuggestionSource {
    /// Candidates for `term`, best first
    fn lookup(&self, term: &str) -> Result<Vec<String>, ApiError>;
}

/// Whether `candidate` is a usable completion of `token`.
///
/// The candidate must be strictly longer than the token and start with it,
/// ignoring case.
pub fn accept_candidate(token: &str, candidate: &str) -> bool {
    candidate.chars().count() > token.chars().count()
        && candidate.to_lowercase().starts_with(&token.to_lowercase())
}

/// A lookup that has been issued but not yet sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    seq: u64,
    term: String,
    /// Query text before the token
    prefix: String,
}

impl PendingLookup {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Run the lookup. Blocking; call from a background executor.
    pub fn resolve<S: SuggestionSource + ?Sized>(self, source: &S) -> ResolvedLookup {
        let outcome = source
            .lookup(&self.term)
            .map(|candidates| candidates.into_iter().next());
        ResolvedLookup {
            seq: self.seq,
            term: self.term,
            prefix: self.prefix,
            outcome,
        }
    }
}

/// Result of a lookup, ready to be applied on the UI thread
#[derive(Debug)]
pub struct ResolvedLookup {
    seq: u64,
    term: String,
    prefix: String,
    /// First candidate returned, if any
    outcome: Result<Option<String>, ApiError>,
}

impl ResolvedLookup {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened when a resolved lookup was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A newer lookup was issued since; nothing changed
    Stale,
    /// The candidate was accepted and is now displayed
    Shown,
    /// No usable candidate (or the lookup failed); the suggestion was cleared
    Cleared,
}

/// Holds the displayed suggestion and the latest issued sequence number
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    latest_seq: u64,
    displayed: Option<String>,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-text suggestion currently shown, if any
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Issue a lookup for `token` within `full_text`.
    ///
    /// A blank token clears the suggestion and returns `None`. Either way
    /// every earlier lookup becomes stale.
    pub fn suggest(&mut self, token: &SearchToken, full_text: &str) -> Option<PendingLookup> {
        self.latest_seq += 1;

        if token.is_blank() {
            self.displayed = None;
            return None;
        }

        Some(PendingLookup {
            seq: self.latest_seq,
            term: token.text.clone(),
            prefix: full_text[..token.start_offset].to_string(),
        })
    }

    /// Clear the suggestion and supersede any lookup in flight
    pub fn clear(&mut self) {
        self.latest_seq += 1;
        self.displayed = None;
    }

    /// Clear the displayed suggestion only
    pub(crate) fn clear_displayed(&mut self) {
        self.displayed = None;
    }

    /// Apply a lookup result if it is still the latest one
    pub fn apply(&mut self, resolved: ResolvedLookup) -> ApplyOutcome {
        if resolved.seq != self.latest_seq {
            debug!(
                "Dropping stale suggestion for {:?} (seq {} < {})",
                resolved.term, resolved.seq, self.latest_seq
            );
            return ApplyOutcome::Stale;
        }

        match resolved.outcome {
            Ok(Some(candidate)) if accept_candidate(&resolved.term, &candidate) => {
                self.displayed = Some(format!("{}{}", resolved.prefix, candidate));
                ApplyOutcome::Shown
            }
            Ok(_) => {
                self.displayed = None;
                ApplyOutcome::Cleared
            }
            Err(e) => {
                debug!("Suggestion lookup for {:?} failed: {}", resolved.term, e);
                self.displayed = None;
                ApplyOutcome::Cleared
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::current_token;
    use std::collections::HashMap;

    struct FixedSource(HashMap<&'static str, Vec<&'static str>>);

    impl SuggestionSource for FixedSource {
        fn lookup(&self, term: &str) -> Result<Vec<String>, ApiError> {
            Ok(self
                .0
                .get(term)
                .map(|c| c.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default())
        }
    }

    struct FailingSource;

    impl SuggestionSource for FailingSource {
        fn lookup(&self, _term: &str) -> Result<Vec<String>, ApiError> {
            Err(ApiError::Transport {
                url: "http://localhost:8080/api/filters/suggestions".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn source() -> FixedSource {
        FixedSource(HashMap::from([
            ("mail", vec!["mailbox:"]),
            ("ma", vec!["ma"]),
            ("zzz", vec!["mailbox:"]),
            ("a", vec!["after:"]),
            ("ab", vec![]),
            ("Has", vec!["has:", "has:attachment"]),
        ]))
    }

    fn issue(engine: &mut SuggestionEngine, text: &str) -> Option<PendingLookup> {
        engine.suggest(&current_token(text, text.len()), text)
    }

    #[test]
    fn test_accept_candidate() {
        assert!(accept_candidate("mail", "mailbox:"));
        assert!(accept_candidate("MAIL", "mailbox:"));
        assert!(!accept_candidate("ma", "ma"));
        assert!(!accept_candidate("zzz", "mailbox:"));
        assert!(!accept_candidate("mailbox:", "mail"));
    }

    #[test]
    fn test_accepted_suggestion_keeps_prefix() {
        let mut engine = SuggestionEngine::new();
        let text = "subject:hello mail";
        let pending = issue(&mut engine, text).unwrap();
        assert_eq!(pending.term(), "mail");

        let outcome = engine.apply(pending.resolve(&source()));
        assert_eq!(outcome, ApplyOutcome::Shown);
        assert_eq!(engine.displayed(), Some("subject:hello mailbox:"));
    }

    #[test]
    fn test_rejected_candidates() {
        let mut engine = SuggestionEngine::new();

        let pending = issue(&mut engine, "ma").unwrap();
        assert_eq!(engine.apply(pending.resolve(&source())), ApplyOutcome::Cleared);
        assert_eq!(engine.displayed(), None);

        let pending = issue(&mut engine, "zzz").unwrap();
        assert_eq!(engine.apply(pending.resolve(&source())), ApplyOutcome::Cleared);
        assert_eq!(engine.displayed(), None);
    }

    #[test]
    fn test_only_first_candidate_is_considered() {
        let mut engine = SuggestionEngine::new();
        let pending = issue(&mut engine, "Has").unwrap();
        engine.apply(pending.resolve(&source()));
        assert_eq!(engine.displayed(), Some("has:"));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut engine = SuggestionEngine::new();
        let first = issue(&mut engine, "a").unwrap();
        let second = issue(&mut engine, "ab").unwrap();

        // "ab" resolves first, then the older "a" arrives
        assert_eq!(
            engine.apply(second.resolve(&source())),
            ApplyOutcome::Cleared
        );
        assert_eq!(engine.apply(first.resolve(&source())), ApplyOutcome::Stale);
        assert_eq!(engine.displayed(), None);
    }

    #[test]
    fn test_blank_token_supersedes_pending_lookup() {
        let mut engine = SuggestionEngine::new();
        let pending = issue(&mut engine, "mail").unwrap();
        assert!(issue(&mut engine, "mail ").is_none());

        assert_eq!(engine.apply(pending.resolve(&source())), ApplyOutcome::Stale);
        assert_eq!(engine.displayed(), None);
    }

    #[test]
    fn test_lookup_failure_clears_silently() {
        let mut engine = SuggestionEngine::new();
        let pending = issue(&mut engine, "mail").unwrap();
        engine.apply(pending.resolve(&source()));
        assert!(engine.displayed().is_some());

        let pending = issue(&mut engine, "mailb").unwrap();
        assert_eq!(
            engine.apply(pending.resolve(&FailingSource)),
            ApplyOutcome::Cleared
        );
        assert_eq!(engine.displayed(), None);
    }

    #[test]
    fn test_clear_supersedes_in_flight_lookup() {
        let mut engine = SuggestionEngine::new();
        let pending = issue(&mut engine, "mail").unwrap();
        engine.clear();
        assert_eq!(engine.apply(pending.resolve(&source())), ApplyOutcome::Stale);
        assert_eq!(engine.displayed(), None);
    }
}
