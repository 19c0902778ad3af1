//! Caret-aware token extraction for the filter query input

/// The token being edited, with byte offsets into the full query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchToken {
    pub text: String,
    /// Start byte offset (inclusive)
    pub start_offset: usize,
    /// End byte offset (exclusive); always the caret
    pub end_offset_exclusive: usize,
}

impl SearchToken {
    /// Empty or whitespace-only tokens never trigger a lookup
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extract the token that ends at `caret`.
///
/// The token starts right after the last whitespace character before the
/// caret, or at 0. Text after the caret is ignored. A caret past the end is
/// clamped and a caret inside a multi-byte character is moved back to the
/// character start.
pub fn current_token(full_text: &str, caret: usize) -> SearchToken {
    let mut end = caret.min(full_text.len());
    while !full_text.is_char_boundary(end) {
        end -= 1;
    }

    let before = &full_text[..end];
    let start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    SearchToken {
        text: before[start..].to_string(),
        start_offset: start,
        end_offset_exclusive: end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_in_the_middle() {
        let token = current_token("foo bar baz", 7);
        assert_eq!(
            token,
            SearchToken {
                text: "bar".to_string(),
                start_offset: 4,
                end_offset_exclusive: 7,
            }
        );
    }

    #[test]
    fn test_token_partial_before_caret() {
        let token = current_token("foo bar baz", 5);
        assert_eq!(token.text, "b");
        assert_eq!(token.start_offset, 4);
    }

    #[test]
    fn test_token_at_start() {
        let token = current_token("mail", 4);
        assert_eq!(token.text, "mail");
        assert_eq!(token.start_offset, 0);
    }

    #[test]
    fn test_caret_after_whitespace_is_blank() {
        let token = current_token("from:a ", 7);
        assert!(token.is_blank());
        assert_eq!(token.start_offset, 7);

        assert!(current_token("", 0).is_blank());
    }

    #[test]
    fn test_caret_past_end_is_clamped() {
        let token = current_token("has:att", 100);
        assert_eq!(token.text, "has:att");
        assert_eq!(token.end_offset_exclusive, 7);
    }

    #[test]
    fn test_multibyte_text() {
        // "é" is two bytes
        let text = "subject:café ma";
        let token = current_token(text, text.len());
        assert_eq!(token.text, "ma");
        assert_eq!(token.start_offset, 14);

        // Caret in the middle of "é" moves back to its start
        let token = current_token(text, 12);
        assert_eq!(token.text, "subject:caf");
        assert_eq!(token.end_offset_exclusive, 11);
    }

    #[test]
    fn test_tabs_and_newlines_split_tokens() {
        let token = current_token("a\tb\nmailb", 9);
        assert_eq!(token.text, "mailb");
        assert_eq!(token.start_offset, 4);
    }
}
