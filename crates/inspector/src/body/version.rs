//! Body version tags and default selection

use super::BodyError;

pub const HTML: &str = "html";
pub const WATCH_HTML: &str = "watch-html";
pub const PLAIN_TEXT: &str = "plain-text";
pub const RAW: &str = "raw";

/// Preference order used to pick the version shown when a message opens
pub const PREFERENCE_ORDER: [&str; 4] = [HTML, WATCH_HTML, PLAIN_TEXT, RAW];

/// How a body version is interpreted by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Parsed as markup inside the isolated surface
    Markup,
    /// Inserted as literal text in a monospace container
    Text,
    /// Unknown tag: literal text behind an "unsupported" notice
    Unsupported,
}

impl BodyKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            HTML | WATCH_HTML => BodyKind::Markup,
            PLAIN_TEXT | RAW => BodyKind::Text,
            _ => BodyKind::Unsupported,
        }
    }
}

/// Ordered, duplicate-free set of body version tags for one message
///
/// The vocabulary is open: tags the viewer does not know are kept and
/// rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyVersionSet {
    tags: Vec<String>,
}

impl BodyVersionSet {
    /// Build a set keeping the first occurrence of each tag
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self { tags: unique }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Pick the version to show first.
///
/// Returns the first tag of [`PREFERENCE_ORDER`] present in `available`.
/// When none is present the result is `raw` even if the server did not list
/// it; the body fetch for that tag then decides what is shown.
pub fn pick_default(available: &BodyVersionSet) -> &'static str {
    PREFERENCE_ORDER
        .iter()
        .copied()
        .find(|tag| available.contains(tag))
        .unwrap_or(RAW)
}

/// Tracks the active body version of the open message
#[derive(Debug, Clone)]
pub struct BodyVersionSelector {
    available: BodyVersionSet,
    selected: String,
}

impl BodyVersionSelector {
    /// Create a selector with the default version already selected
    pub fn new(available: BodyVersionSet) -> Self {
        let selected = pick_default(&available).to_string();
        Self {
            available,
            selected,
        }
    }

    pub fn available(&self) -> &BodyVersionSet {
        &self.available
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected == tag
    }

    /// Select another version; only tags the message actually has are valid
    pub fn select(&mut self, tag: &str) -> Result<(), BodyError> {
        if !self.available.contains(tag) {
            return Err(BodyError::UnavailableVersion {
                tag: tag.to_string(),
                available: self.available.iter().map(str::to_string).collect(),
            });
        }
        self.selected = tag.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BodyVersionSet {
        BodyVersionSet::new(tags.iter().copied())
    }

    #[test]
    fn test_pick_default_follows_preference_order() {
        assert_eq!(pick_default(&set(&["raw", "plain-text", "html"])), HTML);
        assert_eq!(pick_default(&set(&["raw", "watch-html"])), WATCH_HTML);
        assert_eq!(pick_default(&set(&["raw", "plain-text"])), PLAIN_TEXT);
        assert_eq!(pick_default(&set(&["raw"])), RAW);
    }

    #[test]
    fn test_pick_default_over_every_subset() {
        let known = ["html", "watch-html", "plain-text", "raw", "amp"];
        for mask in 1u32..(1 << known.len()) {
            let tags: Vec<&str> = known
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| *t)
                .collect();
            let available = set(&tags);
            let expected = PREFERENCE_ORDER
                .iter()
                .copied()
                .find(|t| tags.contains(t))
                .unwrap_or(RAW);
            assert_eq!(pick_default(&available), expected, "tags: {:?}", tags);
        }
    }

    #[test]
    fn test_pick_default_falls_back_to_raw_when_absent() {
        let available = set(&["amp", "calendar"]);
        assert_eq!(pick_default(&available), RAW);
        assert!(!available.contains(RAW));
    }

    #[test]
    fn test_set_removes_duplicates_keeping_order() {
        let available = set(&["raw", "html", "raw"]);
        assert_eq!(available.iter().collect::<Vec<_>>(), vec!["raw", "html"]);
        assert_eq!(available.len(), 2);
    }

    #[test]
    fn test_select_present_version() {
        let mut selector = BodyVersionSelector::new(set(&["html", "raw"]));
        assert_eq!(selector.selected(), HTML);

        selector.select(RAW).unwrap();
        assert!(selector.is_selected(RAW));
    }

    #[test]
    fn test_select_absent_version_is_reported() {
        let mut selector = BodyVersionSelector::new(set(&["html", "raw"]));
        let err = selector.select(PLAIN_TEXT).unwrap_err();
        assert!(matches!(err, BodyError::UnavailableVersion { ref tag, .. } if tag == PLAIN_TEXT));
        assert_eq!(selector.selected(), HTML);
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(BodyKind::of(HTML), BodyKind::Markup);
        assert_eq!(BodyKind::of(WATCH_HTML), BodyKind::Markup);
        assert_eq!(BodyKind::of(RAW), BodyKind::Text);
        assert_eq!(BodyKind::of(PLAIN_TEXT), BodyKind::Text);
        assert_eq!(BodyKind::of("amp"), BodyKind::Unsupported);
    }
}
