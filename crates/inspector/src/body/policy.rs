//! External image display policy

/// Whether remotely-hosted images in the open message are shown.
///
/// Lives exactly as long as one open message view and starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalImagePolicy {
    display: bool,
}

impl ExternalImagePolicy {
    /// Policy for a freshly opened message: external images hidden
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn display(&self) -> bool {
        self.display
    }

    /// Set the flag; returns true when the value changed
    pub fn set_display(&mut self, display: bool) -> bool {
        let changed = self.display != display;
        self.display = display;
        changed
    }

    pub fn toggle(&mut self) -> bool {
        self.display = !self.display;
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        assert!(!ExternalImagePolicy::hidden().display());
        assert!(!ExternalImagePolicy::default().display());
    }

    #[test]
    fn test_set_display_reports_change() {
        let mut policy = ExternalImagePolicy::hidden();
        assert!(policy.set_display(true));
        assert!(!policy.set_display(true));
        assert!(policy.display());
    }

    #[test]
    fn test_toggle() {
        let mut policy = ExternalImagePolicy::hidden();
        assert!(policy.toggle());
        assert!(!policy.toggle());
    }
}
