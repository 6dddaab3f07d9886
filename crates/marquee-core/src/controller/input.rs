//! Raw keystroke text.

/// Holds the query exactly as typed. Consumers read the trimmed view.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    query: String,
}

impl InputBuffer {
    /// Replace the text. Returns true when the trimmed value changed.
    pub fn set(&mut self, text: &str) -> bool {
        let changed = self.trimmed() != text.trim();
        self.query.clear();
        self.query.push_str(text);
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.set("")
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.query.trim()
    }

    /// Trimmed length in characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.trimmed().chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}
