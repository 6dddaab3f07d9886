//! Highlighted row across the suggestion rows plus the "view all" row.

/// For `n` suggestions the rows are `0..n` followed by the "view all" row `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Highlighted(usize),
}

impl Selection {
    /// `-1` when idle, otherwise the row index
    #[must_use]
    pub fn index(self) -> i64 {
        match self {
            Self::Idle => -1,
            Self::Highlighted(i) => i64::try_from(i).unwrap_or(i64::MAX),
        }
    }

    /// ArrowDown: wraps from the "view all" row back to row 0
    #[must_use]
    pub fn next(self, item_count: usize) -> Self {
        match self.clamp(item_count) {
            Self::Idle => Self::Highlighted(0),
            Self::Highlighted(i) if i < item_count => Self::Highlighted(i + 1),
            Self::Highlighted(_) => Self::Highlighted(0),
        }
    }

    /// ArrowUp: wraps from row 0 (or idle) to the "view all" row
    #[must_use]
    pub fn prev(self, item_count: usize) -> Self {
        match self.clamp(item_count) {
            Self::Highlighted(i) if i > 0 => Self::Highlighted(i - 1),
            _ => Self::Highlighted(item_count),
        }
    }

    /// Keep the highlight within `0..=item_count`
    #[must_use]
    pub fn clamp(self, item_count: usize) -> Self {
        match self {
            Self::Highlighted(i) if i > item_count => Self::Highlighted(item_count),
            other => other,
        }
    }

    /// Highlighted suggestion row, if any (the "view all" row is not one)
    #[must_use]
    pub fn item_row(self, item_count: usize) -> Option<usize> {
        match self {
            Self::Highlighted(i) if i < item_count => Some(i),
            _ => None,
        }
    }
}
