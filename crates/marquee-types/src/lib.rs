//! Shared types for Marquee components.
//!
//! This crate provides the domain types used by marquee-core and the
//! marquee CLI: catalog result items, controller events and the snapshot
//! the rendering surface consumes. All types are serializable so a front
//! end can receive them over any transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a media result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Short badge label shown next to a media row
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "TV",
        }
    }
}

/// A movie or series returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResult {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    pub media_kind: MediaKind,
    /// Poster reference, resolved to a URL by the rendering surface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A cast or crew member returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResult {
    pub id: u64,
    pub name: String,
    /// Known-for department, e.g. "Acting"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// One row of a suggestion list. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultItem {
    Media(MediaResult),
    Person(PersonResult),
}

impl ResultItem {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Media(m) => m.id,
            Self::Person(p) => p.id,
        }
    }

    /// Title for media, name for people
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Media(m) => &m.title,
            Self::Person(p) => &p.name,
        }
    }

    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        match self {
            Self::Media(m) => m.thumbnail.as_deref(),
            Self::Person(p) => p.thumbnail.as_deref(),
        }
    }

    #[must_use]
    pub fn is_person(&self) -> bool {
        matches!(self, Self::Person(_))
    }

    /// Stable key for list rendering: `movie-603`, `series-1399`, `person-42`
    #[must_use]
    pub fn row_key(&self) -> String {
        match self {
            Self::Media(m) => match m.media_kind {
                MediaKind::Movie => format!("movie-{}", m.id),
                MediaKind::Series => format!("series-{}", m.id),
            },
            Self::Person(p) => format!("person-{}", p.id),
        }
    }
}

/// Keys the suggestion controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

impl Key {
    /// Map a DOM-style key name to a controller key. Other keys are not handled.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowDown" | "Down" => Some(Self::ArrowDown),
            "ArrowUp" | "Up" => Some(Self::ArrowUp),
            "Enter" | "Return" => Some(Self::Enter),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Events sent from the search entry to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// Input text changed
    QueryChanged { query: String },

    /// A navigation key was pressed in the input
    KeyPressed { key: Key },

    /// Pointer moved over a row (`index == len` is the "view all" row)
    RowHovered { index: usize },

    /// Row clicked (`index == len` is the "view all" row)
    RowClicked { index: usize },

    /// "View all results" clicked
    ViewAllClicked,

    /// Pointer interaction outside the search entry
    ClickedOutside,
}

/// A relative route handed to the router.
///
/// Always starts with `/` and contains no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NavigationTarget(String);

impl NavigationTarget {
    /// Validate a path. Returns `None` for paths that cannot be routed.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let valid = path.starts_with('/')
            && !path
                .chars()
                .any(|c| c.is_whitespace() || c.is_control());
        valid.then_some(Self(path))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NavigationTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("not a routable path: {value:?}"))
    }
}

impl From<NavigationTarget> for String {
    fn from(target: NavigationTarget) -> Self {
        target.0
    }
}

/// Complete observable output of the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSnapshot {
    /// Trimmed query the input currently holds
    pub query: String,
    /// Suggestions for the settled query (empty while a newer query is pending)
    pub suggestions: Vec<ResultItem>,
    /// `-1` for no highlight, `suggestions.len()` for the "view all" row
    pub selected_index: i64,
    pub panel_visible: bool,
    pub is_loading: bool,
}

impl SuggestionSnapshot {
    /// Index of the synthetic "view all results" row
    #[must_use]
    pub fn view_all_index(&self) -> usize {
        self.suggestions.len()
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&ResultItem> {
        usize::try_from(self.selected_index)
            .ok()
            .and_then(|i| self.suggestions.get(i))
    }

    #[must_use]
    pub fn is_view_all_selected(&self) -> bool {
        usize::try_from(self.selected_index).is_ok_and(|i| i == self.view_all_index())
    }
}

/// Updates sent from the controller to the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerUpdate {
    /// State to render (full replacement)
    Snapshot(SuggestionSnapshot),

    /// A commit produced a navigation target
    Navigated { target: NavigationTarget },

    /// The enclosing search entry should close
    Closed,
}
