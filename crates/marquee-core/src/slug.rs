//! URL slugs for detail routes.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block, removed after NFD decomposition
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Build `title-slug-<id>` from a display title.
///
/// Lowercases, strips diacritics, and collapses every run of characters
/// outside `[a-z0-9]` into a single hyphen. Titles with nothing left
/// (e.g. entirely non-Latin) produce the bare id.
#[must_use]
pub fn generate_slug(title: &str, id: u64) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        id.to_string()
    } else {
        format!("{slug}-{id}")
    }
}

/// Recover the id from a slug produced by [`generate_slug`].
///
/// Accepts `the-dark-knight-155` and bare `155`. Zero is never a valid id.
#[must_use]
pub fn extract_id_from_slug(slug: &str) -> Option<u64> {
    let trimmed = slug.trim();
    let digits = match trimmed.rsplit_once('-') {
        Some((_, tail)) => tail,
        None => trimmed,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|id| *id > 0)
}
