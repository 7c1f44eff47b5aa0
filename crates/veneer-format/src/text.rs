//! String casing helpers. "First letter" means first grapheme cluster.

use unicode_segmentation::UnicodeSegmentation;

fn split_first_grapheme(s: &str) -> Option<(&str, &str)> {
    let first = s.graphemes(true).next()?;
    Some((first, &s[first.len()..]))
}

fn first_upper(s: &str) -> String {
    split_first_grapheme(s)
        .map(|(first, _)| first.to_uppercase())
        .unwrap_or_default()
}

/// `"kanhu"` → `"Kanhu"`. Empty input is returned unchanged.
pub fn capitalize_first_letter(s: &str) -> String {
    match split_first_grapheme(s) {
        Some((first, rest)) => format!("{}{rest}", first.to_uppercase()),
        None => String::new(),
    }
}

/// `"hello-world"` → `"Hello World"`.
///
/// Blank input comes back unchanged; empty segments (`a--b`) are skipped.
pub fn slug_to_string(slug: &str) -> String {
    if slug.trim().is_empty() {
        return slug.to_owned();
    }
    slug.split('-')
        .filter(|segment| !segment.is_empty())
        .map(capitalize_first_letter)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"Mary Jane Watson"` → `"MW"`, `"Alice"` → `"A"`, blank → `""`.
pub fn name_initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [only] => first_upper(only),
        [first, .., last] => format!("{}{}", first_upper(first), first_upper(last)),
    }
}
