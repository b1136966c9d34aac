//! Filename parsing shared by every input shape.
//!
//! Filenames, object URLs, and GUIDs all reduce to the same question: what is
//! the final path segment, and what follows its last dot? Query strings and
//! fragments are removed first, so `photo.gif?w=100` and `photo.gif#top` both
//! answer `gif`.
//!
//! - `photo.jpg` → extension `jpg`, title `photo`
//! - `https://example.com/2024/01/Photo.JPG?resize=100` → extension `JPG`, title `Photo`
//! - `archive.tar.gz` → extension `gz`, title `archive.tar`
//! - `.hidden` → no extension, title `.hidden`
//! - `https://example.com.au/download` → no extension

/// Remove a `?query` and/or `#fragment` suffix.
pub fn strip_query(name: &str) -> &str {
    let end = name.find(['?', '#']).unwrap_or(name.len());
    &name[..end]
}

/// Final path segment, after stripping any query suffix.
pub fn file_name(name: &str) -> &str {
    let path = strip_query(name);
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Raw extension of a filename or URL, case preserved.
///
/// Returns `None` when the final segment has no dot, ends in a dot, or only
/// starts with one (dotfiles).
pub fn split_extension(name: &str) -> Option<&str> {
    let base = file_name(name);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(pos) if pos + 1 == base.len() => None,
        Some(pos) => Some(&base[pos + 1..]),
    }
}

/// Display title: the final segment without its extension.
pub fn title_from_filename(name: &str) -> String {
    let base = file_name(name);
    match split_extension(base) {
        Some(ext) => base[..base.len() - ext.len() - 1].to_string(),
        None => base.to_string(),
    }
}
