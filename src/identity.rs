//! Identity resolution: extension and MIME type for any input shape.
//!
//! Each resolver matches on the [`MediaDescriptor`] shape first and then
//! applies that shape's precedence:
//!
//! | Shape | Extension | MIME type |
//! |---|---|---|
//! | Filename | from the name | table lookup on the extension |
//! | File handle | from `name` | `type` hint, else table lookup |
//! | Record | `extension` → `file` → `URL` → `guid` | `mime_type`, else table lookup |
//!
//! Query strings never influence the result: they are stripped before the
//! extension is split off, so the table lookup always sees a bare extension.

use crate::mime;
use crate::naming::split_extension;
use crate::types::{MediaDescriptor, MediaRecord};

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn record_extension(record: &MediaRecord) -> Option<&str> {
    if let Some(ext) = non_empty(record.extension.as_deref()) {
        return Some(ext);
    }
    [&record.file, &record.url, &record.guid]
        .into_iter()
        .filter_map(|field| non_empty(field.as_deref()))
        .find_map(split_extension)
}

/// Raw file extension of a descriptor, case preserved.
pub fn extension_of(input: &MediaDescriptor) -> Option<&str> {
    match input {
        MediaDescriptor::Filename(name) => split_extension(name),
        MediaDescriptor::File(file) => split_extension(&file.name),
        MediaDescriptor::Record(record) => record_extension(record),
    }
}

/// MIME type of a descriptor.
///
/// Explicit values (a record's `mime_type`, a file handle's `type` hint) are
/// returned verbatim. Otherwise the extension is looked up case-insensitively.
pub fn mime_type_of(input: &MediaDescriptor) -> Option<&str> {
    let explicit = match input {
        MediaDescriptor::Filename(_) => None,
        MediaDescriptor::File(file) => non_empty(file.mime_type.as_deref()),
        MediaDescriptor::Record(record) => non_empty(record.mime_type.as_deref()),
    };
    explicit.or_else(|| extension_of(input).and_then(mime::lookup))
}

/// Type category of a descriptor's MIME type (`image` for `image/gif`).
///
/// Returns `None` when no MIME type resolves or it has no `/`.
pub fn mime_prefix_of(input: &MediaDescriptor) -> Option<&str> {
    mime_type_of(input)
        .and_then(|mime| mime.split_once('/'))
        .map(|(prefix, _)| prefix)
        .filter(|prefix| !prefix.is_empty())
}
