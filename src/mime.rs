//! Extension → MIME type lookup.
//!
//! Backed by `mime_guess`, which is case-insensitive. A short override list
//! pins the phone-camera formats the upload UI sees most, so their type does
//! not depend on the `mime_guess` release. Unknown extensions return `None`
//! (silent; callers treat the type as undeterminable).

const OVERRIDES: &[(&str, &str)] = &[("heic", "image/heic"), ("heif", "image/heif")];

/// Look up the MIME type for an extension (without the leading dot).
pub fn lookup(extension: &str) -> Option<&'static str> {
    if extension.is_empty() {
        return None;
    }
    OVERRIDES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
        .or_else(|| mime_guess::from_ext(extension).first_raw())
}
