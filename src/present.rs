//! Presentation helpers for the media library UI.
//!
//! Small derivations the list and detail views need: playtime strings, the
//! library's newest-first ordering, MIME-category filtering, the gallery
//! shortcode, and delete/uploading state.

use crate::config::GalleryConfig;
use crate::identity::mime_prefix_of;
use crate::types::{Gallery, MediaDescriptor, MediaRecord, Site, User};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Reverse;
use std::fmt::Write as _;

/// Format a playtime in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Fractions are truncated. Returns `None` for NaN, infinities, and negative
/// values.
///
/// ```
/// # use mediakit::present::format_duration;
/// assert_eq!(format_duration(5.8).as_deref(), Some("0:05"));
/// assert_eq!(format_duration(3300.0).as_deref(), Some("55:00"));
/// assert_eq!(format_duration(198000.0).as_deref(), Some("55:00:00"));
/// ```
pub fn format_duration(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let total = seconds.trunc() as u64;
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    Some(if hours >= 1 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    })
}

/// Parse a record date. Accepts RFC 3339 and naive `YYYY-MM-DD[ HH:MM:SS]`
/// forms, the latter read as UTC.
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Newest first; undated items last; ties broken by higher ID first.
///
/// Returns a new vector. The input is left as it was.
pub fn sort_by_date_descending(items: &[MediaRecord]) -> Vec<MediaRecord> {
    let mut sorted = items.to_vec();
    sorted.sort_by_cached_key(|item| {
        Reverse((
            item.date.as_deref().and_then(parse_date),
            item.id.clone(),
        ))
    });
    sorted
}

/// Items whose MIME category equals `prefix` (`image`, `video`, ...).
///
/// Absent entries and items of undeterminable type are skipped.
pub fn filter_by_mime_prefix<'a>(
    items: &'a [Option<MediaDescriptor>],
    prefix: &str,
) -> Vec<&'a MediaDescriptor> {
    items
        .iter()
        .flatten()
        .filter(|item| mime_prefix_of(item) == Some(prefix))
        .collect()
}

/// Gallery shortcode using the stock defaults.
pub fn build_gallery_markup(gallery: &Gallery) -> String {
    build_gallery_markup_with(gallery, &GalleryConfig::default())
}

/// Gallery shortcode, e.g. `[gallery ids="100,200" type="square" columns="2"]`.
///
/// Attributes equal to their defaults are left out. `columns` only applies to
/// non-default layouts and is dropped otherwise. Items without an ID are skipped.
pub fn build_gallery_markup_with(gallery: &Gallery, config: &GalleryConfig) -> String {
    let ids: Vec<String> = gallery
        .items
        .iter()
        .filter_map(|item| item.id.as_ref())
        .map(ToString::to_string)
        .collect();

    let mut markup = String::from("[gallery");
    push_attr(&mut markup, "ids", &ids.join(","));

    let gallery_type = non_empty(gallery.gallery_type.as_deref())
        .filter(|t| *t != config.default_type);
    if let Some(t) = gallery_type {
        push_attr(&mut markup, "type", t);
        if let Some(columns) = gallery.columns {
            push_attr(&mut markup, "columns", &columns.to_string());
        }
    }

    if let Some(orderby) = non_empty(gallery.orderby.as_deref()) {
        push_attr(&mut markup, "orderby", orderby);
    }
    if let Some(link) = non_empty(gallery.link.as_deref()) {
        push_attr(&mut markup, "link", link);
    }
    if let Some(size) = non_empty(gallery.size.as_deref()).filter(|s| *s != config.default_size)
    {
        push_attr(&mut markup, "size", size);
    }

    markup.push(']');
    markup
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn push_attr(markup: &mut String, name: &str, value: &str) {
    // Shortcode attribute values cannot contain a raw double quote.
    let value = value.replace('"', "&quot;");
    let _ = write!(markup, " {name}=\"{value}\"");
}

/// Whether `user` may delete `item` on `site`.
///
/// Own items need `delete_posts`; everyone else's, including items with no
/// recorded author, need `delete_others_posts`.
pub fn can_delete(item: &MediaRecord, user: &User, site: &Site) -> bool {
    if item.author_id == Some(user.id) {
        site.capabilities.delete_posts
    } else {
        site.capabilities.delete_others_posts
    }
}

/// Whether an item is still uploading. `None` without an item.
pub fn is_uploading(item: Option<&MediaRecord>) -> Option<bool> {
    item.map(|i| i.transient)
}
