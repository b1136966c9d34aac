//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and the binary prints the lines. Format functions are pure:
//! no I/O, no side effects.
//!
//! Every line is `Label: value`. Absent values print as `unknown`, and
//! tri-state verdicts print as `yes`, `no` or `unknown`, so "cannot determine"
//! is never shown as a plain "no".
//!
//! ```text
//! $ mediakit inspect clip.mp4
//! Extension: mp4
//! MIME type: video/mp4
//! MIME prefix: video
//! Uploading: unknown
//!
//! $ mediakit policy clip.json site.json
//! Allowed types: jpg, mp4
//! Type allowed: yes
//! Exceeds max upload size: unknown
//! ```

use crate::config::{GalleryConfig, PolicyConfig};
use crate::identity::{extension_of, mime_prefix_of, mime_type_of};
use crate::policy::{allowed_file_types, exceeds_max_upload_size_with, is_type_allowed_with};
use crate::present::{build_gallery_markup_with, format_duration, is_uploading};
use crate::types::{Gallery, MediaDescriptor, Site};
use crate::urls::Dimensions;

const UNKNOWN: &str = "unknown";

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN)
}

/// Render a tri-state verdict.
pub fn verdict(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => UNKNOWN,
    }
}

/// Identity of a descriptor: extension, MIME type and category, upload state.
pub fn format_inspect_output(item: &MediaDescriptor) -> Vec<String> {
    vec![
        format!("Extension: {}", or_unknown(extension_of(item))),
        format!("MIME type: {}", or_unknown(mime_type_of(item))),
        format!("MIME prefix: {}", or_unknown(mime_prefix_of(item))),
        format!("Uploading: {}", verdict(is_uploading(item.as_record()))),
    ]
}

/// Resolved display URL.
pub fn format_url_output(url: Option<&str>) -> Vec<String> {
    vec![format!("URL: {}", or_unknown(url))]
}

/// Upload policy verdicts for an item on a site.
pub fn format_policy_output(
    item: &MediaDescriptor,
    site: &Site,
    config: &PolicyConfig,
) -> Vec<String> {
    let allowed = allowed_file_types(Some(site));
    let allowed = if allowed.is_empty() {
        "(none reported)".to_string()
    } else {
        allowed.join(", ")
    };
    vec![
        format!("Allowed types: {allowed}"),
        format!(
            "Type allowed: {}",
            verdict(Some(is_type_allowed_with(Some(item), Some(site), config)))
        ),
        format!(
            "Exceeds max upload size: {}",
            verdict(exceeds_max_upload_size_with(item, site, config))
        ),
    ]
}

/// Width and height of a named image size.
pub fn format_dimensions_output(size_name: &str, dims: &Dimensions) -> Vec<String> {
    let show = |v: Option<u32>| v.map_or_else(|| UNKNOWN.to_string(), |n| n.to_string());
    vec![
        format!("Size: {size_name}"),
        format!("Width: {}", show(dims.width)),
        format!("Height: {}", show(dims.height)),
    ]
}

/// Playtime of a number of seconds.
pub fn format_duration_output(seconds: f64) -> Vec<String> {
    vec![format!(
        "Duration: {}",
        or_unknown(format_duration(seconds).as_deref())
    )]
}

/// Gallery shortcode, printed bare so it can be pasted into a post.
pub fn format_gallery_output(gallery: &Gallery, config: &GalleryConfig) -> Vec<String> {
    vec![build_gallery_markup_with(gallery, config)]
}

/// Print lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
