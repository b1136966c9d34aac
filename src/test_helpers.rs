//! Shared test builders for sites and media records.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = jetpack_site("4.0.0", &["videopress"]);
//! let record = with_thumbnail(record_dated(1, Some("2015-06-19T09:36:09Z")), "thumbnail", "https://x/a.jpg");
//! ```

use crate::types::{MediaId, MediaRecord, Site, SiteOptions, Thumbnail};

// =========================================================================
// Sites
// =========================================================================

/// A site with default options modified by `f`.
pub fn site_with_options(f: impl FnOnce(&mut SiteOptions)) -> Site {
    let mut options = SiteOptions::default();
    f(&mut options);
    Site {
        options: Some(options),
        ..Default::default()
    }
}

/// A regular site accepting the given extensions.
pub fn site_allowing(types: &[&str]) -> Site {
    site_with_options(|o| o.allowed_file_types = types.iter().map(|t| t.to_string()).collect())
}

/// A regular site with the given upload limit (`None` = `false` on the wire).
pub fn site_with_limit(limit: Option<u64>) -> Site {
    site_with_options(|o| o.max_upload_size = limit)
}

/// A Jetpack site reporting `version` with the given active modules.
pub fn jetpack_site(version: &str, modules: &[&str]) -> Site {
    let mut site = site_with_options(|o| {
        o.jetpack_version = Some(version.to_string());
        o.active_modules = modules.iter().map(|m| m.to_string()).collect();
    });
    site.jetpack = true;
    site
}

/// Set the upload limit on a site, creating options if needed.
pub fn set_limit(site: &mut Site, limit: u64) {
    site.options.get_or_insert_with(SiteOptions::default).max_upload_size = Some(limit);
}

// =========================================================================
// Records
// =========================================================================

/// A persisted record with a numeric ID and optional date.
pub fn record_dated(id: u64, date: Option<&str>) -> MediaRecord {
    MediaRecord {
        id: Some(MediaId::Number(id)),
        date: date.map(String::from),
        ..Default::default()
    }
}

/// Add a thumbnail URL under `size`.
pub fn with_thumbnail(mut record: MediaRecord, size: &str, url: &str) -> MediaRecord {
    record
        .thumbnails
        .insert(size.to_string(), Thumbnail::Url(url.to_string()));
    record
}

/// IDs of records in order, for ordering assertions.
pub fn ids(records: &[MediaRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.id.as_ref().map(ToString::to_string).unwrap_or_default())
        .collect()
}
