//! Upload policy evaluation.
//!
//! Two questions are answered per item and site: may this file type be
//! uploaded, and is the file too large? Connected (Jetpack) sites complicate
//! both:
//!
//! - **Old agents** (below `allowed_types_sync_version`) never report their
//!   allowed file types. The check cannot be evaluated, so it fails open.
//! - **VideoPress** sites (at or above `videopress_size_exempt_version`, with
//!   the module active) upload video outside the regular media limit, so the
//!   size check does not apply to video.
//!
//! The size verdict is tri-state: `Some(true)`, `Some(false)`, or `None` when
//! it cannot be determined (unknown size, unknown limit, or exempt). Callers
//! must not collapse `None` into either boolean.

use crate::config::PolicyConfig;
use crate::identity::{extension_of, mime_prefix_of};
use crate::types::{MediaDescriptor, Site};
use crate::version::Version;
use tracing::debug;

/// File extensions the site accepts, as reported. Empty when unknown.
pub fn allowed_file_types(site: Option<&Site>) -> &[String] {
    site.and_then(|s| s.options.as_ref())
        .map(|o| o.allowed_file_types.as_slice())
        .unwrap_or_default()
}

/// Whether the item's file type may be uploaded, using stock thresholds.
pub fn is_type_allowed(item: Option<&MediaDescriptor>, site: Option<&Site>) -> bool {
    is_type_allowed_with(item, site, &PolicyConfig::default())
}

/// Whether the item's file type may be uploaded.
///
/// Extensions compare case-insensitively. Jetpack sites whose version is
/// below the sync threshold, or unknown, allow everything.
pub fn is_type_allowed_with(
    item: Option<&MediaDescriptor>,
    site: Option<&Site>,
    config: &PolicyConfig,
) -> bool {
    let (Some(item), Some(site)) = (item, site) else {
        return false;
    };
    if item.is_empty() {
        return false;
    }

    if site.jetpack
        && !jetpack_version(site).is_some_and(|v| v >= config.allowed_types_sync_version)
    {
        debug!(
            site = ?site.id,
            threshold = %config.allowed_types_sync_version,
            "jetpack site predates allowed_file_types sync, allowing all types"
        );
        return true;
    }

    let Some(extension) = extension_of(item) else {
        return false;
    };
    allowed_file_types(Some(site))
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

/// Whether the item exceeds the site's upload limit, using stock thresholds.
pub fn exceeds_max_upload_size(item: &MediaDescriptor, site: &Site) -> Option<bool> {
    exceeds_max_upload_size_with(item, site, &PolicyConfig::default())
}

/// Whether the item exceeds the site's upload limit.
///
/// `None` when the size or limit is unknown, or when the item is a video
/// going to a VideoPress-enabled site.
pub fn exceeds_max_upload_size_with(
    item: &MediaDescriptor,
    site: &Site,
    config: &PolicyConfig,
) -> Option<bool> {
    let size = item.size()?;
    let limit = site.options.as_ref()?.max_upload_size?;

    if is_videopress_exempt(item, site, config) {
        debug!(site = ?site.id, "video upload exempt from max_upload_size via VideoPress");
        return None;
    }

    Some(size > limit)
}

fn is_videopress_exempt(item: &MediaDescriptor, site: &Site, config: &PolicyConfig) -> bool {
    site.jetpack
        && jetpack_version(site).is_some_and(|v| v >= config.videopress_size_exempt_version)
        && site.is_module_active(&config.videopress_module)
        && mime_prefix_of(item) == Some("video")
}

fn jetpack_version(site: &Site) -> Option<Version> {
    site.options
        .as_ref()?
        .jetpack_version
        .as_deref()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::{FileHandle, MediaRecord};

    fn with_extension(ext: &str) -> MediaDescriptor {
        MediaRecord {
            extension: Some(ext.to_string()),
            ..Default::default()
        }
        .into()
    }

    fn sized(name: &str, size: u64) -> MediaDescriptor {
        MediaRecord {
            file: Some(name.to_string()),
            size: Some(size),
            ..Default::default()
        }
        .into()
    }

    // =========================================================================
    // allowed_file_types
    // =========================================================================

    #[test]
    fn allowed_file_types_without_site_is_empty() {
        assert!(allowed_file_types(None).is_empty());
        assert!(allowed_file_types(Some(&Site::default())).is_empty());
    }

    #[test]
    fn allowed_file_types_returned_as_given() {
        let site = site_allowing(&["gif", "PDF"]);
        assert_eq!(allowed_file_types(Some(&site)), ["gif", "PDF"]);
    }

    // =========================================================================
    // is_type_allowed
    // =========================================================================

    #[test]
    fn is_type_allowed_false_without_item_or_site() {
        let site = site_allowing(&["gif"]);
        assert!(!is_type_allowed(None, Some(&site)));
        assert!(!is_type_allowed(Some(&with_extension("gif")), None));
        assert!(!is_type_allowed(Some(&"".into()), Some(&site)));
    }

    #[test]
    fn is_type_allowed_matches_extension() {
        let site = site_allowing(&["pdf", "gif"]);
        assert!(is_type_allowed(Some(&with_extension("gif")), Some(&site)));
        assert!(!is_type_allowed(Some(&with_extension("exe")), Some(&site)));
    }

    #[test]
    fn is_type_allowed_is_case_insensitive() {
        let site = site_allowing(&["pdf"]);
        assert!(is_type_allowed(Some(&with_extension("PdF")), Some(&site)));
        let site = site_allowing(&["PDF"]);
        assert!(is_type_allowed(Some(&"report.pdf".into()), Some(&site)));
    }

    #[test]
    fn is_type_allowed_without_extension_is_false() {
        let site = site_allowing(&["pdf"]);
        assert!(!is_type_allowed(Some(&"README".into()), Some(&site)));
    }

    #[test]
    fn is_type_allowed_old_jetpack_fails_open() {
        let site = jetpack_site("3.8.1", &[]);
        assert!(is_type_allowed(Some(&with_extension("exe")), Some(&site)));
    }

    #[test]
    fn is_type_allowed_jetpack_without_version_fails_open() {
        let site = Site {
            jetpack: true,
            ..Default::default()
        };
        assert!(is_type_allowed(Some(&with_extension("exe")), Some(&site)));
    }

    #[test]
    fn is_type_allowed_current_jetpack_is_checked() {
        let mut site = jetpack_site("3.9.0", &[]);
        if let Some(o) = site.options.as_mut() {
            o.allowed_file_types = vec!["jpg".into()];
        }
        assert!(!is_type_allowed(Some(&with_extension("exe")), Some(&site)));
        assert!(is_type_allowed(Some(&with_extension("JPG")), Some(&site)));
    }

    #[test]
    fn is_type_allowed_prerelease_of_sync_version_fails_open() {
        let mut site = jetpack_site("3.9.0-alpha", &[]);
        if let Some(o) = site.options.as_mut() {
            o.allowed_file_types = vec!["jpg".into()];
        }
        assert!(is_type_allowed(Some(&"tool.exe".into()), Some(&site)));
    }

    #[test]
    fn is_type_allowed_with_custom_threshold() {
        let site = jetpack_site("4.1", &[]);
        let config = PolicyConfig {
            allowed_types_sync_version: "5.0".parse().unwrap(),
            ..Default::default()
        };
        assert!(is_type_allowed_with(
            Some(&with_extension("exe")),
            Some(&site),
            &config
        ));
    }

    // =========================================================================
    // exceeds_max_upload_size
    // =========================================================================

    #[test]
    fn exceeds_none_when_size_unknown() {
        let site = site_with_limit(Some(1024));
        assert_eq!(exceeds_max_upload_size(&with_extension("gif"), &site), None);
        assert_eq!(exceeds_max_upload_size(&"a.gif".into(), &site), None);
    }

    #[test]
    fn exceeds_none_without_options() {
        assert_eq!(
            exceeds_max_upload_size(&sized("a.gif", 10), &Site::default()),
            None
        );
    }

    #[test]
    fn exceeds_none_when_limit_is_false() {
        let site = site_with_limit(None);
        assert_eq!(exceeds_max_upload_size(&sized("a.gif", 10), &site), None);
    }

    #[test]
    fn exceeds_strict_comparison() {
        let site = site_with_limit(Some(1024));
        assert_eq!(
            exceeds_max_upload_size(&sized("a.gif", 1024), &site),
            Some(false)
        );
        assert_eq!(
            exceeds_max_upload_size(&sized("a.gif", 1025), &site),
            Some(true)
        );
        assert_eq!(
            exceeds_max_upload_size(&sized("a.gif", 0), &site),
            Some(false)
        );
    }

    #[test]
    fn exceeds_uses_file_handle_byte_length() {
        let site = site_with_limit(Some(4));
        let file = FileHandle::new("a.gif", vec![0; 5]);
        assert_eq!(exceeds_max_upload_size(&file.into(), &site), Some(true));
    }

    #[test]
    fn exceeds_videopress_exempts_video() {
        let mut site = jetpack_site("4.0.0", &["videopress"]);
        set_limit(&mut site, 1024);
        assert_eq!(exceeds_max_upload_size(&sized("clip.mp4", 4096), &site), None);
    }

    #[test]
    fn exceeds_videopress_still_checks_non_video() {
        let mut site = jetpack_site("4.0.0", &["videopress"]);
        set_limit(&mut site, 1024);
        assert_eq!(
            exceeds_max_upload_size(&sized("photo.jpg", 4096), &site),
            Some(true)
        );
    }

    #[test]
    fn exceeds_videopress_requires_module() {
        let mut site = jetpack_site("4.0.0", &["photon"]);
        set_limit(&mut site, 1024);
        assert_eq!(
            exceeds_max_upload_size(&sized("clip.mp4", 4096), &site),
            Some(true)
        );
    }

    #[test]
    fn exceeds_videopress_requires_version() {
        let mut site = jetpack_site("3.9.9", &["videopress"]);
        set_limit(&mut site, 1024);
        assert_eq!(
            exceeds_max_upload_size(&sized("clip.mp4", 4096), &site),
            Some(true)
        );
    }

    #[test]
    fn exceeds_videopress_prerelease_is_not_exempt() {
        let mut site = jetpack_site("4.0-beta1", &["videopress"]);
        set_limit(&mut site, 1024);
        assert_eq!(
            exceeds_max_upload_size(&sized("clip.mp4", 4096), &site),
            Some(true)
        );
    }

    #[test]
    fn exceeds_videopress_patch_release_is_exempt() {
        let mut site = jetpack_site("4.0-pl1", &["videopress"]);
        set_limit(&mut site, 1024);
        assert_eq!(exceeds_max_upload_size(&sized("clip.mp4", 4096), &site), None);
    }

    #[test]
    fn exceeds_videopress_requires_jetpack() {
        let mut site = jetpack_site("4.0.0", &["videopress"]);
        site.jetpack = false;
        set_limit(&mut site, 1024);
        assert_eq!(
            exceeds_max_upload_size(&sized("clip.mp4", 4096), &site),
            Some(true)
        );
    }
}
