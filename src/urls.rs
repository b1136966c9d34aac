//! Display URL resolution.
//!
//! Decides which URL the UI shows for a media record and rewrites it for
//! resizing when asked. Rules, in order:
//!
//! 1. **Transient** records return their `URL` untouched. Their URL is a local
//!    object URL, so no resizing service can reach it.
//! 2. An explicit **thumbnail size** that the record has a URL for wins over
//!    every other option.
//! 3. **Proxy** (`photon`): the URL is routed through the image proxy,
//!    `https://i<N>.wp.com/<host><path>`, optionally with `w=<max_width>`.
//! 4. **Plain resize** (`max_width` without `photon`): `w=<max_width>` is set on
//!    the original URL's own query string.
//!
//! Only one rewrite applies per call.
//!
//! ## Proxy naming
//!
//! The shard `N` is derived from a SHA-256 digest of `/<host><path>`, so an
//! image always maps to the same proxy host and browser caches stay warm.
//! URLs already on a proxy host keep their host and path. Non-proxied URLs
//! with their own query string are refused (`None`): the proxy would drop
//! that query and serve a different image. Non-default ports are refused
//! for the same reason. Secure origins get `ssl=1` so the
//! proxy fetches over HTTPS.

use crate::config::{ProxyConfig, SizeConfig, default_thumbnail_sizes};
use crate::types::{MediaRecord, Site, Thumbnail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Query parameters that carry sizing for the resizing service.
const SIZE_PARAMS: &[&str] = &["w", "h", "resize", "fit"];

/// Options for [`resolve_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlOptions {
    pub photon: bool,
    pub max_width: Option<u32>,
    pub size: Option<String>,
}

/// Width and height of a named image size. Either may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Resolve the display URL of a record using the stock proxy naming.
pub fn resolve_url(media: &MediaRecord, options: &UrlOptions) -> Option<String> {
    resolve_url_with(media, options, &ProxyConfig::default())
}

/// Resolve the display URL of a record.
pub fn resolve_url_with(
    media: &MediaRecord,
    options: &UrlOptions,
    proxy: &ProxyConfig,
) -> Option<String> {
    if media.transient {
        return media.url.clone();
    }

    if let Some(url) = options
        .size
        .as_deref()
        .and_then(|size| media.thumbnails.get(size))
        .and_then(Thumbnail::url)
    {
        return Some(url.to_string());
    }

    let url = media.url.as_deref().filter(|u| !u.is_empty())?;

    if options.photon {
        return proxy_url(url, options.max_width, proxy);
    }

    Some(match options.max_width {
        Some(width) => resize_url(url, width),
        None => url.to_string(),
    })
}

/// Rewrite `url` through the image proxy, optionally capping its width.
///
/// Returns `None` for URLs the proxy cannot serve: unparseable ones and
/// non-proxied URLs that carry a query string or a non-default port.
pub fn proxy_url(url: &str, max_width: Option<u32>, proxy: &ProxyConfig) -> Option<String> {
    let parsed = match parse_lenient(url) {
        Some(parsed) => parsed,
        None => {
            debug!(url, "cannot proxy unparseable URL");
            return None;
        }
    };
    let host = parsed.host_str()?;

    let mut params: Vec<(&str, String)> = Vec::new();
    let base = if is_proxy_host(host, proxy) {
        format!("https://{host}{}", parsed.path())
    } else {
        if parsed.query().is_some() {
            debug!(url, "proxy does not support URLs with a query string");
            return None;
        }
        if parsed.port().is_some() {
            debug!(url, "proxy cannot reach origins on a non-default port");
            return None;
        }
        let path = format!("/{host}{}", parsed.path());
        let shard = shard_for(&path, proxy.shard_count);
        if parsed.scheme() == "https" {
            params.push(("ssl", "1".to_string()));
        }
        format!("https://i{shard}.{}{path}", proxy.host_suffix)
    };

    if let Some(width) = max_width {
        params.push(("w", width.to_string()));
    }

    let mut out = Url::parse(&base).ok()?;
    if !params.is_empty() {
        out.query_pairs_mut().extend_pairs(params);
    }
    Some(out.to_string())
}

/// Set `w=<width>` on a URL's own query string, replacing any sizing params.
///
/// Other query parameters and the fragment are preserved. Unparseable URLs
/// are returned unchanged.
pub fn resize_url(url: &str, width: u32) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        debug!(url, "cannot resize unparseable URL");
        return url.to_string();
    };
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !SIZE_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("w", &width.to_string());
    parsed.to_string()
}

/// Dimensions of a named image size using the stock fallback table.
pub fn thumbnail_dimensions(size_name: &str, site: Option<&Site>) -> Dimensions {
    thumbnail_dimensions_with(size_name, site, &default_thumbnail_sizes())
}

/// Dimensions of a named image size.
///
/// Each field comes from the site's `image_<size>_width` / `image_<size>_height`
/// option when present, else from `defaults`. Unknown sizes yield `None` fields.
pub fn thumbnail_dimensions_with(
    size_name: &str,
    site: Option<&Site>,
    defaults: &BTreeMap<String, SizeConfig>,
) -> Dimensions {
    let options = site.and_then(|s| s.options.as_ref());
    let fallback = defaults.get(size_name);

    let width = options
        .and_then(|o| o.number(&format!("image_{size_name}_width")))
        .or(fallback.map(|d| d.width));
    let height = options
        .and_then(|o| o.number(&format!("image_{size_name}_height")))
        .or(fallback.map(|d| d.height));

    Dimensions { width, height }
}

/// Parse absolute and protocol-relative (`//host/path`) URLs.
fn parse_lenient(url: &str) -> Option<Url> {
    if url.starts_with("//") {
        Url::parse(&format!("http:{url}")).ok()
    } else {
        Url::parse(url).ok()
    }
}

/// True for hosts of the form `i<digits>.<host_suffix>`.
fn is_proxy_host(host: &str, proxy: &ProxyConfig) -> bool {
    host.strip_suffix(&proxy.host_suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .and_then(|rest| rest.strip_prefix('i'))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn shard_for(path: &str, shard_count: u32) -> u32 {
    let digest = Sha256::digest(path.as_bytes());
    let n = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    n % shard_count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const IMAGE: &str = "https://secure.gravatar.com/blavatar/a.png";

    fn persisted(url: &str) -> MediaRecord {
        MediaRecord {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    fn options(photon: bool, max_width: Option<u32>, size: Option<&str>) -> UrlOptions {
        UrlOptions {
            photon,
            max_width,
            size: size.map(String::from),
        }
    }

    // =========================================================================
    // resolve_url
    // =========================================================================

    #[test]
    fn resolve_url_without_options_is_url() {
        assert_eq!(
            resolve_url(&persisted(IMAGE), &UrlOptions::default()).as_deref(),
            Some(IMAGE)
        );
    }

    #[test]
    fn resolve_url_without_url_is_none() {
        assert_eq!(
            resolve_url(&MediaRecord::default(), &options(false, Some(40), None)),
            None
        );
        assert_eq!(resolve_url(&persisted(""), &UrlOptions::default()), None);
    }

    #[test]
    fn resolve_url_transient_ignores_options() {
        let media = MediaRecord {
            transient: true,
            ..persisted("blob:mediakit/123")
        };
        for opts in [
            UrlOptions::default(),
            options(true, Some(450), None),
            options(false, Some(450), None),
            options(false, None, Some("thumbnail")),
        ] {
            assert_eq!(
                resolve_url(&media, &opts).as_deref(),
                Some("blob:mediakit/123")
            );
        }
    }

    #[test]
    fn resolve_url_thumbnail_size_wins() {
        let media = with_thumbnail(persisted(IMAGE), "thumbnail", "https://x/a-150x150.png");
        assert_eq!(
            resolve_url(&media, &options(true, Some(40), Some("thumbnail"))).as_deref(),
            Some("https://x/a-150x150.png")
        );
    }

    #[test]
    fn resolve_url_unknown_size_falls_through() {
        let media = with_thumbnail(persisted(IMAGE), "thumbnail", "https://x/a-150x150.png");
        assert_eq!(
            resolve_url(&media, &options(false, None, Some("large"))).as_deref(),
            Some(IMAGE)
        );
    }

    #[test]
    fn resolve_url_resizes_with_max_width() {
        assert_eq!(
            resolve_url(&persisted(IMAGE), &options(false, Some(450), None)).as_deref(),
            Some("https://secure.gravatar.com/blavatar/a.png?w=450")
        );
    }

    #[test]
    fn resolve_url_photon_without_width() {
        let url = resolve_url(&persisted(IMAGE), &options(true, None, None)).unwrap();
        assert!(url.starts_with("https://i"));
        assert!(url.ends_with(".wp.com/secure.gravatar.com/blavatar/a.png?ssl=1"));
    }

    #[test]
    fn resolve_url_photon_with_width() {
        let url = resolve_url(&persisted(IMAGE), &options(true, Some(450), None)).unwrap();
        assert!(url.ends_with("/secure.gravatar.com/blavatar/a.png?ssl=1&w=450"));
        assert!(!url.contains("?w=450&"));
    }

    // =========================================================================
    // proxy_url
    // =========================================================================

    #[test]
    fn proxy_url_is_deterministic() {
        let proxy = ProxyConfig::default();
        assert_eq!(
            proxy_url(IMAGE, None, &proxy),
            proxy_url(IMAGE, None, &proxy)
        );
    }

    #[test]
    fn proxy_url_shard_within_range() {
        let proxy = ProxyConfig::default();
        for i in 0..20 {
            let url = proxy_url(&format!("http://example.com/{i}.jpg"), None, &proxy).unwrap();
            let host = Url::parse(&url).unwrap().host_str().unwrap().to_string();
            assert!(is_proxy_host(&host, &proxy), "{host}");
            let shard: u32 = host[1..host.find('.').unwrap()].parse().unwrap();
            assert!(shard < 3);
        }
    }

    #[test]
    fn proxy_url_plain_http_has_no_ssl_flag() {
        let url = proxy_url("http://example.com/a.jpg", Some(100), &ProxyConfig::default()).unwrap();
        assert!(url.ends_with(".wp.com/example.com/a.jpg?w=100"));
    }

    #[test]
    fn proxy_url_refuses_query_strings() {
        assert_eq!(
            proxy_url("https://example.com/a.jpg?x=1", None, &ProxyConfig::default()),
            None
        );
    }

    #[test]
    fn proxy_url_refuses_explicit_port() {
        let proxy = ProxyConfig::default();
        assert_eq!(proxy_url("http://example.com:8080/a.jpg", None, &proxy), None);
        assert!(proxy_url("http://example.com:80/a.jpg", None, &proxy).is_some());
    }

    #[test]
    fn proxy_url_keeps_already_proxied_host() {
        assert_eq!(
            proxy_url(
                "https://i2.wp.com/example.com/a.jpg?ssl=1&w=20",
                Some(300),
                &ProxyConfig::default()
            )
            .as_deref(),
            Some("https://i2.wp.com/example.com/a.jpg?w=300")
        );
    }

    #[test]
    fn proxy_url_protocol_relative() {
        let url = proxy_url("//example.com/a.jpg", None, &ProxyConfig::default()).unwrap();
        assert!(url.ends_with(".wp.com/example.com/a.jpg"));
    }

    #[test]
    fn proxy_url_custom_host_suffix() {
        let proxy = ProxyConfig {
            host_suffix: "img.example.net".into(),
            shard_count: 1,
        };
        assert_eq!(
            proxy_url("https://example.com/a.jpg", None, &proxy).as_deref(),
            Some("https://i0.img.example.net/example.com/a.jpg?ssl=1")
        );
    }

    #[test]
    fn proxy_url_unparseable_is_none() {
        assert_eq!(proxy_url("not a url", None, &ProxyConfig::default()), None);
    }

    // =========================================================================
    // resize_url
    // =========================================================================

    #[test]
    fn resize_url_replaces_sizing_params() {
        assert_eq!(
            resize_url("https://example.com/a.jpg?w=20&h=10&crop=1", 300),
            "https://example.com/a.jpg?crop=1&w=300"
        );
    }

    #[test]
    fn resize_url_keeps_fragment() {
        assert_eq!(
            resize_url("https://example.com/a.jpg#top", 300),
            "https://example.com/a.jpg?w=300#top"
        );
    }

    #[test]
    fn resize_url_unparseable_unchanged() {
        assert_eq!(resize_url("/relative/a.jpg", 300), "/relative/a.jpg");
    }

    // =========================================================================
    // thumbnail_dimensions
    // =========================================================================

    #[test]
    fn thumbnail_dimensions_defaults_without_site() {
        assert_eq!(
            thumbnail_dimensions("thumbnail", None),
            Dimensions {
                width: Some(150),
                height: Some(150)
            }
        );
        assert_eq!(thumbnail_dimensions("large", None).width, Some(1024));
    }

    #[test]
    fn thumbnail_dimensions_from_site_options() {
        let site = site_with_options(|o| {
            o.extra
                .insert("image_medium_width".into(), serde_json::json!(400));
            o.extra
                .insert("image_medium_height".into(), serde_json::json!("250"));
        });
        assert_eq!(
            thumbnail_dimensions("medium", Some(&site)),
            Dimensions {
                width: Some(400),
                height: Some(250)
            }
        );
    }

    #[test]
    fn thumbnail_dimensions_fills_missing_site_field_from_defaults() {
        let site = site_with_options(|o| {
            o.extra
                .insert("image_thumbnail_width".into(), serde_json::json!(200));
        });
        assert_eq!(
            thumbnail_dimensions("thumbnail", Some(&site)),
            Dimensions {
                width: Some(200),
                height: Some(150)
            }
        );
    }

    #[test]
    fn thumbnail_dimensions_custom_size_from_site_only() {
        let site = site_with_options(|o| {
            o.extra
                .insert("image_hero_width".into(), serde_json::json!(1600));
        });
        assert_eq!(
            thumbnail_dimensions("hero", Some(&site)),
            Dimensions {
                width: Some(1600),
                height: None
            }
        );
    }

    #[test]
    fn thumbnail_dimensions_unknown_size() {
        assert_eq!(thumbnail_dimensions("huge", None), Dimensions::default());
        assert_eq!(
            thumbnail_dimensions("huge", Some(&Site::default())),
            Dimensions::default()
        );
    }
}
