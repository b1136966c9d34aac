//! Shared input and output types.
//!
//! Every structure here mirrors the JSON shape the media API and the upload UI
//! exchange, so field names on the wire keep their original spelling (`ID`,
//! `URL`, `author_ID`, `type`). All fields that can be missing in practice are
//! optional: derivation functions must cope with any subset being absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a media item.
///
/// Persisted items carry the numeric post ID assigned by the server. Transient
/// items carry a generated string key (`media-…`) until the upload completes.
///
/// Ordering: numbers compare numerically and sort before string keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Number(u64),
    Key(String),
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Number(n) => write!(f, "{n}"),
            MediaId::Key(k) => f.write_str(k),
        }
    }
}

impl From<u64> for MediaId {
    fn from(n: u64) -> Self {
        MediaId::Number(n)
    }
}

/// A thumbnail entry: either a ready URL or only its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Thumbnail {
    Url(String),
    Dimensions {
        width: Option<u32>,
        height: Option<u32>,
    },
}

impl Thumbnail {
    pub fn url(&self) -> Option<&str> {
        match self {
            Thumbnail::Url(u) => Some(u),
            Thumbnail::Dimensions { .. } => None,
        }
    }
}

/// A native binary file picked by the user but not yet uploaded.
///
/// Unknown fields are rejected so that record-shaped JSON carrying a `name`
/// does not deserialize as a file handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileHandle {
    pub name: String,
    /// MIME hint reported by the picker. Often empty for unusual extensions.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing)]
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A structured media record, persisted or transient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaRecord {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<MediaId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display name supplied by external sources (e.g. a photo library picker).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Byte size. Non-numeric values from the wire are dropped.
    #[serde(
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub transient: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub thumbnails: BTreeMap<String, Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videopress_guid: Option<String>,
    #[serde(rename = "author_ID", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Any of the shapes a caller may hand in as "media".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaDescriptor {
    Filename(String),
    File(FileHandle),
    Record(MediaRecord),
}

impl MediaDescriptor {
    /// The empty filename is the only "falsy" descriptor.
    pub fn is_empty(&self) -> bool {
        matches!(self, MediaDescriptor::Filename(s) if s.is_empty())
    }

    pub fn as_record(&self) -> Option<&MediaRecord> {
        match self {
            MediaDescriptor::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Byte size when the shape carries one.
    pub fn size(&self) -> Option<u64> {
        match self {
            MediaDescriptor::Filename(_) => None,
            MediaDescriptor::File(f) => Some(f.size()),
            MediaDescriptor::Record(r) => r.size,
        }
    }
}

impl From<&str> for MediaDescriptor {
    fn from(s: &str) -> Self {
        MediaDescriptor::Filename(s.to_string())
    }
}

impl From<String> for MediaDescriptor {
    fn from(s: String) -> Self {
        MediaDescriptor::Filename(s)
    }
}

impl From<FileHandle> for MediaDescriptor {
    fn from(f: FileHandle) -> Self {
        MediaDescriptor::File(f)
    }
}

impl From<MediaRecord> for MediaDescriptor {
    fn from(r: MediaRecord) -> Self {
        MediaDescriptor::Record(r)
    }
}

/// What the current user may do on a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub delete_posts: bool,
    pub delete_others_posts: bool,
}

/// Per-site settings relevant to media handling.
///
/// Image size settings arrive as flat keys (`image_thumbnail_width`,
/// `image_medium_height`, ...) and are kept in [`SiteOptions::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOptions {
    pub allowed_file_types: Vec<String>,
    /// Upload limit in bytes. `false` on the wire means unlimited or unknown.
    #[serde(
        deserialize_with = "upload_limit",
        serialize_with = "serialize_upload_limit"
    )]
    pub max_upload_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jetpack_version: Option<String>,
    pub active_modules: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SiteOptions {
    /// Read a numeric option that may be sent as a number or numeric string.
    pub fn number(&self, key: &str) -> Option<u32> {
        match self.extra.get(key)? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Read-only site description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub jetpack: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<SiteOptions>,
    pub capabilities: Capabilities,
}

impl Site {
    pub fn is_module_active(&self, module: &str) -> bool {
        self.options
            .as_ref()
            .is_some_and(|o| o.active_modules.iter().any(|m| m == module))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: u64,
}

/// Gallery settings as edited in the gallery dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gallery {
    pub items: Vec<MediaRecord>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub gallery_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

// =============================================================================
// Wire helpers
// =============================================================================

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        _ => None,
    })
}

fn upload_limit<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn serialize_upload_limit<S>(limit: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match limit {
        Some(n) => serializer.serialize_u64(*n),
        None => serializer.serialize_bool(false),
    }
}
