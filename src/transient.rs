//! Transient records for items that have not been uploaded yet.
//!
//! The upload UI shows a placeholder as soon as the user picks something. The
//! placeholder is a [`MediaRecord`] with `transient: true` and a generated
//! `media-<seq>-<uuid>` ID, built from whichever shape was picked:
//!
//! | Input | `file` | Extra fields |
//! |---|---|---|
//! | Filename | the filename | none |
//! | File handle | the handle's name | `size`, `URL` = `guid` = new object URL |
//! | Record | its `name`, else its `URL`, else its `file` | `guid` = `URL`; `external: true` when it has a `URL`, thumbnails or is marked external |
//!
//! `title` is the chosen filename without its extension. Extension and MIME type
//! come from the identity resolver applied to the same input.
//!
//! ## Object URLs
//!
//! A local file needs a URL the UI can render before the upload finishes.
//! Creating one allocates a resource the caller must release, so it goes
//! through the [`ObjectUrlFactory`] capability rather than a global. The
//! in-process implementation is [`BlobRegistry`].

use crate::identity::{extension_of, mime_type_of};
use crate::naming::title_from_filename;
use crate::types::{FileHandle, MediaDescriptor, MediaId, MediaRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Creates URLs that refer to in-memory file payloads.
pub trait ObjectUrlFactory {
    /// Register the payload and return a URL for it.
    ///
    /// The URL stays valid until the caller releases it through the
    /// implementation's own API.
    fn create_object_url(&self, file: &FileHandle) -> String;
}

/// In-process object URL store.
///
/// Payloads stay in memory until [`BlobRegistry::revoke`] is called. Nothing
/// is released automatically.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    blobs: Mutex<HashMap<String, StoredBlob>>,
}

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    mime_type: Option<String>,
}

impl BlobRegistry {
    pub const URL_PREFIX: &'static str = "blob:mediakit/";

    pub fn new() -> Self {
        Self::default()
    }

    /// Payload bytes behind an object URL, if still registered.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.lock().get(url).map(|b| b.bytes.clone())
    }

    /// MIME hint recorded with the payload.
    pub fn mime_type(&self, url: &str) -> Option<String> {
        self.lock().get(url).and_then(|b| b.mime_type.clone())
    }

    /// Release an object URL. Returns `false` if it was not registered.
    pub fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredBlob>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectUrlFactory for BlobRegistry {
    fn create_object_url(&self, file: &FileHandle) -> String {
        let url = format!("{}{}", Self::URL_PREFIX, Uuid::new_v4());
        self.lock().insert(
            url.clone(),
            StoredBlob {
                bytes: file.bytes.clone(),
                mime_type: file.mime_type.clone(),
            },
        );
        url
    }
}

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique ID for a transient record.
///
/// `media-<seq>-<uuid>`, where `seq` is a zero-padded hex counter, so keys
/// created later compare greater and date ties sort newest first.
pub fn transient_id() -> MediaId {
    let seq = NEXT_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
    MediaId::Key(format!("media-{seq:016x}-{}", Uuid::new_v4().simple()))
}

/// Build a transient placeholder record for `input`.
pub fn make_transient(input: &MediaDescriptor, object_urls: &dyn ObjectUrlFactory) -> MediaRecord {
    let mut record = MediaRecord {
        id: Some(transient_id()),
        transient: true,
        extension: extension_of(input).map(String::from),
        mime_type: mime_type_of(input).map(String::from),
        ..Default::default()
    };

    let file_name = match input {
        MediaDescriptor::Filename(name) => Some(name.clone()),
        MediaDescriptor::File(file) => {
            let url = object_urls.create_object_url(file);
            record.size = Some(file.size());
            record.guid = Some(url.clone());
            record.url = Some(url);
            Some(file.name.clone())
        }
        MediaDescriptor::Record(source) => {
            let url = source.url.clone().filter(|u| !u.is_empty());
            record.external = url.is_some() || source.external || !source.thumbnails.is_empty();
            record.guid = url.clone();
            record.url = url.clone();
            [source.name.clone(), url, source.file.clone()]
                .into_iter()
                .flatten()
                .find(|n| !n.is_empty())
        }
    };

    let file_name = file_name.filter(|n| !n.is_empty());
    record.title = file_name.as_deref().map(title_from_filename);
    record.file = file_name;
    record
}
