//! # mediakit
//!
//! Derivations for media items in an upload and gallery UI. An item arrives in
//! one of three shapes (a bare filename, a local file handle, or a record from
//! the media API) and the UI needs the same answers for all of them: what type
//! is it, which URL should be shown, may it be uploaded to this site, how is it
//! labelled in a gallery.
//!
//! Everything here is a pure function of its inputs. Nothing touches the
//! network, and indeterminate inputs produce `None` rather than an error.
//!
//! ```text
//! MediaDescriptor ──► identity ──┬──► urls      (display URL, proxy, resize)
//!                                ├──► policy    (allowed type, size limit)
//!                                └──► transient (placeholder records)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Wire types: `MediaDescriptor`, `MediaRecord`, `FileHandle`, `Site`, `Gallery` |
//! | [`naming`] | Filename helpers: query stripping, extension split, title stem |
//! | [`mime`] | Static extension to MIME type table |
//! | [`identity`] | Extension, MIME type and MIME prefix for any descriptor shape |
//! | [`urls`] | Display URL resolution, proxy and resize rewriting, thumbnail dimensions |
//! | [`version`] | Lenient dotted plugin version parsing and ordering |
//! | [`policy`] | Upload policy: allowed file types, max upload size |
//! | [`transient`] | Placeholder records for items still uploading, object URL capability |
//! | [`present`] | Duration text, date ordering, MIME filtering, gallery shortcode, delete permission |
//! | [`config`] | `mediakit.toml` loading, merging and validation |
//! | [`input`] | JSON file loading for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Tri-State Verdicts
//!
//! Some questions cannot be answered from the data the UI has. A site that
//! reports `max_upload_size: false` has no known limit; a VideoPress site
//! accepts videos past the limit. [`policy::exceeds_max_upload_size`] returns
//! `Option<bool>` so callers cannot confuse "unknown" with "fits".
//!
//! ## Stock Defaults With `_with` Variants
//!
//! Thresholds and naming rules that platforms change over time live in
//! [`config::MediaConfig`]. Each configurable operation has a plain form that
//! uses the stock values and a `_with` form that takes the relevant config
//! section, so library callers never need a config file.
//!
//! ## Object URLs as a Capability
//!
//! Turning a local file into a renderable URL allocates a resource. The
//! synthesizer takes a [`transient::ObjectUrlFactory`] rather than reaching
//! for a global, which keeps it testable and leaves release to the caller.

pub mod config;
pub mod identity;
pub mod input;
pub mod mime;
pub mod naming;
pub mod output;
pub mod policy;
pub mod present;
pub mod transient;
pub mod types;
pub mod urls;
pub mod version;

#[cfg(test)]
pub(crate) mod test_helpers;
