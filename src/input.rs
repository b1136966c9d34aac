//! Reading descriptors, sites and galleries from JSON files.
//!
//! Used by the CLI. A positional argument naming an existing `.json` file is
//! parsed as JSON; anything else is taken as a bare filename descriptor.

use crate::types::MediaDescriptor;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Interpret a CLI argument as a descriptor: a JSON file or a bare filename.
pub fn read_descriptor(arg: &str) -> Result<MediaDescriptor, InputError> {
    let path = Path::new(arg);
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json && path.is_file() {
        load_json(path)
    } else {
        Ok(MediaDescriptor::Filename(arg.to_string()))
    }
}
