use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::RecordCollection;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid streaming history export", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode an in-memory export.
pub fn parse(bytes: &[u8]) -> serde_json::Result<RecordCollection> {
    serde_json::from_slice(bytes)
}

/// Read and decode the export at `path`.
///
/// The whole file is read before decoding starts.
pub fn load(path: impl AsRef<Path>) -> Result<RecordCollection, LoadError> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    let collection = parse(&bytes).map_err(|source| LoadError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "decoded {} playback events from {}",
        collection.len(),
        path.display()
    );

    Ok(collection)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
