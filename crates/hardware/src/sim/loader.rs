//! Binary Loader.
//!
//! Reads raw (flat) memory images from disk. Placing the bytes is done by
//! [`Simulator::load_image`](crate::sim::Simulator::load_image), which writes them
//! through the target slave's backdoor.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::LoadError;

/// Loads a binary file from disk into a byte vector.
///
/// # Arguments
///
/// * `path` - Path to the raw image.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read.
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), len = bytes.len(), "image read");
    Ok(bytes)
}
