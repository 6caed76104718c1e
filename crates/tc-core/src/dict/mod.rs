//! Composition dictionaries.
//!
//! Static tables (`BushuDict`, `MazegakiDict`) are parsed from text once at
//! startup. Learned overlays (`BushuAutoDict`, `MazegakiLru`) are mutable,
//! carry a dirty flag and are saved on demand.

mod bushu;
mod bushu_auto;
mod mazegaki;
mod mazegaki_io;
mod mazegaki_lru;

pub use bushu::BushuDict;
pub use bushu_auto::{AutoEntry, BushuAutoDict, DISABLED_MARKER};
pub use mazegaki::{split_candidates, MazegakiDict, INFLECTION_MARKER};
pub use mazegaki_lru::MazegakiLru;

use std::fs;
use std::io;
use std::path::Path;

/// Error type for dictionary file I/O and the compiled Mazegaki format (TCMZ).
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected TCMZ)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// Atomic write: write to .tmp then rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a text file, treating a missing file as empty.
pub(crate) fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
