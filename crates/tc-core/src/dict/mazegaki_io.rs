use std::fs;
use std::path::Path;

use super::{write_atomic, DictError, MazegakiDict};

const MAGIC: &[u8; 4] = b"TCMZ";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5;

impl MazegakiDict {
    /// Serialize to bytes (TCMZ format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let body = bincode::serialize(self).map_err(DictError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (TCMZ format).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(DictError::UnsupportedVersion(bytes[4]));
        }
        bincode::deserialize(&bytes[HEADER_SIZE..]).map_err(DictError::Deserialize)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        write_atomic(path, &self.to_bytes()?)?;
        Ok(())
    }

    pub fn open_compiled(path: &Path) -> Result<Self, DictError> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Open either format, detected by the TCMZ magic.
    pub fn open_any(path: &Path) -> Result<Self, DictError> {
        let bytes = fs::read(path)?;
        if bytes.starts_with(MAGIC) {
            return Self::from_bytes(&bytes);
        }
        let text = String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self::parse(&text))
    }
}
