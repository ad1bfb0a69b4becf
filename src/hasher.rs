//! Content hashing for duplicate detection.
//!
//! Files are streamed through SHA-256 in fixed-size chunks, so arbitrarily large
//! files never need to fit in memory.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Buffer size for reading files (8KB)
const BUFFER_SIZE: usize = 8192;

/// Lowercase hex SHA-256 digest of a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the content hash of a file.
///
/// # Errors
///
/// Propagates any I/O error from opening or reading the file.
pub fn content_hash(path: &Path) -> std::io::Result<ContentHash> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Maps each content hash to the first path observed with it during a run.
///
/// The table lives only for one invocation and is never written to disk.
#[derive(Debug, Default, Clone)]
pub struct SeenHashes {
    first_seen: HashMap<ContentHash, PathBuf>,
}

impl SeenHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path` under `hash` unless the hash is already known.
    ///
    /// Returns the earlier path when the hash had been seen before; the table
    /// keeps that first path.
    pub fn record(&mut self, hash: ContentHash, path: PathBuf) -> Option<PathBuf> {
        match self.first_seen.get(&hash) {
            Some(existing) => Some(existing.clone()),
            None => {
                self.first_seen.insert(hash, path);
                None
            }
        }
    }

    pub fn first_seen(&self, hash: &ContentHash) -> Option<&Path> {
        self.first_seen.get(hash).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}
