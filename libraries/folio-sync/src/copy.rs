//! Verified copy and move of work directories
//!
//! Features:
//! - SHA256 verification of copied files before a move deletes its source
//! - Rename-first moves with a copy+verify+delete fallback for cross-device
//!   destinations
//! - Pruning of empty ancestor directories left behind by relocation

use crate::Result;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Default buffer size for file operations (64KB)
const BUFFER_SIZE: usize = 64 * 1024;

/// Compute SHA256 hash of a file
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hasher.finalize();
    Ok(hex::encode(hash))
}

/// Copy a file with optional verification
///
/// A copy that fails verification is removed before the error is returned.
pub fn copy_file_verified(source: &Path, dest: &Path, verify: bool) -> Result<()> {
    let source_hash = if verify {
        Some(compute_file_hash(source)?)
    } else {
        None
    };

    fs::copy(source, dest)?;

    if let Some(expected_hash) = source_hash {
        let actual_hash = compute_file_hash(dest)?;
        if expected_hash != actual_hash {
            let _ = fs::remove_file(dest);
            return Err(std::io::Error::other(format!(
                "file verification failed: hash mismatch for {}",
                dest.display()
            ))
            .into());
        }
        tracing::debug!("File verification passed: {}", dest.display());
    }

    Ok(())
}

/// Recursively copy a directory tree
pub fn copy_dir(source: &Path, dest: &Path, verify: bool) -> Result<()> {
    fs::create_dir_all(dest)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target, verify)?;
        } else {
            copy_file_verified(&entry.path(), &target, verify)?;
        }
    }

    Ok(())
}

/// Move a directory tree
///
/// Tries a rename first (fast on the same filesystem). The fallback copies
/// with verification and deletes the source only after every file verified;
/// a failed fallback copy removes the partial destination, so the source is
/// never lost.
pub fn move_dir(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    if let Err(e) = copy_dir(source, dest, true) {
        let _ = fs::remove_dir_all(dest);
        return Err(e);
    }
    fs::remove_dir_all(source)?;

    Ok(())
}

/// Remove empty ancestors of `path` up to (but not including) `stop_at`
///
/// Relocation leaves empty artist/genre folders behind; this prunes them.
pub fn remove_empty_ancestors(path: &Path, stop_at: &Path) {
    let mut current = path.to_path_buf();
    while let Some(parent) = current.parent() {
        if parent == stop_at || !parent.starts_with(stop_at) {
            break;
        }
        if fs::read_dir(parent).map_or(true, |mut entries| entries.next().is_some()) {
            break;
        }
        let _ = fs::remove_dir(parent);
        current = parent.to_path_buf();
    }
}
