//! Materializer - writes ordered shard groups to the staging directory

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::{RelayError, Shard, StagedFile};
use observability::{record_file_staged, record_partial_group};
use tracing::{debug, warn};

/// Derive a local filename from a destination URL.
///
/// Takes the leading run of filename characters (alphanumeric, `_`, `-`,
/// `.`, space) after the last `/`. Trailing query strings are dropped by the
/// charset cut-off. Returns `None` when the destination has no `/` or the
/// run is empty.
pub fn derive_filename(destination: &str) -> Option<String> {
    let (_, tail) = destination.rsplit_once('/')?;

    let filename: String = tail
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
        .collect();

    if filename.is_empty() {
        None
    } else {
        Some(filename)
    }
}

/// Writes reassembled files into a staging directory.
pub struct Materializer {
    staging_root: PathBuf,
}

impl Materializer {
    /// Create a materializer rooted at `staging_root`.
    ///
    /// The directory is created if it does not exist.
    pub fn new(staging_root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let staging_root = staging_root.into();
        fs::create_dir_all(&staging_root)?;
        Ok(Self { staging_root })
    }

    /// Staging directory this materializer writes into
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Materialize one destination's ordered, decoded shards.
    ///
    /// Payloads are concatenated in slice order with no delimiter, exactly
    /// reproducing the original byte layout. Any existing file at the target
    /// path is removed first so no stale bytes survive. The file handle is
    /// released on every exit path.
    ///
    /// # Errors
    /// - `PathParse` when no filename can be derived from the destination
    /// - `StagingWrite` on any filesystem failure, carrying path and destination
    pub fn materialize(
        &self,
        destination: &str,
        shards: &[Shard],
    ) -> Result<StagedFile, RelayError> {
        let filename = derive_filename(destination).ok_or_else(|| RelayError::PathParse {
            destination: destination.to_string(),
        })?;
        let path = self.staging_root.join(filename);

        // Avoid old data by removing any existing file at the target path
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                RelayError::staging_write(destination, path.display().to_string(), e.to_string())
            })?;
        }

        let bytes_written = self.write_shards(destination, &path, shards)?;

        self.note_partial(destination, shards);
        record_file_staged(destination, bytes_written);
        debug!(
            destination = %destination,
            path = %path.display(),
            bytes = bytes_written,
            shards = shards.len(),
            "file staged"
        );

        Ok(StagedFile {
            destination: destination.to_string(),
            local_path: path,
        })
    }

    fn write_shards(
        &self,
        destination: &str,
        path: &Path,
        shards: &[Shard],
    ) -> Result<u64, RelayError> {
        let map_err = |e: std::io::Error| {
            RelayError::staging_write(destination, path.display().to_string(), e.to_string())
        };

        let mut file = File::create(path).map_err(map_err)?;
        let mut bytes_written = 0u64;

        for shard in shards {
            file.write_all(&shard.payload).map_err(map_err)?;
            bytes_written += shard.payload.len() as u64;
        }
        file.flush().map_err(map_err)?;

        Ok(bytes_written)
    }

    /// Declared count is informational; a mismatch is surfaced, not enforced.
    fn note_partial(&self, destination: &str, shards: &[Shard]) {
        if let Some(first) = shards.first() {
            if first.total_count as usize != shards.len() {
                warn!(
                    destination = %destination,
                    declared = first.total_count,
                    actual = shards.len(),
                    "shard count differs from declared total"
                );
                record_partial_group(destination);
            }
        }
    }
}
