//! Temp-file-and-rename writes for the JSON files managed by the crate

use crate::core::{MigrateError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A fully written and synced temp file waiting to replace its target.
///
/// Dropping it without calling [`StagedWrite::commit`] deletes the temp file
/// and leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    /// Serializes `value` as pretty JSON next to `target`.
    pub fn stage<T: Serialize + ?Sized>(target: &Path, value: &T) -> Result<Self> {
        let parent = parent_dir(target);
        fs::create_dir_all(parent).map_err(|e| MigrateError::write(parent, e))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| MigrateError::write(target, e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, value)
                .map_err(|e| MigrateError::write(target, e))?;
            writer.write_all(b"\n").map_err(|e| MigrateError::write(target, e))?;
            writer.flush().map_err(|e| MigrateError::write(target, e))?;
        }
        temp.as_file().sync_all().map_err(|e| MigrateError::write(target, e))?;

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the temp file over the target.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| MigrateError::write(&target, e.error))?;
        debug!(path = %target.display(), "committed file");
        Ok(())
    }
}

/// Commits staged writes in order.
///
/// Callers stage every file before calling this, so a serialization or disk
/// failure never leaves a subset of targets replaced. The window left is the
/// gap between consecutive renames.
pub fn commit_all(writes: Vec<StagedWrite>) -> Result<()> {
    for write in writes {
        write.commit()?;
    }
    Ok(())
}

/// Atomically replaces a single file with pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    StagedWrite::stage(path, value)?.commit()
}

/// Reads and parses a JSON file. `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(MigrateError::read(path, e)),
    };
    debug!(path = %path.display(), bytes = content.len(), "read file");

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| MigrateError::read(path, format!("invalid JSON: {}", e)))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
