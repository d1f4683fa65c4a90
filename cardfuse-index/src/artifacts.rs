//! Artifact rendering and writing
//!
//! Artifacts are rendered to memory first and only written once every one of
//! them rendered, so a failed run never leaves a partial set behind. Each
//! file is replaced through a temporary sibling and a rename.
//!
//! - CSV: header row always present, minimal quoting, CRLF line endings
//! - JSON: two-space indentation, non-ASCII text kept verbatim

use cardfuse_common::{Error, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A rendered output file waiting to be written
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn csv<T: Serialize>(path: PathBuf, header: &[&str], rows: &[T]) -> Result<Self> {
        Ok(Self {
            path,
            bytes: render_csv(header, rows)?,
        })
    }

    pub fn json<T: Serialize + ?Sized>(path: PathBuf, value: &T) -> Result<Self> {
        Ok(Self {
            path,
            bytes: render_json(value)?,
        })
    }
}

pub fn render_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

/// Replace `path` with `bytes` via a temporary file in the same directory
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let mut file = File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Write every artifact in order
pub fn write_all(artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        write_atomic(&artifact.path, &artifact.bytes)?;
        debug!(path = %artifact.path.display(), bytes = artifact.bytes.len(), "Artifact written");
    }
    Ok(())
}
