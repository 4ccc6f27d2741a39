// crates/geoverride-core/src/directory/loader.rs

//! Handles the Physical Layer (I/O, Decompression) for base directories:
//! JSON exports in, bincode snapshots out and back in.

use super::BaseDirectory;
use crate::error::{GeoOverrideError, Result};
use bincode::Options;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Appended to the JSON file name to locate its binary snapshot.
#[cfg(not(feature = "compact"))]
pub const SNAPSHOT_SUFFIX: &str = "dir.bin";
#[cfg(feature = "compact")]
pub const SNAPSHOT_SUFFIX: &str = "dir.comp.bin";

/// Guards against malformed or hostile snapshots.
const SNAPSHOT_LIMIT: u64 = 64 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

impl BaseDirectory {
    /// Parses a JSON export from any reader.
    #[cfg(feature = "json")]
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a JSON export, transparently un-gzipping `.json.gz` files.
    #[cfg(feature = "json")]
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_stream(path)?;
        let dir = Self::from_json_reader(reader)?;
        info!(
            path = %path.display(),
            states = dir.states.len(),
            "loaded base directory"
        );
        Ok(dir)
    }

    /// Loads a JSON export through its binary snapshot.
    ///
    /// The snapshot (`<file>.<SNAPSHOT_SUFFIX>`) is used when it is newer
    /// than the JSON; otherwise the JSON is parsed and the snapshot is
    /// rewritten. A snapshot that cannot be written is only logged.
    #[cfg(feature = "json")]
    pub fn load_cached(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = snapshot_path(path);

        if is_snapshot_fresh(path, &snapshot) {
            match Self::read_snapshot(&snapshot) {
                Ok(dir) => {
                    debug!(path = %snapshot.display(), "using base directory snapshot");
                    return Ok(dir);
                }
                Err(e) => warn!(path = %snapshot.display(), error = %e, "ignoring unreadable snapshot"),
            }
        }

        let dir = Self::load_from_path(path)?;
        if let Err(e) = dir.write_snapshot(&snapshot) {
            warn!(path = %snapshot.display(), error = %e, "could not write snapshot");
        }
        Ok(dir)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode_options().serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode_options().deserialize(data)?)
    }

    /// Writes the binary snapshot, gzip-compressed when `compact` is on.
    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);

        #[cfg(feature = "compact")]
        let mut writer = GzEncoder::new(writer, Compression::default());
        #[cfg(not(feature = "compact"))]
        let mut writer = writer;

        writer.write_all(&self.to_bytes()?)?;

        #[cfg(feature = "compact")]
        writer.finish()?.flush()?;
        #[cfg(not(feature = "compact"))]
        writer.flush()?;

        Ok(())
    }

    pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = open_stream(path.as_ref())?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder if the content
/// starts with the gzip magic bytes.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoOverrideError::NotFound(format!("Directory not found at {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if !is_gzip {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(GeoOverrideError::InvalidData(format!(
            "{} is gzip-compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

pub(crate) fn snapshot_path(json_path: &Path) -> PathBuf {
    let filename = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    json_path.with_file_name(format!("{filename}.{SNAPSHOT_SUFFIX}"))
}

/// Strictly newer only: filesystems with coarse mtimes can stamp a JSON
/// rewrite and the previous snapshot with the same time.
fn is_snapshot_fresh(json_path: &Path, snapshot: &Path) -> bool {
    let snapshot_time = match fs::metadata(snapshot).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match fs::metadata(json_path).and_then(|m| m.modified()) {
        Ok(json_time) => json_time < snapshot_time,
        Err(_) => true,
    }
}
