//! FILENAME: app/src/sink.rs
//! Download sinks - where a finished workbook ends up.
//!
//! The CLI writes into a directory the way a browser writes into its
//! download folder; embedders and tests collect the bytes in memory.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension given to names that have none.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// Upper bound on " (n)" suffixes tried before giving up.
const MAX_DUPLICATE_SUFFIX: u32 = 9_999;

/// Result of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Name the file was finally stored under (after de-duplication).
    pub file_name: String,
    /// Full path, for sinks that write to disk.
    pub location: Option<PathBuf>,
    pub size: usize,
}

/// Receives the bytes of a finished export.
pub trait DownloadSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<Delivery>;
}

// ============================================================================
// DIRECTORY SINK
// ============================================================================

#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink {
            dir: dir.into(),
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_new(&self, name: &str, bytes: &[u8]) -> io::Result<(String, PathBuf)> {
        let (stem, ext) = split_extension(name);

        for n in 0..=MAX_DUPLICATE_SUFFIX {
            let candidate = if n == 0 {
                name.to_string()
            } else {
                format!("{} ({}).{}", stem, n, ext)
            };
            let path = self.dir.join(&candidate);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    file.flush()?;
                    return Ok((candidate, path));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("No free file name left for '{}' in {:?}", name, self.dir),
        ))
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<Delivery> {
        let name = normalize_file_name(file_name)?;
        std::fs::create_dir_all(&self.dir)?;

        let (stored_name, path) = if self.overwrite {
            let path = self.dir.join(&name);
            std::fs::write(&path, bytes)?;
            (name, path)
        } else {
            self.write_new(&name, bytes)?
        };

        log::info!(target: "SINK", "Wrote {} bytes to {:?}", bytes.len(), path);

        Ok(Delivery {
            file_name: stored_name,
            location: Some(path),
            size: bytes.len(),
        })
    }
}

/// Rejects anything that could leave the target directory and adds the
/// default extension to bare names.
pub fn normalize_file_name(file_name: &str) -> io::Result<String> {
    let name = file_name.trim();

    if name.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "File name is empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("File name '{}' must not contain path separators or '..'", name),
        ));
    }

    if Path::new(name).extension().is_some() {
        Ok(name.to_string())
    } else {
        Ok(format!("{}.{}", name, DEFAULT_EXTENSION))
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot + 1..]),
        _ => (name, DEFAULT_EXTENSION),
    }
}

// ============================================================================
// MEMORY SINK
// ============================================================================

/// A file held by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Keeps every delivery in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<DeliveredFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&DeliveredFile> {
        self.files.last()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<Delivery> {
        self.files.push(DeliveredFile {
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(Delivery {
            file_name: file_name.to_string(),
            location: None,
            size: bytes.len(),
        })
    }
}
