//! Installing OCR language data onto durable storage
//!
//! Language data is copied from read-only sources into `<data_dir>/tessdata`.
//! A file that already exists at the destination is never replaced, so
//! installing is idempotent.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_embed::RustEmbed;

use super::engine::TESSDATA;

/// Copy buffer size
const BUFFER_SIZE: usize = 1024;

/// An enumerable, read-only collection of language data files
pub trait DataSource {
    /// File names available from this source
    fn list(&self) -> io::Result<Vec<String>>;

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Language data compiled into the binary
#[derive(RustEmbed)]
#[folder = "assets/tessdata/"]
struct BundledTessdata;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DataSource for EmbeddedSource {
    fn list(&self) -> io::Result<Vec<String>> {
        Ok(BundledTessdata::iter().map(Cow::into_owned).collect())
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = BundledTessdata::get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))?;
        Ok(Box::new(io::Cursor::new(file.data)))
    }
}

/// A directory of language data, read but never written
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for DirSource {
    fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(self.root.join(name))?))
    }
}

/// Several sources installed in order
#[derive(Default)]
pub struct Sources {
    sources: Vec<Box<dyn DataSource>>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl DataSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

/// What an install run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub bytes_copied: u64,
}

impl InstallReport {
    fn merge(&mut self, other: InstallReport) {
        self.copied.extend(other.copied);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
        self.bytes_copied += other.bytes_copied;
    }
}

/// Directory holding installed language data under `data_dir`
pub fn tessdata_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(TESSDATA)
}

/// Share directories searched for a system Tesseract install
const SYSTEM_SHARE_DIRS: &[&str] = &["/usr/share", "/usr/local/share", "/opt/homebrew/share"];

/// Tesseract's own language data directory, if one is installed.
///
/// `TESSDATA_PREFIX` wins when it names a usable directory, then the usual
/// distribution layouts are searched.
pub fn system_tessdata_dir() -> Option<PathBuf> {
    let prefix = std::env::var_os("TESSDATA_PREFIX").map(PathBuf::from);
    let shares: Vec<PathBuf> = SYSTEM_SHARE_DIRS.iter().map(PathBuf::from).collect();
    find_tessdata_dir(prefix.as_deref(), &shares)
}

/// First directory holding `*.traineddata` among `prefix` (itself or its
/// `tessdata/`) and, under each share dir, `tesseract-ocr/<version>/tessdata`
/// (newest version first), `tesseract-ocr/tessdata` and `tessdata`.
pub fn find_tessdata_dir(prefix: Option<&Path>, shares: &[PathBuf]) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(prefix) = prefix {
        candidates.push(prefix.to_path_buf());
        candidates.push(prefix.join(TESSDATA));
    }
    for share in shares {
        let versioned = share.join("tesseract-ocr");
        if let Ok(entries) = std::fs::read_dir(&versioned) {
            let mut versions: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path().join(TESSDATA))
                .collect();
            versions.sort();
            candidates.extend(versions.into_iter().rev());
        }
        candidates.push(share.join(TESSDATA));
    }
    candidates.into_iter().find(|dir| has_traineddata(dir))
}

fn has_traineddata(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|entries| {
        entries
            .filter_map(|e| e.ok())
            .any(|e| e.path().extension().is_some_and(|ext| ext == "traineddata"))
    })
}

/// Make sure `path` exists. Failure is logged, not returned.
pub fn prepare_directory(path: &Path) {
    if path.is_dir() {
        log::info!("Using directory {}", path.display());
        return;
    }
    match std::fs::create_dir_all(path) {
        Ok(()) => log::info!("Created directory {}", path.display()),
        Err(e) => log::error!(
            "Creation of directory {} failed, check write permissions: {}",
            path.display(),
            e
        ),
    }
}

/// Copy every file from `source` that `dest` does not already have
pub fn install<S: DataSource + ?Sized>(source: &S, dest: &Path) -> InstallReport {
    let mut report = InstallReport::default();
    let names = match source.list() {
        Ok(names) => names,
        Err(e) => {
            log::error!("Unable to list language data: {}", e);
            return report;
        }
    };

    for name in names {
        let target = dest.join(&name);
        if target.exists() {
            report.skipped.push(name);
            continue;
        }
        match copy_file(source, &name, &target) {
            Ok(bytes) => {
                log::debug!("Copied {} to {}", name, dest.display());
                report.bytes_copied += bytes;
                report.copied.push(name);
            }
            Err(e) => {
                log::error!("Unable to copy {} to {}: {:#}", name, dest.display(), e);
                report.failed.push(name);
            }
        }
    }
    report
}

/// Install from each source separately so one unreadable source does not block the rest
pub fn install_all(sources: &Sources, dest: &Path) -> InstallReport {
    let mut report = InstallReport::default();
    for source in &sources.sources {
        report.merge(install(source.as_ref(), dest));
    }
    report
}

fn copy_file<S: DataSource + ?Sized>(source: &S, name: &str, target: &Path) -> Result<u64> {
    let mut input = source
        .open(name)
        .with_context(|| format!("Failed to open bundled {}", name))?;
    let mut output =
        File::create(target).with_context(|| format!("Failed to create {}", target.display()))?;

    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let len = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read language data"),
        };
        output
            .write_all(&buf[..len])
            .with_context(|| format!("Failed to write {}", target.display()))?;
        total += len as u64;
    }
    output.flush()?;
    Ok(total)
}
