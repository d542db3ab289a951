//!
//! # Numbered Output Export
//!
//! Each export writes `<prefix><i>.gds`, plus an optional `<prefix><i>.yml` parameter record,
//! into an [OutputDir]. The integer `i` is allocated per prefix, from a counter file kept in the directory.
//! Prefixes without a counter entry are seeded by scanning for the largest number among
//! that prefix's existing `*.gds` names.
//!
//! Outputs are first written to hidden temporary files in the output directory,
//! and only renamed into place once complete. A failed export leaves no partial files,
//! and does not consume an output number.
//!

// Std-Lib
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

// Crates.io
use regex::Regex;
use sdiskgds::GdsLibrary;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

// Local imports
use crate::error::{DiskError, DiskResult};
use crate::layout::Layout;
use crate::params::DiskParams;
use crate::utils::{ErrorContext, SerializationFormat};

/// Name of the counter file
pub const COUNTER_FILE: &str = ".sdisk-counter.json";

/// # Output Numbering Modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    /// Next unused number. Never overwrites.
    Next,
    /// Largest number used so far, for regenerating the latest output in place
    Latest,
}

/// # Persisted Output Counter
/// Next unused output number, per file-name prefix
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Counter {
    pub next: BTreeMap<String, u64>,
}
impl Counter {
    /// Next number for `prefix`, if it has been counted
    pub fn get(&self, prefix: &str) -> Option<u64> {
        self.next.get(prefix).copied()
    }
    /// Raise the next number for `prefix` to at least `next`
    pub fn advance(&mut self, prefix: &str, next: u64) {
        let entry = self.next.entry(prefix.to_string()).or_insert(next);
        *entry = (*entry).max(next);
    }
}

/// # Staged Outputs
/// Complete output files under temporary names, deleted on drop unless committed
#[derive(Debug)]
pub struct Staged {
    gds: NamedTempFile,
    record: Option<NamedTempFile>,
}

/// # Output Directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub path: PathBuf,
}
impl OutputDir {
    /// Create an [OutputDir] at `path`, creating the directory if necessary
    pub fn create(path: impl Into<PathBuf>) -> DiskResult<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }
    /// Scan for the largest number among `*.gds` files whose names start with `prefix`.
    /// Each name contributes the first run of digits following the prefix.
    /// Hidden files and names without digits are skipped.
    pub fn scan(&self, prefix: &str) -> DiskResult<Option<u64>> {
        let digits = Regex::new(r"[0-9]+").map_err(|e| DiskError::Boxed(Box::new(e)))?;
        let mut max: Option<u64> = None;
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("gds") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if !name.starts_with('.') => name,
                _ => continue,
            };
            let rest = match name.strip_prefix(prefix) {
                Some(rest) => rest,
                None => continue,
            };
            match digits.find(rest).map(|m| m.as_str().parse::<u64>()) {
                Some(Ok(num)) => max = Some(max.map_or(num, |m| m.max(num))),
                Some(Err(_)) => warn!("Skipping out-of-range output number in {}", name),
                None => debug!("Skipping unnumbered {}", name),
            }
        }
        Ok(max)
    }
    /// Path of our counter file
    pub fn counter_path(&self) -> PathBuf {
        self.path.join(COUNTER_FILE)
    }
    /// Load our [Counter]. Empty if no counter file exists.
    pub fn counter(&self) -> DiskResult<Counter> {
        match SerializationFormat::Json.open::<Counter>(self.counter_path()) {
            Ok(counter) => Ok(counter),
            Err(e) if e.is_not_found() => Ok(Counter::default()),
            Err(e) => Err(e.into()),
        }
    }
    /// Next unused number for `prefix`, seeded from [OutputDir::scan] if uncounted
    pub fn next_number(&self, prefix: &str) -> DiskResult<u64> {
        if let Some(next) = self.counter()?.get(prefix) {
            return Ok(next);
        }
        let next = self.scan(prefix)?.map_or(0, |m| m + 1);
        debug!(
            "No output counter for '{}' in {}; seeded at {}",
            prefix,
            self.path.display(),
            next
        );
        Ok(next)
    }
    fn advance(&self, prefix: &str, next: u64) -> DiskResult<()> {
        let mut counter = self.counter()?;
        counter.advance(prefix, next);
        SerializationFormat::Json.save(&counter, self.counter_path())?;
        Ok(())
    }
    /// Path of file number `num` with `prefix` and extension `ext`
    pub fn numbered(&self, prefix: &str, num: u64, ext: &str) -> PathBuf {
        self.path.join(format!("{}{}.{}", prefix, num, ext))
    }
    /// Create a hidden temporary file with extension `ext`, alongside our outputs
    fn tempfile(&self, ext: &str) -> DiskResult<NamedTempFile> {
        let file = tempfile::Builder::new()
            .prefix(".sdisk-")
            .suffix(&format!(".{}", ext))
            .tempfile_in(&self.path)?;
        Ok(file)
    }
    /// Write `lib`, and `params` if provided, to temporary files
    pub fn stage(&self, lib: &GdsLibrary, params: Option<&DiskParams>) -> DiskResult<Staged> {
        let mut gds = self.tempfile("gds")?;
        lib.write(BufWriter::new(gds.as_file_mut()))
            .map_err(|e| export_err(gds.path(), e))?;
        let record = match params {
            Some(params) => {
                let file = self.tempfile(SerializationFormat::Yaml.extension())?;
                params.save(file.path())?;
                Some(file)
            }
            None => None,
        };
        Ok(Staged { gds, record })
    }
    /// Rename `staged` outputs into place, numbered per `numbering`, and advance the counter.
    ///
    /// [Numbering::Next] skips any number whose GDSII or record file already exists.
    /// [Numbering::Latest] replaces the most recent number's files.
    pub fn commit(&self, staged: Staged, prefix: &str, numbering: Numbering) -> DiskResult<Exported> {
        let Staged {
            gds: mut staged_gds,
            record: staged_record,
        } = staged;
        let record_ext = SerializationFormat::Yaml.extension();
        let mut num = self.next_number(prefix)?;
        let (num, gds) = match numbering {
            Numbering::Latest => {
                let num = num.saturating_sub(1);
                let gds = self.numbered(prefix, num, "gds");
                staged_gds.persist(&gds).map_err(|e| e.error)?;
                (num, gds)
            }
            Numbering::Next => loop {
                let gds = self.numbered(prefix, num, "gds");
                let record = self.numbered(prefix, num, record_ext);
                if record.exists() {
                    warn!("{} already exists, skipping", record.display());
                    num += 1;
                    continue;
                }
                match staged_gds.persist_noclobber(&gds) {
                    Ok(_) => break (num, gds),
                    Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                        warn!("{} already exists, skipping", gds.display());
                        staged_gds = e.file;
                        num += 1;
                    }
                    Err(e) => return Err(e.error.into()),
                }
            },
        };
        let record = match staged_record {
            Some(file) => {
                let path = self.numbered(prefix, num, record_ext);
                let persisted = match numbering {
                    Numbering::Latest => file.persist(&path),
                    Numbering::Next => file.persist_noclobber(&path),
                };
                if let Err(e) = persisted {
                    if numbering == Numbering::Next {
                        if let Err(rm) = fs::remove_file(&gds) {
                            warn!("Failed to remove {}: {}", gds.display(), rm);
                        }
                    }
                    return Err(export_err(&path, e.error));
                }
                Some(path)
            }
            None => None,
        };
        self.advance(prefix, num + 1)?;
        Ok(Exported { num, gds, record })
    }
}

/// # Export Results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    /// Allocated output number
    pub num: u64,
    /// GDSII file path
    pub gds: PathBuf,
    /// Parameter-record file path, if written
    pub record: Option<PathBuf>,
}

/// Write `layout` to the next numbered GDSII file in `dir`, per `numbering`.
/// If `params` are provided, they are recorded in a same-numbered YAML file.
pub fn export(
    layout: &Layout,
    params: Option<&DiskParams>,
    dir: &OutputDir,
    prefix: &str,
    numbering: Numbering,
) -> DiskResult<Exported> {
    let lib = layout.to_gds()?;
    let staged = dir.stage(&lib, params)?;
    let exported = dir.commit(staged, prefix, numbering)?;
    info!("Wrote {}", exported.gds.display());
    if let Some(path) = &exported.record {
        info!("Wrote {}", path.display());
    }
    Ok(exported)
}

fn export_err(path: &Path, e: impl std::fmt::Display) -> DiskError {
    DiskError::Export {
        message: e.to_string(),
        stack: vec![ErrorContext::Export(path.display().to_string())],
    }
}
