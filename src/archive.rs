//! High-level encode / decode API, the surface the CLI embeds.
//!
//! ```no_run
//! use fca::archive::{decode, encode, DecodeOptions, EncodeOptions};
//! use fca::identity::IdentityTable;
//! use std::path::{Path, PathBuf};
//!
//! let n = encode(
//!     Path::new("dumps.fca"),
//!     &[],
//!     &[PathBuf::from("dumps/")],
//!     &EncodeOptions::default(),
//! )?;
//!
//! let table = IdentityTable::load(None);
//! let m = decode(Path::new("dumps.fca"), Path::new("out/"), &DecodeOptions::default(), &table)?;
//! assert_eq!(n, m);
//! # Ok::<(), fca::FcaError>(())
//! ```

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{FcaError, Result};
use crate::identity::{extract_key, resolve, IdentityKey, IdentityTable};
use crate::io_stream::{FcaReader, FcaWriter};
use crate::naming::{md5_hex, resolve_path};
use crate::record::FileType;

// ── Options ──────────────────────────────────────────────────────────────────

/// Configuration for [`encode`].
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Walked files whose path relative to their input directory contains
    /// this string are skipped.  Explicit input files are never excluded.
    pub exclude: Option<String>,
}

/// Configuration for [`decode`].
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Write resolved figures without the `.bin` extension.
    pub use_pro_naming: bool,
}

// ── RecordInfo ───────────────────────────────────────────────────────────────

/// Lightweight descriptor returned by [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    /// 1-based position in the archive.
    pub index:       usize,
    pub file_type:   FileType,
    pub reserved:    u8,
    pub header_size: u16,
    pub total_size:  u32,
    pub size:        usize,
    pub md5:         String,
    pub identity:    Option<IdentityKey>,
}

// ── Input collection ─────────────────────────────────────────────────────────

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Resolve explicit files and recursive directory walks into a sorted,
/// deduplicated list of canonical paths.  Dotfiles and dot-directories
/// found while walking are skipped.
pub fn collect_inputs(
    input_files: &[PathBuf],
    input_dirs:  &[PathBuf],
    exclude:     Option<&str>,
) -> Result<Vec<PathBuf>> {
    let mut resolved = BTreeSet::new();

    for file in input_files {
        if !file.is_file() {
            return Err(FcaError::input(format!("Input file does not exist: {}", file.display())));
        }
        resolved.insert(file.canonicalize()?);
    }

    for dir in input_dirs {
        if !dir.is_dir() {
            return Err(FcaError::input(format!("Input path is not a directory: {}", dir.display())));
        }
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(pattern) = exclude.filter(|p| !p.is_empty()) {
                let rel = path.strip_prefix(dir).unwrap_or(path);
                let rel = rel.to_string_lossy().replace('\\', "/");
                if rel.contains(pattern) {
                    debug!(path = %path.display(), "excluded by pattern");
                    continue;
                }
            }
            resolved.insert(path.canonicalize()?);
        }
    }

    if resolved.is_empty() {
        return Err(FcaError::input("At least one input file is required"));
    }
    Ok(resolved.into_iter().collect())
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Collect inputs and write them to `output_path`.  Returns the record count.
pub fn encode(
    output_path: &Path,
    input_files: &[PathBuf],
    input_dirs:  &[PathBuf],
    opts:        &EncodeOptions,
) -> Result<usize> {
    let inputs = collect_inputs(input_files, input_dirs, opts.exclude.as_deref())?;
    encode_files(output_path, &inputs)
}

/// Write `inputs`, in the given order, to `output_path`.
pub fn encode_files(output_path: &Path, inputs: &[PathBuf]) -> Result<usize> {
    if inputs.is_empty() {
        return Err(FcaError::input("At least one input file is required"));
    }
    if let Some(missing) = inputs.iter().find(|p| !p.is_file()) {
        return Err(FcaError::input(format!("Input file does not exist: {}", missing.display())));
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = FcaWriter::new(BufWriter::new(File::create(output_path)?))?;

    for path in inputs {
        let data = fs::read(path)?;
        let file_type = writer.add_file(&data)?;
        info!(path = %path.display(), size = data.len(), file_type = %file_type, "embedded");
    }

    let count = writer.record_count();
    writer.finish()?;
    info!(archive = %output_path.display(), records = count, "created FCA archive");
    Ok(count)
}

// ── Decode ───────────────────────────────────────────────────────────────────

fn open_archive(input_path: &Path) -> Result<FcaReader<BufReader<File>>> {
    if !input_path.is_file() {
        return Err(FcaError::input(format!("Input file does not exist: {}", input_path.display())));
    }
    FcaReader::new(BufReader::new(File::open(input_path)?))
}

/// Extract every record of `input_path` into `output_dir`.
///
/// Figures whose identity resolves through `table` are written under
/// `series/type/`; everything else is named by MD5.  Returns the record
/// count.  Files written before a failure are left in place.
pub fn decode(
    input_path: &Path,
    output_dir: &Path,
    opts:       &DecodeOptions,
    table:      &IdentityTable,
) -> Result<usize> {
    let mut reader = open_archive(input_path)?;
    fs::create_dir_all(output_dir)?;

    while let Some(rec) = reader.next_record()? {
        let index = reader.records_read();
        if rec.reserved != 0x00 {
            warn!(record = index, reserved = rec.reserved, "reserved byte is not 0x00");
        }

        let resolved = if rec.file_type.is_figure() {
            extract_key(&rec.content).and_then(|key| resolve(&key, table))
        } else {
            None
        };
        let out = resolve_path(
            rec.file_type,
            resolved.as_ref(),
            &rec.content,
            opts.use_pro_naming,
            output_dir,
        );
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out, &rec.content)?;

        info!(
            record = index,
            path = %out.display(),
            size = rec.content.len(),
            file_type = %rec.file_type,
            "extracted"
        );
    }

    let count = reader.records_read();
    info!(records = count, output = %output_dir.display(), "extraction complete");
    Ok(count)
}

// ── Inspect ──────────────────────────────────────────────────────────────────

/// Describe every record without writing anything.
pub fn inspect(input_path: &Path) -> Result<Vec<RecordInfo>> {
    let reader = open_archive(input_path)?;
    reader
        .enumerate()
        .map(|(i, rec)| {
            let rec = rec?;
            let identity = if rec.file_type.is_figure() { extract_key(&rec.content) } else { None };
            Ok(RecordInfo {
                index:       i + 1,
                file_type:   rec.file_type,
                reserved:    rec.reserved,
                header_size: rec.header_size,
                total_size:  rec.total_size,
                size:        rec.content.len(),
                md5:         md5_hex(&rec.content),
                identity,
            })
        })
        .collect()
}
