//! Offline identity catalog and head/tail resolution for figure dumps.
//!
//! The catalog is the JSON file persisted by the catalog fetcher:
//!
//! ```json
//! { "amiibo": [ { "head": "01010000", "tail": "000e0002",
//!                 "amiiboSeries": "...", "type": "Figure", "name": "..." } ] }
//! ```
//!
//! A missing or malformed catalog is not an error for decoding: the table
//! is simply empty and every lookup misses.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// File name used when no catalog path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "amiibo_database.json";

/// Head identifier lives at 0x54..0x58, tail at 0x58..0x5C.
const HEAD_OFFSET: usize = 0x54;
const TAIL_OFFSET: usize = 0x58;
const KEY_END:     usize = 0x5C;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Catalog records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityRecord {
    pub head:   String,
    pub tail:   String,
    #[serde(rename = "amiiboSeries")]
    pub series: String,
    #[serde(rename = "type")]
    pub kind:   String,
    pub name:   String,
}

#[derive(Deserialize)]
struct CatalogFile {
    amiibo: Vec<IdentityRecord>,
}

/// Read-only, insertion-ordered catalog.  Construct once and pass by
/// reference into [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    records:   Vec<IdentityRecord>,
    available: bool,
}

impl IdentityTable {
    /// A table with no backing catalog; every lookup misses.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<IdentityRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut r| {
                r.head.make_ascii_lowercase();
                r.tail.make_ascii_lowercase();
                r
            })
            .collect();
        Self { records, available: true }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, DatabaseError> {
        let catalog: CatalogFile = serde_json::from_slice(bytes)?;
        Ok(Self::from_records(catalog.amiibo))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        Self::from_json(&fs::read(path)?)
    }

    /// Load the catalog at `path`, or [`DEFAULT_DATABASE_PATH`] when `None`.
    /// Failure degrades to [`IdentityTable::unavailable`].
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_DATABASE_PATH));
        match Self::from_path(path) {
            Ok(table) => {
                debug!(path = %path.display(), entries = table.len(), "identity database loaded");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e,
                      "identity database unavailable; figures will be named by hash");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool { self.available }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn lookup_by_head_tail(&self, head: &str, tail: &str) -> Option<&IdentityRecord> {
        self.records
            .iter()
            .find(|r| r.head.eq_ignore_ascii_case(head) && r.tail.eq_ignore_ascii_case(tail))
    }

    pub fn lookup_by_tail(&self, tail: &str) -> Option<&IdentityRecord> {
        self.records.iter().find(|r| r.tail.eq_ignore_ascii_case(tail))
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// (head, tail) as 8-character lowercase hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub head: String,
    pub tail: String,
}

/// Display triple used to build an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub series: String,
    pub kind:   String,
    pub name:   String,
}

impl From<&IdentityRecord> for ResolvedName {
    fn from(r: &IdentityRecord) -> Self {
        ResolvedName {
            series: r.series.clone(),
            kind:   r.kind.clone(),
            name:   r.name.clone(),
        }
    }
}

/// Extract the identity key from figure content.
///
/// `None` when content is shorter than 0x5C bytes or the tail is all zero,
/// regardless of the head.
pub fn extract_key(content: &[u8]) -> Option<IdentityKey> {
    if content.len() < KEY_END {
        return None;
    }
    let head = &content[HEAD_OFFSET..TAIL_OFFSET];
    let tail = &content[TAIL_OFFSET..KEY_END];
    if tail.iter().all(|&b| b == 0) {
        return None;
    }
    Some(IdentityKey { head: hex::encode(head), tail: hex::encode(tail) })
}

/// Head+tail lookup, then tail-only as a weaker fallback.
pub fn resolve(key: &IdentityKey, table: &IdentityTable) -> Option<ResolvedName> {
    let hit = table
        .lookup_by_head_tail(&key.head, &key.tail)
        .or_else(|| {
            debug!(head = %key.head, tail = %key.tail, "no head+tail match, trying tail only");
            table.lookup_by_tail(&key.tail)
        });
    if hit.is_none() {
        debug!(head = %key.head, tail = %key.tail, "identity not in database");
    }
    hit.map(ResolvedName::from)
}
