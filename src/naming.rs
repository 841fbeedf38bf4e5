//! Output path resolution for decoded records.
//!
//! Resolved figures go to `series/type/name[.bin]`; everything else is named
//! by the lowercase hex MD5 of its content directly under the output root.
//! Existing paths are never overwritten: `name (1).bin`, `name (2).bin`, …
//!
//! The existence check and the later create are not atomic.  One decoder
//! per output root.

use md5::{Digest, Md5};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::identity::ResolvedName;
use crate::record::FileType;

pub const FIGURE_EXTENSION: &str = "bin";
pub const MAX_SEGMENT_CHARS: usize = 200;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\'];

/// Make one path segment safe on every common filesystem.
pub fn sanitize_segment(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    let truncated: String = trimmed.chars().take(MAX_SEGMENT_CHARS).collect();
    // Truncation can expose a trailing space or dot again.
    let truncated = truncated.trim_end_matches(|c| c == ' ' || c == '.');
    if truncated.is_empty() { "_".to_owned() } else { truncated.to_owned() }
}

pub fn md5_hex(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}

/// Pick a free output path for one record under `output_root`.
pub fn resolve_path(
    file_type:      FileType,
    resolved_name:  Option<&ResolvedName>,
    content:        &[u8],
    use_pro_naming: bool,
    output_root:    &Path,
) -> PathBuf {
    let (dir, stem, ext) = match resolved_name {
        Some(rn) if file_type.is_figure() => {
            let dir = output_root
                .join(sanitize_segment(&rn.series))
                .join(sanitize_segment(&rn.kind));
            let ext = if use_pro_naming { None } else { Some(FIGURE_EXTENSION) };
            (dir, sanitize_segment(&rn.name), ext)
        }
        _ => (output_root.to_path_buf(), md5_hex(content), None),
    };
    first_free(&dir, &stem, ext)
}

fn file_name(stem: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None      => stem.to_owned(),
    }
}

/// `stem[.ext]`, then `stem (1)[.ext]`, `stem (2)[.ext]`, … until one is free.
fn first_free(dir: &Path, stem: &str, ext: Option<&str>) -> PathBuf {
    let candidate = dir.join(file_name(stem, ext));
    if !candidate.exists() {
        return candidate;
    }
    (1u64..)
        .map(|n| dir.join(file_name(&format!("{stem} ({n})"), ext)))
        .find(|p| !p.exists())
        .map(|p| {
            debug!(path = %p.display(), "output name taken, using disambiguated path");
            p
        })
        .unwrap_or(candidate)
}
