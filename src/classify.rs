//! Content classifier: fixed-offset byte signatures → [`FileType`].
//!
//! # Ordering
//! Signatures are tried top to bottom and the first hit wins.  Skylanders
//! and amiibo v3 dumps can both be 2048 bytes long, so the narrower
//! Skylanders signature must stay ahead of the v3 entry.

use crate::record::FileType;

/// NTAG capability container at 0x0C..0x10.
const NTAG_CC: [u8; 4] = [0xF1, 0x10, 0xFF, 0xEE];

/// One entry in the signature table.
pub struct Signature {
    pub file_type: FileType,
    pub matches:   fn(&[u8]) -> bool,
}

/// Priority-ordered signature table.
pub const SIGNATURES: &[Signature] = &[
    Signature { file_type: FileType::DimensionsLike, matches: is_dimensions },
    Signature { file_type: FileType::InfinityLike,   matches: is_infinity },
    Signature { file_type: FileType::SkylanderLike,  matches: is_skylander },
    Signature { file_type: FileType::FigureV2,       matches: is_figure_v2 },
    Signature { file_type: FileType::FigureV3,       matches: is_figure_v3 },
];

/// Classify `content`.  Pure and total; defaults to [`FileType::Unknown`].
pub fn classify(content: &[u8]) -> FileType {
    SIGNATURES
        .iter()
        .find(|sig| (sig.matches)(content))
        .map(|sig| sig.file_type)
        .unwrap_or(FileType::Unknown)
}

fn is_dimensions(c: &[u8]) -> bool {
    c.len() == 180
        && c[0] == 0x04
        && c[7] == 0x80
        && c[8..144].iter().all(|&b| b == 0)
}

fn is_infinity(c: &[u8]) -> bool {
    c.len() == 320
        && c[0] == 0x04
        && c[7..11] == [0x89, 0x44, 0x00, 0xC2]
        && c[54..57] == [0x17, 0x87, 0x8E]
}

fn is_skylander(c: &[u8]) -> bool {
    matches!(c.len(), 1024 | 2048)
        && c[5..8] == [0x81, 0x01, 0x0F]
        && c[54..58] == [0x0F, 0x0F, 0x0F, 0x69]
}

fn is_figure_v2(c: &[u8]) -> bool {
    matches!(c.len(), 532 | 540 | 572) && c[0x0C..0x10] == NTAG_CC
}

fn is_figure_v3(c: &[u8]) -> bool {
    c.len() == 2048 && c[0x0C..0x10] == NTAG_CC
}
