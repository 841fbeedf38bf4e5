//! Per-record framing.
//!
//! ```text
//! total_size   u32 BE   bytes following this field: 2 + header_size + content
//! header_size  u16 BE
//! header       [u8]     v1: [file_type, reserved=0x00]
//! content      [u8]     total_size - 2 - header_size bytes
//! ```
//!
//! A record boundary is the only place where end-of-input is legal.

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Read, Write};

use crate::error::{FcaError, FormatError, Result};

/// Size of the `header_size` field, counted inside `total_size`.
pub const HEADER_SIZE_FIELD: u32 = 2;
/// Per-record header length written by this encoder.
pub const V1_HEADER_SIZE: u16 = 2;

// ── FileType ─────────────────────────────────────────────────────────────────

/// Semantic tag stored in the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Unknown,
    FigureV2,
    FigureV3,
    SkylanderLike,
    InfinityLike,
    DimensionsLike,
    /// Any code ≥ 6.  Never produced by the classifier.
    Reserved(u8),
}

impl FileType {
    pub fn code(self) -> u8 {
        match self {
            FileType::Unknown        => 0,
            FileType::FigureV2       => 1,
            FileType::FigureV3       => 2,
            FileType::SkylanderLike  => 3,
            FileType::InfinityLike   => 4,
            FileType::DimensionsLike => 5,
            FileType::Reserved(n)    => n,
        }
    }

    pub fn display_name(self) -> String {
        match self {
            FileType::Unknown        => "Unknown".into(),
            FileType::FigureV2       => "amiibo v2".into(),
            FileType::FigureV3       => "amiibo v3".into(),
            FileType::SkylanderLike  => "Skylander".into(),
            FileType::InfinityLike   => "Disney Infinity".into(),
            FileType::DimensionsLike => "Lego Dimensions".into(),
            FileType::Reserved(n)    => format!("Reserved ({n})"),
        }
    }

    /// Figure dumps carry an embedded head/tail identity.
    pub fn is_figure(self) -> bool {
        matches!(self, FileType::FigureV2 | FileType::FigureV3)
    }
}

impl From<u8> for FileType {
    fn from(code: u8) -> Self {
        match code {
            0 => FileType::Unknown,
            1 => FileType::FigureV2,
            2 => FileType::FigureV3,
            3 => FileType::SkylanderLike,
            4 => FileType::InfinityLike,
            5 => FileType::DimensionsLike,
            n => FileType::Reserved(n),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

// ── Exact-or-EOF reads ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The whole buffer was filled.
    Filled,
    /// Zero bytes were available.
    Eof,
    /// Input ended after this many bytes.
    Short(usize),
}

/// Fill `buf` completely, or report how far the input got before ending.
///
/// Unlike `read_exact`, a short read is not an error here; the caller
/// decides whether it is a clean end or a truncation.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(match filled {
        n if n == buf.len() => ReadOutcome::Filled,
        0                   => ReadOutcome::Eof,
        n                   => ReadOutcome::Short(n),
    })
}

// ── Record ───────────────────────────────────────────────────────────────────

/// One decoded entry.  `record` numbers are 1-based, matching diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub total_size:  u32,
    pub header_size: u16,
    /// Raw header bytes as stored.
    pub header:      Vec<u8>,
    /// `Unknown` whenever the header is not the 2-byte v1 layout.
    pub file_type:   FileType,
    pub reserved:    u8,
    pub content:     Vec<u8>,
}

impl Record {
    pub fn new(file_type: FileType, content: Vec<u8>) -> Result<Self> {
        let total_size = frame_size(content.len())?;
        Ok(Self {
            total_size,
            header_size: V1_HEADER_SIZE,
            header:      vec![file_type.code(), 0x00],
            file_type,
            reserved:    0x00,
            content,
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> io::Result<()> {
        write_frame(writer, self.file_type, &self.content, self.total_size)
    }

    /// Read the next record, or `Ok(None)` on a clean end at a record
    /// boundary.  Any truncation after the first byte is a `FormatError`.
    pub fn read<R: Read>(mut reader: R, record: usize) -> Result<Option<Self>> {
        // ExpectRecordOrEOF
        let mut size_buf = [0u8; 4];
        match read_full(&mut reader, &mut size_buf)? {
            ReadOutcome::Eof      => return Ok(None),
            ReadOutcome::Short(_) => return Err(FormatError::TruncatedSize { record }.into()),
            ReadOutcome::Filled   => {}
        }
        let total_size = BigEndian::read_u32(&size_buf);

        // ReadingHeader
        let header_size = match reader.read_u16::<BigEndian>() {
            Ok(n) => n,
            Err(e) => return Err(truncation(e, FormatError::TruncatedHeader { record })),
        };
        let mut header = vec![0u8; header_size as usize];
        if read_full(&mut reader, &mut header)? != ReadOutcome::Filled {
            return Err(FormatError::TruncatedHeader { record }.into());
        }
        let (file_type, reserved) = if header_size == V1_HEADER_SIZE {
            (FileType::from(header[0]), header[1])
        } else {
            (FileType::Unknown, 0x00)
        };

        // ReadingContent
        let embedded_size = total_size
            .checked_sub(HEADER_SIZE_FIELD + header_size as u32)
            .ok_or(FormatError::NegativeSize { record, total_size, header_size })?;
        let mut content = Vec::new();
        let actual = (&mut reader)
            .take(embedded_size as u64)
            .read_to_end(&mut content)? as u64;
        if actual < embedded_size as u64 {
            return Err(FormatError::TruncatedContent {
                record,
                expected: embedded_size as u64,
                actual,
            }
            .into());
        }

        Ok(Some(Self { total_size, header_size, header, file_type, reserved, content }))
    }
}

/// `total_size` for a v1 record carrying `content_len` bytes.
pub fn frame_size(content_len: usize) -> Result<u32> {
    u32::try_from(content_len)
        .ok()
        .and_then(|n| n.checked_add(HEADER_SIZE_FIELD + V1_HEADER_SIZE as u32))
        .ok_or_else(|| {
            FcaError::input(format!(
                "content of {content_len} bytes does not fit in a 32-bit record"
            ))
        })
}

/// Write one v1 record without copying `content`.
pub fn write_frame<W: Write>(
    mut writer: W,
    file_type:  FileType,
    content:    &[u8],
    total_size: u32,
) -> io::Result<()> {
    writer.write_u32::<BigEndian>(total_size)?;
    writer.write_u16::<BigEndian>(V1_HEADER_SIZE)?;
    writer.write_u8(file_type.code())?;
    writer.write_u8(0x00)?;
    writer.write_all(content)?;
    Ok(())
}

fn truncation(e: io::Error, format: FormatError) -> FcaError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        format.into()
    } else {
        e.into()
    }
}
