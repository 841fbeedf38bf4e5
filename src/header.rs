//! Global archive header: 3-byte magic followed by a 1-byte version.

use byteorder::WriteBytesExt;
use std::io::{self, Read, Write};

use crate::error::{FormatError, Result};
use crate::record::{read_full, ReadOutcome};

pub const MAGIC: &[u8; 3] = b"FCA";
pub const VERSION: u8 = 1;
pub const HEADER_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    pub version: u8,
}

impl Default for GlobalHeader {
    fn default() -> Self {
        Self { version: VERSION }
    }
}

impl GlobalHeader {
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u8(self.version)?;
        Ok(())
    }

    /// Reads and validates magic and version.  Only version 1 is accepted;
    /// other versions are rejected rather than parsed with the v1 layout.
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 3];
        let got = match read_full(&mut reader, &mut magic)? {
            ReadOutcome::Filled   => magic.len(),
            ReadOutcome::Eof      => 0,
            ReadOutcome::Short(n) => n,
        };
        if got < magic.len() || &magic != MAGIC {
            return Err(FormatError::InvalidMagic { found: magic[..got].to_vec() }.into());
        }

        let mut version = [0u8; 1];
        if read_full(&mut reader, &mut version)? != ReadOutcome::Filled {
            return Err(FormatError::MissingVersion.into());
        }
        let version = version[0];
        if version != VERSION {
            return Err(FormatError::UnsupportedVersion(version).into());
        }
        Ok(Self { version })
    }
}
