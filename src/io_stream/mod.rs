//! Streaming archive engine: writer and reader.
//!
//! # Writer
//! [`FcaWriter`] writes the global header on construction, then one framed
//! record per [`FcaWriter::add_file`] call.  Each payload is classified on
//! the way in; nothing is buffered beyond the caller's slice.
//!
//! # Reader
//! [`FcaReader`] validates the global header on construction and hands out
//! records one at a time through [`FcaReader::next_record`].  The archive
//! has no index: records are read strictly in order until a clean end at a
//! record boundary.
//!
//! # Endianness
//! All multi-byte integers are big-endian; see `record.rs`.

use std::io::{Read, Write};

use crate::classify::classify;
use crate::error::Result;
use crate::header::GlobalHeader;
use crate::record::{frame_size, write_frame, FileType, Record};

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct FcaWriter<W: Write> {
    writer:      W,
    pub header:  GlobalHeader,
    records:     usize,
}

impl<W: Write> FcaWriter<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        let header = GlobalHeader::default();
        header.write(&mut writer)?;
        Ok(Self { writer, header, records: 0 })
    }

    /// Classify `data` and append it as one record.  Returns the tag written.
    pub fn add_file(&mut self, data: &[u8]) -> Result<FileType> {
        let file_type = classify(data);
        self.add_file_as(data, file_type)?;
        Ok(file_type)
    }

    /// Append `data` with an explicit type tag, bypassing the classifier.
    pub fn add_file_as(&mut self, data: &[u8], file_type: FileType) -> Result<()> {
        let total_size = frame_size(data.len())?;
        write_frame(&mut self.writer, file_type, data, total_size)?;
        self.records += 1;
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

// ── Reader ───────────────────────────────────────────────────────────────────

pub struct FcaReader<R: Read> {
    reader:     R,
    pub header: GlobalHeader,
    /// Records returned so far.
    records:    usize,
    done:       bool,
}

impl<R: Read> FcaReader<R> {
    /// Open an archive.  Fails immediately on bad magic or an unknown version.
    pub fn new(mut reader: R) -> Result<Self> {
        let header = GlobalHeader::read(&mut reader)?;
        Ok(Self { reader, header, records: 0, done: false })
    }

    /// The next record, or `Ok(None)` once the archive ends cleanly.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.done {
            return Ok(None);
        }
        match Record::read(&mut self.reader, self.records + 1)? {
            Some(rec) => {
                self.records += 1;
                Ok(Some(rec))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    pub fn records_read(&self) -> usize {
        self.records
    }
}

impl<R: Read> Iterator for FcaReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None)      => None,
            Err(e)        => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
