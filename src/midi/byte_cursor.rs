//! A position-tracking byte reader for the Standard MIDI File codec.
//!
//! Trimmed down from `webern-midi_file/src/byte_iter.rs`'s `ByteIter`: that reader keeps a
//! three-byte lookahead to support tag-peeking at arbitrary points in the stream; this codec
//! only ever needs to peek the track's current byte (for running status) so a single-byte
//! lookahead is enough.

use crate::error::{self, LibResult};

pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn is_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    pub(crate) fn read_u8(&mut self) -> LibResult<u8> {
        match self.bytes.get(self.position) {
            Some(&b) => {
                self.position += 1;
                Ok(b)
            }
            None => {
                let position = self.position as u64;
                error::InvalidMidiData {
                    site: error::site!(),
                    description: format!("unexpected end of stream at byte {position}"),
                }
                .fail()
            }
        }
    }

    pub(crate) fn read_n(&mut self, n: usize) -> LibResult<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_u8()?);
        }
        Ok(out)
    }

    pub(crate) fn read_u16(&mut self) -> LibResult<u16> {
        let bytes = self.read_n(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32(&mut self) -> LibResult<u32> {
        let bytes = self.read_n(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn expect_tag(&mut self, tag: &str) -> LibResult<()> {
        let bytes = self.read_n(4)?;
        let found = String::from_utf8_lossy(&bytes).into_owned();
        if found != tag {
            return error::InvalidMidiData {
                site: error::site!(),
                description: format!("expected tag '{tag}' but found '{found}'"),
            }
            .fail();
        }
        Ok(())
    }

    /// Read a VLQ-encoded integer (spec §4.8, §9), advancing past all continuation bytes.
    pub(crate) fn read_vlq(&mut self) -> LibResult<u32> {
        let mut group_bytes = Vec::with_capacity(4);
        loop {
            let b = self.read_u8()?;
            group_bytes.push(b);
            if group_bytes.len() > 4 {
                return error::InvalidMidiData {
                    site: error::site!(),
                    description: "vlq exceeds four 7-bit groups".to_string(),
                }
                .fail();
            }
            if b & 0x80 == 0 {
                break;
            }
        }
        crate::midi::vlq::decode(&group_bytes)
    }

    /// Advance past `n` bytes without inspecting them.
    pub(crate) fn skip(&mut self, n: usize) -> LibResult<()> {
        self.read_n(n)?;
        Ok(())
    }
}
