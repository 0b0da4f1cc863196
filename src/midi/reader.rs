//! Standard MIDI File reader (spec §4.8).
//!
//! The byte-cursor/running-status technique is grounded on `webern-midi_file/src/byte_iter.rs`
//! and its track-parsing loop; the data model it parses into is this crate's flat
//! [`MidiMessage`] rather than webern's per-kind struct hierarchy. The `Read`-generic entry
//! point mirrors `webern-midi_file/src/lib.rs`'s `MidiFile::read<R: Read>`, which is how that
//! crate's codec surfaces `io::Error` from the underlying stream (spec §7's `IoError` kind).

use crate::error::{self, invalid_midi, LibResult, Result};
use crate::midi::byte_cursor::ByteCursor;
use crate::midi::event::MidiEvent;
use crate::midi::message::{MidiMessage, META_END_OF_TRACK};
use crate::midi::sequence::{DivisionType, Sequence};
use crate::midi::track::Track;
use log::{debug, trace};
use snafu::ResultExt;
use std::io::Read;

/// Parse a complete Standard MIDI File from an in-memory byte buffer (spec §4.8).
pub fn read_bytes(bytes: &[u8]) -> Result<Sequence> {
    read_inner(bytes).map_err(crate::error::Error)
}

/// Parse a complete Standard MIDI File from any `Read` stream (spec §6's "the byte stream it is
/// reading from"), surfacing failures from the underlying stream as `Error`'s `Io` kind
/// (spec §7) rather than panicking or propagating a bare `io::Error`.
pub fn read<R: Read>(mut source: R) -> Result<Sequence> {
    read_stream(&mut source).map_err(crate::error::Error)
}

fn read_stream<R: Read>(source: &mut R) -> LibResult<Sequence> {
    let mut bytes = Vec::new();
    source
        .read_to_end(&mut bytes)
        .context(error::Io { site: error::site!() })?;
    read_inner(&bytes)
}

fn read_inner(bytes: &[u8]) -> LibResult<Sequence> {
    let mut cursor = ByteCursor::new(bytes);
    cursor.expect_tag("MThd")?;
    let header_len = cursor.read_u32()?;
    if header_len < 6 {
        invalid_midi!("header length {} is smaller than the mandatory 6 bytes", header_len);
    }
    let file_type = cursor.read_u16()?;
    if file_type > 2 {
        invalid_midi!("file type {} is not one of 0, 1, 2", file_type);
    }
    let ntracks = cursor.read_u16()?;
    if ntracks == 0 {
        invalid_midi!("ntracks must be > 0");
    }
    let division_word = cursor.read_u16()?;
    let (division, resolution) = if division_word & 0x8000 != 0 {
        let raw_high = (division_word >> 8) as u8;
        let fps = (-(raw_high as i8)) as u8;
        let division = DivisionType::from_smpte_fps(fps)?;
        (division, division_word & 0x00FF)
    } else {
        (DivisionType::Ppq, division_word & 0x7FFF)
    };

    // Header chunk length covers everything after the length field; skip any bytes this
    // reader doesn't know about (spec §4.8: "excess header bytes are skipped").
    let consumed = 6usize;
    if (header_len as usize) > consumed {
        cursor.skip(header_len as usize - consumed)?;
    }

    let mut sequence = Sequence::new(division, resolution, file_type as u8);
    for _ in 0..ntracks {
        sequence.tracks.push(read_track(&mut cursor)?);
    }
    debug!(
        "read sequence: type {} tracks {} division {:?}",
        file_type, ntracks, sequence.division
    );
    Ok(sequence)
}

fn read_track(cursor: &mut ByteCursor) -> LibResult<Track> {
    cursor.expect_tag("MTrk")?;
    let length = cursor.read_u32()?;
    let track_end = cursor.position() + length as usize;

    let mut track = Track::new();
    let mut tick: u32 = 0;
    let mut running_status: Option<u8> = None;

    loop {
        let delta = cursor.read_vlq()?;
        tick = tick.wrapping_add(delta);

        let explicit = match cursor.peek() {
            Some(b) if b >= 0x80 => true,
            Some(_) => false,
            None => invalid_midi!("unexpected end of stream mid-track"),
        };
        let status = if explicit {
            cursor.read_u8()?
        } else {
            running_status.ok_or_else(|| {
                error::LibError::InvalidMidiData {
                    site: error::site!(),
                    description: "data byte encountered with no running status set".to_string(),
                }
            })?
        };
        if explicit && status < 0xF0 {
            running_status = Some(status);
        }

        match status {
            0xFF => {
                let kind = cursor.read_u8()?;
                let len = cursor.read_vlq()? as usize;
                let payload = cursor.read_n(len)?;
                running_status = None;
                let is_eot = kind == META_END_OF_TRACK;
                trace!("meta event kind {:#x} len {} @ tick {}", kind, len, tick);
                track.add(MidiEvent::new(tick, MidiMessage::Meta { kind, payload }));
                if is_eot {
                    break;
                }
            }
            0xF0 | 0xF7 => {
                let len = cursor.read_vlq()? as usize;
                let payload = cursor.read_n(len)?;
                running_status = None;
                track.add(MidiEvent::new(tick, MidiMessage::Sysex { status, payload }));
            }
            _ => {
                let data_len = MidiMessage::short_data_len(status).ok_or_else(|| {
                    error::LibError::InvalidMidiData {
                        site: error::site!(),
                        description: format!("unrecognized status byte {status:#x}"),
                    }
                })?;
                let data1 = if data_len >= 1 { cursor.read_u8()? } else { 0 };
                let data2 = if data_len == 2 { cursor.read_u8()? } else { 0 };
                track.add(MidiEvent::new(
                    tick,
                    MidiMessage::Short {
                        status,
                        data1,
                        data2,
                    },
                ));
            }
        }

        if cursor.position() >= track_end && !track.ends_with_end_of_track() {
            invalid_midi!("track chunk ended without an End of Track meta event");
        }
    }
    Ok(track)
}
