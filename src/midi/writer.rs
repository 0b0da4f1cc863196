//! Standard MIDI File writer (spec §4.8). Mirrors the reader.
//!
//! Running-status emission is grounded on `webern-midi_file/src/scribe.rs`'s `Scribe`: track
//! the last explicit channel-message status byte and omit it when the next message repeats it.
//! The `Write`-generic entry point mirrors the reader's `Read`-generic one, surfacing failures
//! from the underlying sink as `Error`'s `Io` kind (spec §7).

use crate::error::{self, LibError, LibResult, Result};
use crate::midi::message::{MidiMessage, META_STATUS};
use crate::midi::sequence::Sequence;
use crate::midi::track::Track;
use crate::midi::vlq;
use log::{trace, warn};
use snafu::ResultExt;
use std::io::Write;

/// Serialize `sequence` to an in-memory Standard MIDI File byte buffer (spec §4.8).
///
/// If a track doesn't already end with an End of Track meta event, one is synthesized at that
/// track's final tick (spec §3, §4.8) — the input `sequence` is not modified.
pub fn write_bytes(sequence: &Sequence) -> Result<Vec<u8>> {
    write_inner(sequence).map_err(crate::error::Error)
}

/// Serialize `sequence` and write it to `sink` (spec §4.8, §6's "the byte stream it is ...
/// writing to"), surfacing failures from the underlying sink as `Error`'s `Io` kind (spec §7).
pub fn write<W: Write>(sequence: &Sequence, sink: W) -> Result<()> {
    write_stream(sequence, sink).map_err(crate::error::Error)
}

fn write_stream<W: Write>(sequence: &Sequence, mut sink: W) -> LibResult<()> {
    let bytes = write_inner(sequence)?;
    sink.write_all(&bytes)
        .context(error::Io { site: error::site!() })
}

fn write_inner(sequence: &Sequence) -> LibResult<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&(sequence.file_type as u16).to_be_bytes());
    out.extend_from_slice(&(sequence.tracks.len() as u16).to_be_bytes());
    out.extend_from_slice(&division_word(sequence)?.to_be_bytes());

    for (index, track) in sequence.tracks.iter().enumerate() {
        let mut track = track.clone();
        if !track.ends_with_end_of_track() {
            warn!("track {index} has no End of Track event, synthesizing one");
            track.ensure_end_of_track(track.tick_length());
        }
        let body = write_track_body(&track);
        trace!("wrote track {index}: {} events, {} bytes", track.len(), body.len());
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(&body);
    }
    Ok(out)
}

fn division_word(sequence: &Sequence) -> LibResult<u16> {
    match sequence.division.smpte_fps() {
        None => Ok(sequence.resolution & 0x7FFF),
        Some(fps) => {
            let high = (-(fps as i8)) as u8;
            let low = u8::try_from(sequence.resolution).map_err(|_| LibError::InvalidMidiData {
                site: error::site!(),
                description: format!(
                    "smpte resolution {} doesn't fit the header's single ticks-per-frame byte",
                    sequence.resolution
                ),
            })?;
            Ok(((high as u16) << 8) | low as u16)
        }
    }
}

fn write_track_body(track: &Track) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev_tick = 0u32;
    let mut running_status: Option<u8> = None;

    for event in track.events() {
        let delta = event.tick - prev_tick;
        prev_tick = event.tick;
        out.extend_from_slice(&vlq::encode(delta));

        match &event.message {
            MidiMessage::Short {
                status,
                data1,
                data2,
            } => {
                if *status < 0xF0 {
                    if running_status != Some(*status) {
                        out.push(*status);
                        running_status = Some(*status);
                    }
                } else {
                    out.push(*status);
                }
                match MidiMessage::short_data_len(*status).unwrap_or(2) {
                    2 => {
                        out.push(*data1);
                        out.push(*data2);
                    }
                    1 => out.push(*data1),
                    _ => {}
                }
            }
            MidiMessage::Meta { kind, payload } => {
                out.push(META_STATUS);
                out.push(*kind);
                out.extend_from_slice(&vlq::encode(payload.len() as u32));
                out.extend_from_slice(payload);
                running_status = None;
            }
            MidiMessage::Sysex { status, payload } => {
                out.push(*status);
                out.extend_from_slice(&vlq::encode(payload.len() as u32));
                out.extend_from_slice(payload);
                running_status = None;
            }
        }
    }
    out
}
