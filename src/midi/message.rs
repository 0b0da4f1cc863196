//! `MidiMessage` tagged union (spec §3, §9 "Event type hierarchy" redesign flag).
//!
//! The source system modeled this as an abstract class with three concrete subclasses; here it
//! is a flat three-variant enum, since `status()`/`length()`/serialization all dispatch on the
//! same discriminator and gain nothing from a deeper hierarchy.

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const POLY_AFTERTOUCH: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_AFTERTOUCH: u8 = 0xD0;
pub const PITCH_BEND: u8 = 0xE0;

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_ESCAPE: u8 = 0xF7;
pub const META_STATUS: u8 = 0xFF;

/// Meta event type byte for End of Track (spec §3 invariant).
pub const META_END_OF_TRACK: u8 = 0x2F;

/// Drum channel, zero-indexed (spec §4.9 transpose).
pub const DRUM_CHANNEL: u8 = 9;

/// A single MIDI message (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// A channel voice/mode or system message: status byte plus up to two data bytes. Messages
    /// with only one data byte (e.g. Program Change) carry `data2 = 0`.
    Short { status: u8, data1: u8, data2: u8 },
    /// `0xFF <type> <payload>`.
    Meta { kind: u8, payload: Vec<u8> },
    /// `0xF0` or `0xF7` followed by a length-prefixed payload.
    Sysex { status: u8, payload: Vec<u8> },
}

impl MidiMessage {
    /// The MIDI channel (0..15) this message addresses, if it is a channel message.
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::Short { status, .. } if *status < SYSEX_START => Some(status & 0x0F),
            _ => None,
        }
    }

    /// The status-byte nibble (high 4 bits) of a channel message, if applicable.
    pub fn status_type(&self) -> Option<u8> {
        match self {
            MidiMessage::Short { status, .. } if *status < SYSEX_START => Some(status & 0xF0),
            _ => None,
        }
    }

    /// `true` if this is the meta End of Track marker (spec §3 invariant).
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, MidiMessage::Meta { kind, .. } if *kind == META_END_OF_TRACK)
    }

    /// Number of data bytes that follow the status byte for 2-data and 1-data channel/system
    /// messages, per spec §4.8. Returns `None` for meta and sysex messages, whose length is
    /// carried separately as a VLQ.
    pub fn short_data_len(status: u8) -> Option<usize> {
        match status & 0xF0 {
            NOTE_OFF | NOTE_ON | POLY_AFTERTOUCH | CONTROL_CHANGE | PITCH_BEND => Some(2),
            PROGRAM_CHANGE | CHANNEL_AFTERTOUCH => Some(1),
            0xF0 => match status {
                0xF2 => Some(2),
                0xF3 => Some(1),
                0xF5 => Some(1),
                0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE => Some(0),
                _ => None,
            },
            _ => None,
        }
    }
}
