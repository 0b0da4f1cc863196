//! `MidiEvent` (spec §3).

use crate::midi::message::MidiMessage;

/// A message with an absolute tick position within its track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiEvent {
    pub tick: u32,
    pub message: MidiMessage,
}

impl MidiEvent {
    pub fn new(tick: u32, message: MidiMessage) -> Self {
        Self { tick, message }
    }
}
