//! `Track` (spec §3, §4.7): an ordered sequence of [`MidiEvent`]s, tick-ascending and stable on
//! ties.

use crate::midi::event::MidiEvent;
use crate::midi::message::MidiMessage;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<MidiEvent>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MidiEvent] {
        &self.events
    }

    /// Mutable access for in-place transforms that only rewrite message payloads, never ticks
    /// (spec §4.9 transpose). Reordering by tick through this slice would violate the track's
    /// ordering invariant; use [`Track::add`] to insert new events instead.
    pub fn events_mut(&mut self) -> &mut [MidiEvent] {
        &mut self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Insert `event`, keeping the track ordered by ascending tick. Ties are broken by
    /// insertion order: `event` is placed after every existing event with the same tick
    /// (spec §3's "stable for equal ticks" invariant).
    pub fn add(&mut self, event: MidiEvent) {
        let pos = self.events.partition_point(|e| e.tick <= event.tick);
        self.events.insert(pos, event);
    }

    /// Highest tick reached by any event in this track (0 if empty).
    pub fn tick_length(&self) -> u32 {
        self.events.iter().map(|e| e.tick).max().unwrap_or(0)
    }

    pub fn ends_with_end_of_track(&self) -> bool {
        self.events
            .last()
            .map(|e| e.message.is_end_of_track())
            .unwrap_or(false)
    }

    /// Append a synthesized End of Track meta event at `tick` if one isn't already present
    /// (spec §3: "readers must enforce, writers must synthesize if absent").
    pub fn ensure_end_of_track(&mut self, tick: u32) {
        if !self.ends_with_end_of_track() {
            self.add(MidiEvent::new(
                tick,
                MidiMessage::Meta {
                    kind: crate::midi::message::META_END_OF_TRACK,
                    payload: Vec::new(),
                },
            ));
        }
    }
}
