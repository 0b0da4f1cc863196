//! Sequence transforms: transpose, trim, format conversion (spec §4.9).

use crate::error::LibResult;
use crate::midi::event::MidiEvent;
use crate::midi::message::{MidiMessage, DRUM_CHANNEL, NOTE_OFF, NOTE_ON, POLY_AFTERTOUCH};
use crate::midi::sequence::Sequence;
use crate::midi::track::Track;

/// Shift every NoteOn/NoteOff/AfterTouchPoly `data1` by `steps` semitones, wrapping modulo 128
/// (spec §4.9). Channel 9 (the conventional drum channel) is left untouched unless
/// `include_drums` is set. Mutates `sequence` in place.
pub fn transpose(sequence: &mut Sequence, steps: i32, include_drums: bool) {
    for track in &mut sequence.tracks {
        for event in track.events_mut() {
            let MidiMessage::Short { status, data1, .. } = &mut event.message else {
                continue;
            };
            if !matches!(*status & 0xF0, NOTE_OFF | NOTE_ON | POLY_AFTERTOUCH) {
                continue;
            }
            let channel = *status & 0x0F;
            if channel == DRUM_CHANNEL && !include_drums {
                continue;
            }
            *data1 = (*data1 as i32 + steps).rem_euclid(128) as u8;
        }
    }
}

/// Produce a new sequence retaining, per source track, only events with `tick < total_ticks`
/// (spec §4.9). Each resulting track is given a terminal End of Track if one doesn't already
/// survive the cut. Does not modify `sequence`.
pub fn trim(sequence: &Sequence, total_ticks: u32) -> Sequence {
    let mut result = Sequence::new(sequence.division, sequence.resolution, sequence.file_type);
    for track in &sequence.tracks {
        let mut trimmed = Track::new();
        for event in track.events() {
            if event.tick < total_ticks {
                trimmed.add(event.clone());
            }
        }
        let tick = trimmed.tick_length();
        trimmed.ensure_end_of_track(tick);
        result.tracks.push(trimmed);
    }
    result
}

/// Convert `sequence` to `target_format` (spec §4.9).
///
/// - If `target_format` already matches the source, or the target isn't format 0, or the
///   source has at most one track: deep-copy with the format tag updated.
/// - Otherwise (merging to format 0): drop every per-track End of Track, optionally rewrite the
///   channel nibble of each Short event to its source track index (only when that index is a
///   legal MIDI channel 0..=15), stable-sort the merge by tick, and append one terminal End of
///   Track. Never modifies `sequence`.
pub fn convert(
    sequence: &Sequence,
    target_format: u8,
    map_track_to_channel: bool,
) -> LibResult<Sequence> {
    if target_format == sequence.file_type || target_format != 0 || sequence.tracks.len() <= 1 {
        let mut copy = sequence.clone();
        copy.file_type = target_format;
        return Ok(copy);
    }

    let mut merged = Track::new();
    for (track_index, track) in sequence.tracks.iter().enumerate() {
        for event in track.events() {
            if event.message.is_end_of_track() {
                continue;
            }
            let mut message = event.message.clone();
            if map_track_to_channel && track_index <= 15 && message.channel().is_some() {
                if let MidiMessage::Short { status, .. } = &mut message {
                    *status = (*status & 0xF0) | track_index as u8;
                }
            }
            merged.add(MidiEvent::new(event.tick, message));
        }
    }
    let final_tick = merged.tick_length();
    merged.ensure_end_of_track(final_tick);

    let mut result = Sequence::new(sequence.division, sequence.resolution, 0);
    result.tracks.push(merged);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::sequence::DivisionType;

    fn note_on(tick: u32, channel: u8, pitch: u8) -> MidiEvent {
        MidiEvent::new(
            tick,
            MidiMessage::Short {
                status: NOTE_ON | channel,
                data1: pitch,
                data2: 100,
            },
        )
    }

    #[test]
    fn transpose_wraps_at_128() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        let mut track = Track::new();
        track.add(note_on(0, 0, 127));
        seq.tracks.push(track);
        transpose(&mut seq, 3, false);
        let MidiMessage::Short { data1, .. } = &seq.tracks[0].events()[0].message else {
            unreachable!()
        };
        assert_eq!(*data1, 2);
    }

    #[test]
    fn transpose_skips_drum_channel_by_default() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        let mut track = Track::new();
        track.add(note_on(0, DRUM_CHANNEL, 60));
        seq.tracks.push(track);
        transpose(&mut seq, 5, false);
        let MidiMessage::Short { data1, .. } = &seq.tracks[0].events()[0].message else {
            unreachable!()
        };
        assert_eq!(*data1, 60);
    }

    #[test]
    fn transpose_then_inverse_is_identity_without_wrap() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        let mut track = Track::new();
        track.add(note_on(0, 0, 60));
        seq.tracks.push(track);
        transpose(&mut seq, 5, false);
        transpose(&mut seq, -5, false);
        let MidiMessage::Short { data1, .. } = &seq.tracks[0].events()[0].message else {
            unreachable!()
        };
        assert_eq!(*data1, 60);
    }

    #[test]
    fn trim_drops_events_at_or_after_cutoff() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        let mut track = Track::new();
        track.add(note_on(0, 0, 60));
        track.add(note_on(100, 0, 61));
        track.add(note_on(200, 0, 62));
        seq.tracks.push(track);
        let trimmed = trim(&seq, 150);
        assert_eq!(trimmed.tracks[0].len(), 3); // 2 events + synthesized EoT
        assert!(trimmed.tracks[0].events()[..2]
            .iter()
            .all(|e| e.tick < 150));
        assert!(trimmed.tracks[0].ends_with_end_of_track());
    }

    #[test]
    fn convert_merges_three_tracks_to_format_zero() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        for ticks in [[0u32, 100], [50, 150], [25, 75]] {
            let mut track = Track::new();
            for tick in ticks {
                track.add(note_on(tick, 0, 60));
            }
            track.ensure_end_of_track(ticks[1]);
            seq.tracks.push(track);
        }

        let merged = convert(&seq, 0, true).unwrap();
        assert_eq!(merged.tracks.len(), 1);
        let events = merged.tracks[0].events();
        assert_eq!(events.len(), 7); // 6 notes + 1 terminal EoT
        let ticks: Vec<u32> = events.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 25, 50, 75, 100, 150, 150]);
        let channels: Vec<u8> = events[..6]
            .iter()
            .map(|e| e.message.channel().unwrap())
            .collect();
        assert_eq!(channels, vec![0, 2, 1, 2, 0, 1]);
    }

    #[test]
    fn convert_to_same_format_deep_copies() {
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        seq.tracks.push(Track::new());
        let copy = convert(&seq, 1, false).unwrap();
        assert_eq!(copy, seq);
    }

    #[test]
    fn convert_leaves_non_channel_short_messages_untouched() {
        // SongPosition (0xF2) has no channel nibble; the track-to-channel remap must not
        // reinterpret its status byte.
        let mut seq = Sequence::new(DivisionType::Ppq, 480, 1);
        let mut track0 = Track::new();
        track0.add(note_on(0, 0, 60));
        let mut track1 = Track::new();
        track1.add(MidiEvent::new(
            10,
            MidiMessage::Short {
                status: 0xF2,
                data1: 1,
                data2: 2,
            },
        ));
        seq.tracks.push(track0);
        seq.tracks.push(track1);

        let merged = convert(&seq, 0, true).unwrap();
        let events = merged.tracks[0].events();
        let song_position = &events[1].message;
        assert_eq!(
            *song_position,
            MidiMessage::Short {
                status: 0xF2,
                data1: 1,
                data2: 2,
            }
        );
    }
}
