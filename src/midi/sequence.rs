//! `Sequence` and `DivisionType` (spec §3, §4.7).

use crate::error::{self, unsupported, LibResult};
use crate::midi::track::Track;

/// How tick positions map to wall-clock time (spec §3, §4.8 header division word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivisionType {
    /// Ticks per quarter note; tempo-dependent, needs a tempo meta event to resolve to time.
    Ppq,
    Smpte24,
    Smpte25,
    Smpte30Drop,
    Smpte30,
}

impl DivisionType {
    /// Frames per second for the SMPTE division types, as encoded in the header's negative
    /// high byte (spec §4.8: fps ∈ {24, 25, 29, 30}; 29 is the drop-frame 30).
    pub fn smpte_fps(self) -> Option<u8> {
        match self {
            DivisionType::Ppq => None,
            DivisionType::Smpte24 => Some(24),
            DivisionType::Smpte25 => Some(25),
            DivisionType::Smpte30Drop => Some(29),
            DivisionType::Smpte30 => Some(30),
        }
    }

    /// Recover a `DivisionType` from a header fps byte (spec §4.8).
    pub(crate) fn from_smpte_fps(fps: u8) -> LibResult<Self> {
        match fps {
            24 => Ok(DivisionType::Smpte24),
            25 => Ok(DivisionType::Smpte25),
            29 => Ok(DivisionType::Smpte30Drop),
            30 => Ok(DivisionType::Smpte30),
            other => error::InvalidMidiData {
                site: error::site!(),
                description: format!("smpte fps {other} is not one of 24, 25, 29, 30"),
            }
            .fail(),
        }
    }
}

/// A complete Standard MIDI File's worth of tracks (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub division: DivisionType,
    /// PPQ resolution, or SMPTE ticks-per-frame.
    pub resolution: u16,
    /// SMF format: 0 (single track), 1 (simultaneous tracks), 2 (independent tracks).
    pub file_type: u8,
    pub tracks: Vec<Track>,
}

impl Sequence {
    pub fn new(division: DivisionType, resolution: u16, file_type: u8) -> Self {
        Self {
            division,
            resolution,
            file_type,
            tracks: Vec::new(),
        }
    }

    /// `max(track.tick_length())` over all tracks, or 0 if there are none (spec §4.7).
    pub fn tick_length(&self) -> u32 {
        self.tracks.iter().map(Track::tick_length).max().unwrap_or(0)
    }

    /// Wall-clock length in microseconds. Only defined for SMPTE-divided sequences; PPQ
    /// sequences require a tempo map to resolve, which is outside this core (spec §4.7, §7).
    pub fn microsecond_length(&self) -> LibResult<f64> {
        let fps = match self.division.smpte_fps() {
            Some(fps) => fps,
            None => unsupported!("microsecondLength is tempo-dependent for PPQ sequences"),
        };
        let ticks_per_second = fps as f64 * self.resolution as f64;
        Ok(self.tick_length() as f64 * 1_000_000.0 / ticks_per_second)
    }
}
