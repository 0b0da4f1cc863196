//! MIDI sequence model and Standard MIDI File codec (spec §3, §4.7, §4.8, §4.9).

mod byte_cursor;
pub mod event;
pub mod message;
pub mod reader;
pub mod sequence;
pub mod track;
pub mod transform;
pub mod vlq;
pub mod writer;

pub use event::MidiEvent;
pub use message::MidiMessage;
pub use sequence::{DivisionType, Sequence};
pub use track::Track;
