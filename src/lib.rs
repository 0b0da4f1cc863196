//! Spectral analysis and MIDI sequence engine: a sliding-window pitch detector that turns a
//! monophonic audio stream into per-frame note detections, plus the Standard MIDI File data
//! model and codec used to serialize them.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fft;
pub mod midi;
pub mod octave;
pub mod pipeline;
pub mod pitch;
pub mod window;

pub use analyzer::{FrameAnalyzer, FrameState};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, BinWeight, LinearEq};
pub use error::{Error, Result};
pub use pipeline::{AudioSource, Pipeline, SliceAudioSource};
pub use pitch::Note;
pub use window::{WindowTable, WindowType};
