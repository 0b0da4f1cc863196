//! Integration coverage for the concrete spectral-analysis scenarios in spec §8, exercised
//! through the full [`Pipeline`] + [`AudioSource`] surface rather than the analyzer directly.

mod common;

use audio2midi_core::config::AnalysisConfig;
use audio2midi_core::pipeline::{AudioSource, Pipeline, SliceAudioSource};
use common::enable_logging;
use core::f32::consts::PI;

fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
        .collect()
}

/// Scenario 1: a single A4 tone over one frame yields exactly one Note at pitch 69, within one
/// bin-width of 440 Hz.
#[test]
fn pure_tone_a4() {
    enable_logging();
    let config = AnalysisConfig::builder()
        .window_len(2048)
        .zero_pad(4)
        .sample_rate(44_100.0)
        .build()
        .unwrap();
    let samples = sine(440.0, 44_100.0, config.window_len());
    let source = SliceAudioSource::new(&samples, 44_100.0);
    let mut pipeline = Pipeline::new(config.clone());
    let frames = pipeline.run(&source);

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].notes.len(), 1);
    assert_eq!(frames[0].notes[0].pitch, 69);
    let bin_width = config.sample_rate() / config.padded_len() as f32;
    assert!((frames[0].notes[0].frequency - 440.0).abs() < bin_width);
}

/// Scenario 2: a 220 Hz fundamental plus a weaker 440 Hz octave above it yields only the A3
/// fundamental; the octave partial is suppressed as a harmonic.
#[test]
fn octave_harmonic_suppressed() {
    let config = AnalysisConfig::builder()
        .window_len(2048)
        .zero_pad(4)
        .sample_rate(44_100.0)
        .build()
        .unwrap();
    let fundamental = sine(220.0, 44_100.0, config.window_len());
    let octave_above = sine(440.0, 44_100.0, config.window_len());
    let samples: Vec<f32> = fundamental
        .iter()
        .zip(&octave_above)
        .map(|(a, b)| a + 0.5 * b)
        .collect();
    let source = SliceAudioSource::new(&samples, 44_100.0);
    let mut pipeline = Pipeline::new(config);
    let frames = pipeline.run(&source);

    assert_eq!(frames[0].notes.len(), 1);
    assert_eq!(frames[0].notes[0].pitch, 57);
}

/// Scenario 3: same input as scenario 1, but octave 4 (where A4 lives) is masked off, so no
/// notes are emitted at all.
#[test]
fn masked_octave_yields_no_notes() {
    let mut octave_active = [true; 8];
    octave_active[4] = false;
    let config = AnalysisConfig::builder()
        .window_len(2048)
        .zero_pad(4)
        .sample_rate(44_100.0)
        .octave_active(octave_active)
        .build()
        .unwrap();
    let samples = sine(440.0, 44_100.0, config.window_len());
    let source = SliceAudioSource::new(&samples, 44_100.0);
    let mut pipeline = Pipeline::new(config);
    let frames = pipeline.run(&source);

    assert!(frames[0].notes.is_empty());
}

/// The end of a stream shorter than one window is zero-padded rather than dropped (spec §4.6).
#[test]
fn short_final_frame_is_zero_padded() {
    let config = AnalysisConfig::builder().window_len(1024).build().unwrap();
    let samples = sine(440.0, 44_100.0, 600);
    let source = SliceAudioSource::new(&samples, 44_100.0);
    assert_eq!(source.len(), 600);

    let mut pipeline = Pipeline::new(config);
    let frames = pipeline.run(&source);
    assert_eq!(frames.len(), 1);
}
