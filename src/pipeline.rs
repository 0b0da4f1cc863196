//! Pipeline driver (spec §4.6) and the injected audio-source interface (spec §6, §9).
//!
//! Grounded on the "injected handle, no process-wide singleton" redesign flag in SPEC_FULL.md
//! §9: the teacher pulled samples from a global `nih_plug` buffer; here the driver is handed an
//! `AudioSource` implementation instead.

use crate::analyzer::{FrameAnalyzer, FrameState};
use crate::config::AnalysisConfig;

/// Delivers monophonic, pre-downmixed, normalized floating-point samples to the pipeline driver.
///
/// Downmix policy (stereo → mono) is a host concern, not the core's (spec §9 open question);
/// implementors are expected to have already downmixed before samples reach this trait.
pub trait AudioSource {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f32;

    /// Total number of samples available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buffer` with samples starting at `offset`. If fewer than `buffer.len()` samples
    /// remain, the tail is zero-padded and the number of real samples written is returned.
    fn read(&self, offset: usize, buffer: &mut [f32]) -> usize;
}

/// An in-memory [`AudioSource`] backed by a borrowed slice, for tests and offline batch use.
pub struct SliceAudioSource<'a> {
    samples: &'a [f32],
    sample_rate: f32,
}

impl<'a> SliceAudioSource<'a> {
    pub fn new(samples: &'a [f32], sample_rate: f32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }
}

impl AudioSource for SliceAudioSource<'_> {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn read(&self, offset: usize, buffer: &mut [f32]) -> usize {
        if offset >= self.samples.len() {
            buffer.iter_mut().for_each(|s| *s = 0.0);
            return 0;
        }
        let available = (self.samples.len() - offset).min(buffer.len());
        buffer[..available].copy_from_slice(&self.samples[offset..offset + available]);
        buffer[available..].iter_mut().for_each(|s| *s = 0.0);
        available
    }
}

/// Drives a [`FrameAnalyzer`] over every non-overlapping `window_len()`-sample frame of an
/// [`AudioSource`] (spec §4.6). No overlap is used; a short final tail is zero-padded.
pub struct Pipeline {
    analyzer: FrameAnalyzer,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            analyzer: FrameAnalyzer::new(config),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.analyzer.config()
    }

    /// Number of frames this source will be sliced into: `round(L / W)`.
    pub fn frame_count(&self, source: &dyn AudioSource) -> usize {
        let w = self.config().window_len() as f32;
        let l = source.len() as f32;
        if w == 0.0 {
            0
        } else {
            (l / w).round() as usize
        }
    }

    /// Analyze the whole source, returning one [`FrameState`] per frame in order.
    pub fn run(&mut self, source: &dyn AudioSource) -> Vec<FrameState> {
        let window_len = self.config().window_len();
        let frames = self.frame_count(source);
        let mut scratch = vec![0.0f32; window_len];
        let mut results = Vec::with_capacity(frames);

        for n in 0..frames {
            let offset = n * window_len;
            source.read(offset, &mut scratch);
            let mut state = self.analyzer.new_frame_state();
            self.analyzer.analyze_into(&scratch, &mut state);
            results.push(state);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn frame_count_rounds_to_nearest_window() {
        let config = AnalysisConfig::builder().window_len(1024).build().unwrap();
        let pipeline = Pipeline::new(config);
        let samples = vec![0.0f32; 1024 * 3 + 100];
        let source = SliceAudioSource::new(&samples, 44_100.0);
        assert_eq!(pipeline.frame_count(&source), 3);
    }

    #[test]
    fn short_tail_is_zero_padded_not_dropped() {
        let config = AnalysisConfig::builder().window_len(1024).build().unwrap();
        let mut pipeline = Pipeline::new(config);
        let samples: Vec<f32> = (0..600).map(|i| (i as f32 * 0.01).sin()).collect();
        let source = SliceAudioSource::new(&samples, 44_100.0);
        let frames = pipeline.run(&source);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn run_produces_one_state_per_frame() {
        let config = AnalysisConfig::builder()
            .window_len(2048)
            .sample_rate(44_100.0)
            .build()
            .unwrap();
        let mut pipeline = Pipeline::new(config);
        let samples: Vec<f32> = (0..2048 * 2)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 44_100.0).sin())
            .collect();
        let source = SliceAudioSource::new(&samples, 44_100.0);
        let frames = pipeline.run(&source);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].notes.len(), 1);
        assert_eq!(frames[0].notes[0].pitch, 69);
    }
}
