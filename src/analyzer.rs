//! Frame analyzer (spec §4.4): windowing, zero-pad, FFT, semitone weighting, PCP
//! accumulation/reinforcement, parabolic peak interpolation, harmonic suppression.
//!
//! Grounded on the teacher's `src/audio/spectrum_analyzer.rs` for the overall "preallocate once,
//! reuse every frame" shape, generalized from dB-scaled display spectra to the linear-magnitude
//! pitch-detection pipeline this spec requires.

use crate::config::AnalysisConfig;
use crate::fft::RealFft;
use crate::octave::OctaveBands;
use crate::pitch::{freq_to_pitch, pitch_to_freq, semitone_distance, Note};
use crate::window::WindowTable;
use log::trace;

/// Per-frame output (spec §3's `FrameState`).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// Magnitude spectrum after weighting and PCP reinforcement, length H.
    pub spec: Vec<f32>,
    /// Pitch-class profile, normalized so the max element is 1 (or all zero).
    pub pcp: [f32; 12],
    /// Detected notes, ordered by ascending bin index of detection.
    pub notes: Vec<Note>,
}

impl FrameState {
    fn new(half_len: usize) -> Self {
        Self {
            spec: vec![0.0; half_len],
            pcp: [0.0; 12],
            notes: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.spec.iter_mut().for_each(|s| *s = 0.0);
        self.pcp = [0.0; 12];
        self.notes.clear();
    }
}

/// Owns every per-session, computed-once resource (window table, FFT plan, octave bands) plus
/// the scratch buffers reused across frames. Not `Sync` by intent: spec §5 requires each
/// parallel worker to hold its own analyzer and `FrameState`.
pub struct FrameAnalyzer {
    config: AnalysisConfig,
    window: WindowTable,
    fft: RealFft,
    octaves: OctaveBands,
    padded: Vec<f32>,
    magnitudes: Vec<f32>,
    pitch_class_at: Vec<u8>,
    k_start: usize,
    k_end: usize,
}

impl FrameAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let window = WindowTable::new(config.window_type(), config.window_len());
        let fft = RealFft::new(config.padded_len());
        let octaves = OctaveBands::new(config.sample_rate(), config.padded_len());
        let half_len = config.half_len();
        let all_active = [true; 8];
        let k_start = octaves.lowest_bin(&all_active).unwrap_or(0);
        let k_end = octaves.highest_bin(&all_active).unwrap_or(half_len).min(half_len);
        Self {
            padded: vec![0.0; config.padded_len()],
            magnitudes: vec![0.0; half_len],
            pitch_class_at: vec![0; half_len],
            config,
            window,
            fft,
            octaves,
            k_start,
            k_end,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Allocate a fresh, zeroed [`FrameState`] sized for this analyzer's half-spectrum length.
    pub fn new_frame_state(&self) -> FrameState {
        FrameState::new(self.config.half_len())
    }

    /// Analyze one frame of `window_len()` samples, writing results into `state` (spec §4.4,
    /// steps 1-8). `state` is reset at the start of the call; its buffers are reused in place.
    pub fn analyze_into(&mut self, x: &[f32], state: &mut FrameState) {
        debug_assert_eq!(x.len(), self.config.window_len());
        state.reset();

        let w = self.config.window_len();
        self.padded[..w].copy_from_slice(x);
        self.padded[w..].iter_mut().for_each(|s| *s = 0.0);
        self.window.apply_in_place(&mut self.padded[..w]);

        self.fft.forward(&self.padded, &mut self.magnitudes);

        let sample_rate = self.config.sample_rate();
        let n = self.config.padded_len() as f32;
        let weight = self.config.bin_weight();
        let eq = self.config.linear_eq();

        for k in self.k_start..self.k_end {
            let f_k = k as f32 * sample_rate / n;
            let pitch = freq_to_pitch(f_k);
            if pitch == 0 {
                continue;
            }
            // octave of `closest` (spec §4.4 step 4b), not the raw bin's octave-band range:
            // the band table's threshold boundaries don't line up with freq_to_pitch's
            // equal-tempered rounding boundaries at every octave edge.
            let octave = pitch as i32 / 12 - 1;
            if !(0..=7).contains(&octave) || !self.config.octave_active(octave as usize) {
                continue;
            }
            let closest = pitch_to_freq(pitch);
            let d = semitone_distance(f_k, closest);
            let a_k = self.magnitudes[k];
            let mut spec_k = a_k * weight.weight(d);
            if self.config.linear_eq_active() {
                spec_k *= eq.intercept + k as f32 * eq.slope;
            }
            state.spec[k] = spec_k;

            let pitch_class = pitch % 12;
            self.pitch_class_at[k] = pitch_class;
            state.pcp[pitch_class as usize] += a_k * a_k * weight.weight(d);
        }

        let pcp_max = state.pcp.iter().cloned().fold(0.0f32, f32::max);
        if pcp_max > 0.0 {
            for v in state.pcp.iter_mut() {
                *v /= pcp_max;
            }
        }

        if self.config.pcp_active() {
            for k in self.k_start..self.k_end {
                if state.spec[k] == 0.0 {
                    continue;
                }
                let pitch_class = self.pitch_class_at[k] as usize;
                state.spec[k] *= state.pcp[pitch_class];
            }
        }

        self.pick_peaks(state);
        trace!(
            "frame: {} peaks, pcp {:?}",
            state.notes.len(),
            state.pcp
        );
    }

    fn pick_peaks(&self, state: &mut FrameState) {
        let tau = self.config.peak_threshold();
        let sample_rate = self.config.sample_rate();
        let n = self.config.padded_len() as f32;
        let half_len = state.spec.len();

        let lo = self.k_start.max(1);
        let hi = self.k_end.min(half_len.saturating_sub(1));

        let mut seen: Vec<(u8, f32)> = Vec::new();

        for k in lo..hi {
            let y_minus = state.spec[k - 1];
            let y0 = state.spec[k];
            let y_plus = state.spec[k + 1];
            if !(y0 > y_minus && y0 > y_plus && y0 > tau) {
                continue;
            }

            let (freq, amplitude) = interpolate_peak(k, y_minus, y0, y_plus, sample_rate, n);

            let note = match Note::new(freq, amplitude, k, tau) {
                Some(note) => note,
                None => continue,
            };

            let is_harmonic = self.config.harmonics_active()
                && seen
                    .iter()
                    .any(|&(pc, a)| pc == note.semitone() && note.amplitude < a);
            if is_harmonic {
                continue;
            }

            seen.push((note.semitone(), note.amplitude));
            state.notes.push(note);
        }
    }
}

/// Parabolic interpolation around bin `k` (spec §4.4 step 7). Falls back to the un-interpolated
/// bin center when the denominator is zero or interpolation doesn't cross a pitch boundary.
fn interpolate_peak(
    k: usize,
    y_minus: f32,
    y0: f32,
    y_plus: f32,
    sample_rate: f32,
    padded_len: f32,
) -> (f32, f32) {
    let f_k = k as f32 * sample_rate / padded_len;
    let denom = 2.0 * (2.0 * y0 - y_plus - y_minus);
    if denom == 0.0 {
        return (f_k, y0);
    }
    let p = (y_plus - y_minus) / denom;
    let a_hat = y0 - 0.25 * (y_minus - y_plus) * p;
    let f_hat = (k as f32 + p) * sample_rate / padded_len;
    if freq_to_pitch(f_hat) != freq_to_pitch(f_k) {
        (f_hat, a_hat)
    } else {
        (f_k, y0)
    }
}
