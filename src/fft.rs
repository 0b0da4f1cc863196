//! Real FFT adapter (spec §4.2).
//!
//! Grounded on the teacher's `src/audio/fft_engine.rs`: one `realfft::RealFftPlanner` plans a
//! forward real-to-halfcomplex transform once, and input/output buffers are pre-allocated and
//! reused across every `forward` call. Unlike the teacher's engine this adapter returns raw
//! magnitudes (not dB, and with no windowing baked in) — windowing is the frame analyzer's job
//! per spec §4.4, and the dB scale was a display concern out of scope for this core.

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Wraps a real-to-halfcomplex FFT of fixed length `n`, exposing `forward(real[n]) ->
/// magnitude[n/2]` as required by spec §6.
pub struct RealFft {
    fft: Arc<dyn RealToComplex<f32>>,
    input_scratch: Vec<f32>,
    output_scratch: Vec<Complex32>,
    n: usize,
}

impl RealFft {
    /// Plan a forward real FFT of length `n`. `n` is typically `window_len * zero_pad`
    /// (spec §3's padded length N).
    pub fn new(n: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let output_len = n / 2 + 1;
        Self {
            fft,
            input_scratch: vec![0.0; n],
            output_scratch: vec![Complex32::new(0.0, 0.0); output_len],
            n,
        }
    }

    /// Length N this adapter was planned for.
    pub fn padded_len(&self) -> usize {
        self.n
    }

    /// Number of magnitude bins this adapter produces (`realfft` gives N/2+1; the spec's
    /// half-spectrum length H = N/2 is the usable prefix, see `AnalysisConfig::half_len`).
    pub fn output_len(&self) -> usize {
        self.output_scratch.len()
    }

    /// Run the forward transform on `real`, a zero-padded, already-windowed time-domain buffer
    /// of length N, writing `sqrt(re^2 + im^2)` magnitudes into `magnitudes`.
    ///
    /// `magnitudes` must have length >= H = N/2; only the first H bins are written (the N/2+1'th
    /// bin, the Nyquist bin, is dropped — it is never referenced by the octave band precomputer
    /// in spec §4.3, whose highest octave tops out below Nyquist for any realistic sample rate).
    pub fn forward(&mut self, real: &[f32], magnitudes: &mut [f32]) {
        debug_assert_eq!(real.len(), self.n);
        self.input_scratch.copy_from_slice(real);
        self.fft
            .process(&mut self.input_scratch, &mut self.output_scratch)
            .expect("realfft real-to-complex transform failed");

        let half_len = self.n / 2;
        debug_assert!(magnitudes.len() >= half_len);
        for (mag, bin) in magnitudes.iter_mut().zip(&self.output_scratch).take(half_len) {
            *mag = (bin.re * bin.re + bin.im * bin.im).sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn dc_input_produces_energy_only_in_bin_zero() {
        let n = 64;
        let mut fft = RealFft::new(n);
        let real = vec![1.0f32; n];
        let mut mags = vec![0.0f32; n / 2];
        fft.forward(&real, &mut mags);
        assert!(mags[0] > 0.0);
        for &m in &mags[1..] {
            assert!(m < 1e-3, "expected near-zero energy outside DC, got {m}");
        }
    }

    #[test]
    fn pure_tone_peaks_at_expected_bin() {
        let n = 2048;
        let sample_rate = 44_100.0f32;
        let freq = 1000.0f32;
        let mut fft = RealFft::new(n);
        let real: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect();
        let mut mags = vec![0.0f32; n / 2];
        fft.forward(&real, &mut mags);

        let expected_bin = (freq * n as f32 / sample_rate).round() as usize;
        let (peak_bin, _) = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert!(
            (peak_bin as i64 - expected_bin as i64).abs() <= 1,
            "peak at {peak_bin}, expected near {expected_bin}"
        );
    }

    #[test]
    fn output_len_is_half_plus_one() {
        let fft = RealFft::new(256);
        assert_eq!(fft.output_len(), 129);
        assert_eq!(fft.padded_len(), 256);
    }
}
