//! Window function table (spec §4.1).
//!
//! Grounded on the teacher's `src/audio/window_functions.rs`: coefficients are generated once per
//! analysis session and reused across every frame. `libm::cosf` is used instead of `f32::cos` so
//! that coefficients are bit-faithful across platforms and compiler versions, exactly as the
//! teacher's module does.

use core::f32::consts::PI;
use libm::cosf;

/// Window families supported for spectral analysis (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    /// No tapering; maximum frequency resolution, worst spectral leakage.
    Rectangular,
    /// Good general-purpose balance between main-lobe width and sidelobe suppression.
    #[default]
    Hann,
    /// Better sidelobe suppression than Hann at the cost of rolloff.
    Hamming,
    /// Strong sidelobe suppression, wider main lobe.
    Blackman,
    /// Four-term window with the strongest sidelobe suppression of the family.
    BlackmanHarris,
}

impl WindowType {
    /// Generate coefficients `w[i]`, i ∈ [0, len), for this window family.
    pub fn generate(self, len: usize) -> Vec<f32> {
        match self {
            WindowType::Rectangular => vec![1.0; len],
            WindowType::Hann => generate_hann(len),
            WindowType::Hamming => generate_hamming(len),
            WindowType::Blackman => generate_blackman(len),
            WindowType::BlackmanHarris => generate_blackman_harris(len),
        }
    }
}

/// A precomputed window of fixed length, ready to apply to successive analysis frames.
///
/// Computed once per session (the teacher's "expensive trig operations only at init" rationale
/// for `WindowData`) and shared read-only thereafter (spec §5).
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    coefficients: Vec<f32>,
}

impl WindowTable {
    /// Precompute a window of `len` samples for `window_type`.
    pub fn new(window_type: WindowType, len: usize) -> Self {
        Self {
            coefficients: window_type.generate(len),
        }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Multiply `buffer[0..len())` sample-wise by the window coefficients, in place.
    pub fn apply_in_place(&self, buffer: &mut [f32]) {
        debug_assert!(buffer.len() >= self.coefficients.len());
        for (sample, &coeff) in buffer.iter_mut().zip(&self.coefficients) {
            *sample *= coeff;
        }
    }

    /// Write `input * window` into `output`, without modifying `input`.
    pub fn apply_out_of_place(&self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), self.coefficients.len());
        debug_assert!(output.len() >= input.len());
        for ((o, &i), &coeff) in output.iter_mut().zip(input).zip(&self.coefficients) {
            *o = i * coeff;
        }
    }

    /// Normalized [0,1] curve for host-side visualization. Not required for correctness.
    pub fn draw_curve(&self) -> Vec<f32> {
        let max = self.coefficients.iter().cloned().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return vec![0.0; self.coefficients.len()];
        }
        self.coefficients.iter().map(|&c| c / max).collect()
    }
}

fn position(i: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        i as f32 / (len - 1) as f32
    }
}

fn generate_hann(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (1.0 - cosf(2.0 * PI * position(i, len))))
        .collect()
}

fn generate_hamming(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.54 - 0.46 * cosf(2.0 * PI * position(i, len)))
        .collect()
}

fn generate_blackman(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let p = position(i, len);
            0.42 - 0.5 * cosf(2.0 * PI * p) + 0.08 * cosf(4.0 * PI * p)
        })
        .collect()
}

fn generate_blackman_harris(len: usize) -> Vec<f32> {
    const A0: f32 = 0.35875;
    const A1: f32 = 0.48829;
    const A2: f32 = 0.14128;
    const A3: f32 = 0.01168;
    (0..len)
        .map(|i| {
            let p = position(i, len);
            A0 - A1 * cosf(2.0 * PI * p) + A2 * cosf(4.0 * PI * p) - A3 * cosf(6.0 * PI * p)
        })
        .collect()
}
