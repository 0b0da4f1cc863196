//! Analysis session configuration.
//!
//! Grounded on the teacher's `PluginLearnParams` pattern of constructing and validating a
//! parameter set once up front (see `src/lib.rs` in the teacher plugin); here there is no host
//! automation system, so the parameter object collapses to a plain struct built through a
//! validating constructor instead of `nih_plug`'s `Params` derive.

use crate::error::{self, LibResult, Result};
use crate::window::WindowType;

/// Per-bin weighting applied as a function of distance (in doubled semitone units) from the
/// nearest equal-tempered pitch. See spec §4.4 step 4d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinWeight {
    Uniform,
    Discrete,
    Linear,
    Quadratic,
    Exponential,
}

impl BinWeight {
    /// Weight for a bin at semitone-distance `d` (already doubled, per spec §4.4c).
    pub fn weight(self, d: f32) -> f32 {
        match self {
            BinWeight::Uniform => 1.0,
            BinWeight::Discrete => {
                if d <= 0.2 {
                    1.0
                } else {
                    0.0
                }
            }
            BinWeight::Linear => 1.0 - d,
            BinWeight::Quadratic => 1.0 - d * d,
            BinWeight::Exponential => (-d).exp(),
        }
    }
}

/// Linear-EQ coefficients applied per-bin when `linear_eq_active` is set (spec §4.4e).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEq {
    pub intercept: f32,
    pub slope: f32,
}

impl Default for LinearEq {
    fn default() -> Self {
        Self {
            intercept: 1.0,
            slope: 0.0,
        }
    }
}

/// Immutable per-session analysis configuration (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    window_len: usize,
    zero_pad: usize,
    sample_rate: f32,
    peak_threshold: f32,
    linear_eq: LinearEq,
    pcp_active: bool,
    harmonics_active: bool,
    linear_eq_active: bool,
    octave_active: [bool; 8],
    octave_channel: [u8; 8],
    bin_weight: BinWeight,
    window_type: WindowType,
}

/// Builder for [`AnalysisConfig`], validating every field before the session can start.
#[derive(Debug, Clone)]
pub struct AnalysisConfigBuilder {
    window_len: usize,
    zero_pad: usize,
    sample_rate: f32,
    peak_threshold: f32,
    linear_eq: LinearEq,
    pcp_active: bool,
    harmonics_active: bool,
    linear_eq_active: bool,
    octave_active: [bool; 8],
    octave_channel: [u8; 8],
    bin_weight: BinWeight,
    window_type: WindowType,
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self {
            window_len: 2048,
            zero_pad: 4,
            sample_rate: 44_100.0,
            peak_threshold: 20.0,
            linear_eq: LinearEq::default(),
            pcp_active: true,
            harmonics_active: true,
            linear_eq_active: false,
            octave_active: [true; 8],
            octave_channel: [0; 8],
            bin_weight: BinWeight::Uniform,
            window_type: WindowType::Hann,
        }
    }
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }

    pub fn zero_pad(mut self, zero_pad: usize) -> Self {
        self.zero_pad = zero_pad;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn peak_threshold(mut self, peak_threshold: f32) -> Self {
        self.peak_threshold = peak_threshold;
        self
    }

    pub fn linear_eq(mut self, linear_eq: LinearEq) -> Self {
        self.linear_eq = linear_eq;
        self
    }

    pub fn pcp_active(mut self, active: bool) -> Self {
        self.pcp_active = active;
        self
    }

    pub fn harmonics_active(mut self, active: bool) -> Self {
        self.harmonics_active = active;
        self
    }

    pub fn linear_eq_active(mut self, active: bool) -> Self {
        self.linear_eq_active = active;
        self
    }

    pub fn octave_active(mut self, octave_active: [bool; 8]) -> Self {
        self.octave_active = octave_active;
        self
    }

    pub fn octave_channel(mut self, octave_channel: [u8; 8]) -> Self {
        self.octave_channel = octave_channel;
        self
    }

    pub fn bin_weight(mut self, bin_weight: BinWeight) -> Self {
        self.bin_weight = bin_weight;
        self
    }

    pub fn window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<AnalysisConfig> {
        Ok(self.build_inner()?)
    }

    fn build_inner(self) -> LibResult<AnalysisConfig> {
        if !self.window_len.is_power_of_two() {
            return error::InvalidConfig {
                description: format!("window_len {} is not a power of two", self.window_len),
            }
            .fail();
        }
        if !matches!(self.zero_pad, 1 | 2 | 4 | 8) {
            return error::InvalidConfig {
                description: format!("zero_pad {} must be one of 1, 2, 4, 8", self.zero_pad),
            }
            .fail();
        }
        if self.sample_rate <= 0.0 {
            return error::InvalidConfig {
                description: "sample_rate must be positive".to_string(),
            }
            .fail();
        }
        if self.peak_threshold < 0.0 {
            return error::InvalidConfig {
                description: "peak_threshold must be >= 0".to_string(),
            }
            .fail();
        }
        for (octave, &channel) in self.octave_channel.iter().enumerate() {
            if channel > 15 {
                return error::InvalidConfig {
                    description: format!(
                        "octave_channel[{octave}] = {channel} is not a valid MIDI channel (0..=15)"
                    ),
                }
                .fail();
            }
        }
        Ok(AnalysisConfig {
            window_len: self.window_len,
            zero_pad: self.zero_pad,
            sample_rate: self.sample_rate,
            peak_threshold: self.peak_threshold,
            linear_eq: self.linear_eq,
            pcp_active: self.pcp_active,
            harmonics_active: self.harmonics_active,
            linear_eq_active: self.linear_eq_active,
            octave_active: self.octave_active,
            octave_channel: self.octave_channel,
            bin_weight: self.bin_weight,
            window_type: self.window_type,
        })
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Analysis window length W.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Zero-pad factor Z.
    pub fn zero_pad(&self) -> usize {
        self.zero_pad
    }

    /// Zero-padded FFT length N = W·Z.
    pub fn padded_len(&self) -> usize {
        self.window_len * self.zero_pad
    }

    /// Half-spectrum length H = N/2.
    pub fn half_len(&self) -> usize {
        self.padded_len() / 2
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn peak_threshold(&self) -> f32 {
        self.peak_threshold
    }

    pub fn linear_eq(&self) -> LinearEq {
        self.linear_eq
    }

    pub fn pcp_active(&self) -> bool {
        self.pcp_active
    }

    pub fn harmonics_active(&self) -> bool {
        self.harmonics_active
    }

    pub fn linear_eq_active(&self) -> bool {
        self.linear_eq_active
    }

    pub fn octave_active(&self, octave: usize) -> bool {
        self.octave_active[octave]
    }

    pub fn octave_channel(&self, octave: usize) -> u8 {
        self.octave_channel[octave]
    }

    pub fn bin_weight(&self) -> BinWeight {
        self.bin_weight
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }
}
