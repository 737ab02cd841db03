//! The top-level generator: output composition and lifecycle.
//!
//! Wires the oscillator pair, the shift register, and the smoothing filter
//! into a closed loop. Oscillator 2's rising zero-crossing clocks the
//! register with oscillator 1's pulse, the register's quantized voltage is
//! smoothed and mapped into both oscillators' effective frequency for the
//! *next* sample. That one-sample delay keeps the loop causal and stable.
//! Everything runs sample-by-sample with no allocation.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::filter::SmoothingFilter;
use crate::oscillator::{Oscillator, MIN_FREQ_HZ};
use crate::register::ShiftRegister;
use crate::rng::{create_rng, derive_component_seed, DEFAULT_SEED};

/// Octave swing of the cross-modulation path at full depth.
pub const OCTAVE_RANGE: f64 = 4.0;

/// Fallback sample rate when [`Rungler::prepare`] receives an unusable value.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Default base frequency for oscillator 1 in Hz.
pub const DEFAULT_OSC1_FREQ: f64 = 220.0;

/// Default base frequency for oscillator 2 in Hz.
pub const DEFAULT_OSC2_FREQ: f64 = 330.0;

/// Default active register width in bits.
pub const DEFAULT_REGISTER_WIDTH: u32 = 8;

const REGISTER_SEED_KEY: &str = "register";

/// One sample of the generator's five simultaneous outputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputSample {
    /// Oscillator 1 triangle, in [-1, 1].
    pub osc1: f64,
    /// Oscillator 2 triangle, in [-1, 1].
    pub osc2: f64,
    /// Smoothed quantizer voltage, in [0, 1].
    pub rungler: f64,
    /// +1 when oscillator 2's triangle exceeds oscillator 1's, else -1.
    pub comparator: f64,
    /// Equal mix of the two triangles, in [-1, 1].
    pub mix: f64,
}

impl OutputSample {
    /// The all-zero sample emitted before `prepare` has been called.
    pub const SILENCE: OutputSample = OutputSample {
        osc1: 0.0,
        osc2: 0.0,
        rungler: 0.0,
        comparator: 0.0,
        mix: 0.0,
    };

    /// Extracts one channel by selector.
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Osc1 => self.osc1,
            Channel::Osc2 => self.osc2,
            Channel::Rungler => self.rungler,
            Channel::Comparator => self.comparator,
            Channel::Mix => self.mix,
        }
    }
}

/// Selector for single-channel block processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Oscillator 1 triangle.
    Osc1,
    /// Oscillator 2 triangle.
    Osc2,
    /// Smoothed quantizer voltage.
    Rungler,
    /// Oscillator comparator (PWM-style two-level signal).
    Comparator,
    /// Equal mix of both triangles.
    Mix,
}

// Maps the feedback voltage into a frequency multiplier, centered so that
// cv = 0.5 leaves the frequency unchanged.
fn cross_mod_multiplier(cv: f64, depth: f64) -> f64 {
    2.0f64.powf(depth * OCTAVE_RANGE * (cv - 0.5))
}

/// The chaotic stepped-voltage generator.
///
/// Owns every piece of state: two oscillator voices, the shift register,
/// the smoothing filter, and a private seeding stream. Nothing is shared
/// across instances and nothing is heap-allocated after construction.
///
/// Call [`prepare`](Self::prepare) once before processing; until then every
/// processing call returns silence.
#[derive(Debug, Clone)]
pub struct Rungler {
    osc1: Oscillator,
    osc2: Oscillator,
    register: ShiftRegister,
    filter: SmoothingFilter,
    filter_amount: f64,
    loop_mode: bool,
    seed_rng: Pcg32,
    last_cv: f64,
    sample_rate: f64,
    prepared: bool,
}

impl Rungler {
    /// Creates an unprepared generator with benign defaults.
    pub fn new() -> Self {
        Self {
            osc1: Oscillator::new(DEFAULT_OSC1_FREQ),
            osc2: Oscillator::new(DEFAULT_OSC2_FREQ),
            register: ShiftRegister::new(DEFAULT_REGISTER_WIDTH),
            filter: SmoothingFilter::new(),
            filter_amount: 0.0,
            loop_mode: false,
            seed_rng: create_rng(derive_component_seed(DEFAULT_SEED, REGISTER_SEED_KEY)),
            last_cv: 0.5,
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// Establishes the sample rate and initializes all processing state.
    ///
    /// Non-finite or non-positive rates fall back to
    /// [`DEFAULT_SAMPLE_RATE`]. Call once at the start of a session and
    /// again whenever the sample rate changes.
    pub fn prepare(&mut self, sample_rate_hz: f64) {
        self.sample_rate = if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
            sample_rate_hz
        } else {
            DEFAULT_SAMPLE_RATE
        };
        self.prepared = true;
        self.reset();
    }

    /// Reinitializes processing state while keeping every parameter.
    ///
    /// The register is re-seeded by drawing from the seeding stream, both
    /// oscillators return to phase 0 moving up, and the filter memory and
    /// stored feedback voltage are cleared (the voltage to its neutral 0.5
    /// midpoint).
    pub fn reset(&mut self) {
        let bits = self.seed_rng.gen::<u32>();
        self.register.load(bits);
        self.osc1.reset();
        self.osc2.reset();
        self.filter.configure(self.filter_amount, self.sample_rate);
        self.filter.reset();
        self.last_cv = 0.5;
    }

    /// Replaces the seeding stream; consumed by the next
    /// [`prepare`](Self::prepare) or [`reset`](Self::reset).
    pub fn seed(&mut self, seed: u32) {
        self.seed_rng = create_rng(derive_component_seed(seed, REGISTER_SEED_KEY));
    }

    /// Sets oscillator 1's base frequency (0.1 Hz - 20 kHz).
    pub fn set_osc1_freq(&mut self, freq_hz: f64) {
        self.osc1.set_base_freq(freq_hz);
    }

    /// Sets oscillator 2's base frequency (0.1 Hz - 20 kHz).
    pub fn set_osc2_freq(&mut self, freq_hz: f64) {
        self.osc2.set_base_freq(freq_hz);
    }

    /// Sets oscillator 1's cross-modulation depth (0-1).
    pub fn set_osc1_mod_depth(&mut self, depth: f64) {
        self.osc1.set_mod_depth(depth);
    }

    /// Sets oscillator 2's cross-modulation depth (0-1).
    pub fn set_osc2_mod_depth(&mut self, depth: f64) {
        self.osc2.set_mod_depth(depth);
    }

    /// Sets both oscillators' cross-modulation depth at once.
    pub fn set_mod_depth(&mut self, depth: f64) {
        self.osc1.set_mod_depth(depth);
        self.osc2.set_mod_depth(depth);
    }

    /// Sets the voltage smoothing amount (0 = none, 1 = heavy).
    pub fn set_filter_amount(&mut self, amount: f64) {
        self.filter_amount = if amount.is_finite() {
            amount.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.filter.configure(self.filter_amount, self.sample_rate);
    }

    /// Sets the active register width in bits (4-16).
    pub fn set_register_width(&mut self, width: u32) {
        self.register.set_width(width);
    }

    /// Switches between XOR feedback (chaos) and pure recirculation (loop).
    pub fn set_loop_mode(&mut self, loop_mode: bool) {
        self.loop_mode = loop_mode;
    }

    /// True once `prepare` has been called.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// The sample rate established by the last `prepare`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Advances the generator by one sample.
    ///
    /// Returns [`OutputSample::SILENCE`] until [`prepare`](Self::prepare)
    /// has been called.
    pub fn process(&mut self) -> OutputSample {
        if !self.prepared {
            return OutputSample::SILENCE;
        }

        // Effective frequencies come from the previous sample's voltage.
        let nyquist = self.sample_rate * 0.5;
        let hi = nyquist.max(MIN_FREQ_HZ);
        let f1 = (self.osc1.base_freq() * cross_mod_multiplier(self.last_cv, self.osc1.mod_depth()))
            .clamp(MIN_FREQ_HZ, hi);
        let f2 = (self.osc2.base_freq() * cross_mod_multiplier(self.last_cv, self.osc2.mod_depth()))
            .clamp(MIN_FREQ_HZ, hi);

        self.osc1.advance(f1, self.sample_rate);
        self.osc2.advance(f2, self.sample_rate);

        if self.osc2.rising_edge() {
            let input = self.osc1.pulse() >= 0.0;
            self.register.clock(input, self.loop_mode);
        }

        let voltage = self.filter.process(self.register.quantize()).clamp(0.0, 1.0);
        self.last_cv = voltage;

        let t1 = self.osc1.triangle();
        let t2 = self.osc2.triangle();
        OutputSample {
            osc1: t1,
            osc2: t2,
            rungler: voltage,
            comparator: if t2 > t1 { 1.0 } else { -1.0 },
            mix: 0.5 * (t1 + t2),
        }
    }

    /// Fills a block of output samples.
    pub fn process_block(&mut self, out: &mut [OutputSample]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }

    /// Writes a single selected channel into a caller-provided buffer.
    pub fn process_channel(&mut self, channel: Channel, out: &mut [f64]) {
        for value in out.iter_mut() {
            *value = self.process().channel(channel);
        }
    }
}

impl Default for Rungler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_is_neutral_at_center() {
        assert_eq!(cross_mod_multiplier(0.5, 1.0), 1.0);
        assert_eq!(cross_mod_multiplier(0.0, 0.0), 1.0);
        assert_eq!(cross_mod_multiplier(1.0, 0.0), 1.0);
    }

    #[test]
    fn test_multiplier_spans_the_octave_range() {
        assert!((cross_mod_multiplier(1.0, 1.0) - 4.0).abs() < 1e-12);
        assert!((cross_mod_multiplier(0.0, 1.0) - 0.25).abs() < 1e-12);
        assert!((cross_mod_multiplier(1.0, 0.5) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_process_before_prepare_is_silent() {
        let mut rungler = Rungler::new();
        rungler.set_mod_depth(1.0);
        assert_eq!(rungler.process(), OutputSample::SILENCE);
        assert!(!rungler.is_prepared());
    }

    #[test]
    fn test_prepare_sanitizes_the_sample_rate() {
        let mut rungler = Rungler::new();
        rungler.prepare(f64::NAN);
        assert_eq!(rungler.sample_rate(), DEFAULT_SAMPLE_RATE);
        rungler.prepare(-48000.0);
        assert_eq!(rungler.sample_rate(), DEFAULT_SAMPLE_RATE);
        rungler.prepare(96000.0);
        assert_eq!(rungler.sample_rate(), 96000.0);
        assert!(rungler.is_prepared());
    }

    #[test]
    fn test_seed_then_reset_replays_the_stream() {
        let mut rungler = Rungler::new();
        rungler.seed(123);
        rungler.prepare(48000.0);
        let first: Vec<OutputSample> = (0..1000).map(|_| rungler.process()).collect();

        rungler.seed(123);
        rungler.reset();
        let second: Vec<OutputSample> = (0..1000).map(|_| rungler.process()).collect();

        assert_eq!(first, second);
    }
}
