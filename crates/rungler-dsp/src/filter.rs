//! One-pole smoothing of the stepped register voltage.
//!
//! The cutoff derives exponentially from a normalized amount: 0 places it
//! at Nyquist (no perceptible filtering), 1 at 5 Hz (heavy smoothing that
//! rounds the 8-level steps into continuous curves).

use std::f64::consts::TAU;

/// Lowest reachable cutoff in Hz (full smoothing).
pub const MIN_CUTOFF_HZ: f64 = 5.0;

/// Maps a normalized smoothing amount to a cutoff in Hz.
///
/// The law is exponential between Nyquist (amount 0) and [`MIN_CUTOFF_HZ`]
/// (amount 1): `5 * (nyquist / 5)^(1 - amount)`. The result always lies
/// within [5 Hz, Nyquist]; non-finite amounts fall back to 0.
pub fn cutoff_for_amount(amount: f64, sample_rate: f64) -> f64 {
    let amount = if amount.is_finite() {
        amount.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let nyquist = sample_rate * 0.5;
    let lo = MIN_CUTOFF_HZ.min(nyquist);
    (MIN_CUTOFF_HZ * (nyquist / MIN_CUTOFF_HZ).powf(1.0 - amount)).clamp(lo, nyquist)
}

/// One-pole lowpass whose state is its previous output.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    state: f64,
    alpha: f64,
}

impl SmoothingFilter {
    /// Creates an unconfigured filter that passes input through unchanged.
    pub fn new() -> Self {
        Self {
            state: 0.0,
            alpha: 1.0,
        }
    }

    /// Derives the coefficient for the given amount and sample rate.
    pub fn configure(&mut self, amount: f64, sample_rate: f64) {
        let nyquist = sample_rate * 0.5;
        let cutoff = cutoff_for_amount(amount, sample_rate);
        // Cutoff at Nyquist is the no-filtering case.
        self.alpha = if cutoff >= nyquist {
            1.0
        } else {
            1.0 - (-TAU * cutoff / sample_rate).exp()
        };
    }

    /// Clears the retained output.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Filters one sample.
    pub fn process(&mut self, input: f64) -> f64 {
        self.state += self.alpha * (input - self.state);
        self.state
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}
