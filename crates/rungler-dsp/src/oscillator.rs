//! Reflecting-ramp oscillator voice.
//!
//! The phase is a bipolar ramp that bounces between -1 and +1, so the phase
//! value itself is the triangle output and no trigonometry is involved. A
//! two-level pulse is derived from the phase sign. The core is intentionally
//! not band-limited; the slightly gritty edge is part of the sound.

/// Lowest accepted base frequency in Hz.
pub const MIN_FREQ_HZ: f64 = 0.1;

/// Highest accepted base frequency in Hz.
pub const MAX_FREQ_HZ: f64 = 20000.0;

/// Replacement frequency for non-finite setter input.
pub const DEFAULT_FREQ_HZ: f64 = 440.0;

// One triangle cycle traverses 4 phase units: 2 up, 2 down.
const PHASE_UNITS_PER_CYCLE: f64 = 4.0;

/// A single reflecting-ramp voice.
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f64,
    direction: f64,
    prev_phase: f64,
    base_freq: f64,
    mod_depth: f64,
}

impl Oscillator {
    /// Creates a voice at the given base frequency, at phase 0 moving up.
    pub fn new(base_freq_hz: f64) -> Self {
        let mut osc = Self {
            phase: 0.0,
            direction: 1.0,
            prev_phase: 0.0,
            base_freq: DEFAULT_FREQ_HZ,
            mod_depth: 0.0,
        };
        osc.set_base_freq(base_freq_hz);
        osc
    }

    /// Sets the base frequency, clamped to [`MIN_FREQ_HZ`, `MAX_FREQ_HZ`].
    ///
    /// Non-finite input is replaced with [`DEFAULT_FREQ_HZ`].
    pub fn set_base_freq(&mut self, freq_hz: f64) {
        self.base_freq = if freq_hz.is_finite() {
            freq_hz.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ)
        } else {
            DEFAULT_FREQ_HZ
        };
    }

    /// Sets the cross-modulation depth, clamped to [0, 1].
    ///
    /// Non-finite input is replaced with 0 (no modulation).
    pub fn set_mod_depth(&mut self, depth: f64) {
        self.mod_depth = if depth.is_finite() {
            depth.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Current base frequency in Hz.
    pub fn base_freq(&self) -> f64 {
        self.base_freq
    }

    /// Current cross-modulation depth.
    pub fn mod_depth(&self) -> f64 {
        self.mod_depth
    }

    /// Advances the phase by one sample at the given effective frequency.
    ///
    /// The phase reflects at both bounds with exactly one direction flip per
    /// crossing. `freq_hz` must not exceed Nyquist for the given rate; the
    /// caller clamps it there, which keeps the per-sample step small enough
    /// for a single reflection.
    pub fn advance(&mut self, freq_hz: f64, sample_rate: f64) {
        self.prev_phase = self.phase;
        self.phase += self.direction * PHASE_UNITS_PER_CYCLE * freq_hz / sample_rate;
        if self.phase > 1.0 {
            self.phase = 2.0 - self.phase;
            self.direction = -1.0;
        } else if self.phase < -1.0 {
            self.phase = -2.0 - self.phase;
            self.direction = 1.0;
        }
    }

    /// Current triangle value: the phase itself.
    pub fn triangle(&self) -> f64 {
        self.phase
    }

    /// Two-level pulse derived from the phase sign; zero counts as high.
    pub fn pulse(&self) -> f64 {
        if self.phase >= 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// True when the last [`advance`](Self::advance) crossed zero upward.
    pub fn rising_edge(&self) -> bool {
        self.prev_phase < 0.0 && self.phase >= 0.0
    }

    /// Returns to the deterministic startup state: phase 0, moving up.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.prev_phase = 0.0;
        self.direction = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 48000.0;

    #[test]
    fn test_phase_stays_bounded_at_extreme_frequency() {
        let mut osc = Oscillator::new(MAX_FREQ_HZ);
        for _ in 0..10000 {
            osc.advance(MAX_FREQ_HZ, SAMPLE_RATE);
            let t = osc.triangle();
            assert!(t.is_finite());
            assert!((-1.0..=1.0).contains(&t), "phase out of range: {t}");
        }
    }

    #[test]
    fn test_phase_stays_bounded_at_nyquist() {
        let mut osc = Oscillator::new(MAX_FREQ_HZ);
        for _ in 0..1000 {
            osc.advance(SAMPLE_RATE / 2.0, SAMPLE_RATE);
            assert!((-1.0..=1.0).contains(&osc.triangle()));
        }
    }

    #[test]
    fn test_triangle_period_matches_frequency() {
        let mut osc = Oscillator::new(100.0);
        let mut edges = Vec::new();
        for i in 0..48000 {
            osc.advance(100.0, SAMPLE_RATE);
            if osc.rising_edge() {
                edges.push(i);
            }
        }
        assert!(edges.len() >= 99, "only {} cycles detected", edges.len());
        let span = (edges[edges.len() - 1] - edges[0]) as f64;
        let freq = (edges.len() - 1) as f64 * SAMPLE_RATE / span;
        assert!((freq - 100.0).abs() < 1.0, "measured {freq} Hz");
    }

    #[test]
    fn test_triangle_reaches_both_bounds() {
        let mut osc = Oscillator::new(500.0);
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for _ in 0..4800 {
            osc.advance(500.0, SAMPLE_RATE);
            min = min.min(osc.triangle());
            max = max.max(osc.triangle());
        }
        assert!(max > 0.95, "max only reached {max}");
        assert!(min < -0.95, "min only reached {min}");
    }

    #[test]
    fn test_pulse_follows_phase_sign() {
        let mut osc = Oscillator::new(300.0);
        for _ in 0..2000 {
            osc.advance(300.0, SAMPLE_RATE);
            if osc.triangle() >= 0.0 {
                assert_eq!(osc.pulse(), 1.0);
            } else {
                assert_eq!(osc.pulse(), -1.0);
            }
        }
    }

    #[test]
    fn test_one_rising_edge_per_cycle() {
        let mut osc = Oscillator::new(200.0);
        let mut edges = 0;
        // 200 Hz over one second: expect 200 edges give or take the ends.
        for _ in 0..48000 {
            osc.advance(200.0, SAMPLE_RATE);
            if osc.rising_edge() {
                edges += 1;
            }
        }
        assert!((199..=201).contains(&edges), "counted {edges} edges");
    }

    #[test]
    fn test_setters_sanitize() {
        let mut osc = Oscillator::new(200.0);

        osc.set_base_freq(f64::NAN);
        assert_eq!(osc.base_freq(), DEFAULT_FREQ_HZ);
        osc.set_base_freq(f64::INFINITY);
        assert_eq!(osc.base_freq(), DEFAULT_FREQ_HZ);
        osc.set_base_freq(1.0e9);
        assert_eq!(osc.base_freq(), MAX_FREQ_HZ);
        osc.set_base_freq(0.0);
        assert_eq!(osc.base_freq(), MIN_FREQ_HZ);

        osc.set_mod_depth(f64::NEG_INFINITY);
        assert_eq!(osc.mod_depth(), 0.0);
        osc.set_mod_depth(7.0);
        assert_eq!(osc.mod_depth(), 1.0);
        osc.set_mod_depth(-1.0);
        assert_eq!(osc.mod_depth(), 0.0);
    }

    #[test]
    fn test_reset_restores_startup_state() {
        let mut osc = Oscillator::new(500.0);
        for _ in 0..123 {
            osc.advance(500.0, SAMPLE_RATE);
        }
        osc.reset();
        assert_eq!(osc.triangle(), 0.0);
        assert_eq!(osc.pulse(), 1.0);
        assert!(!osc.rising_edge());
    }
}
