//! Rungler - a chaotic, self-modulating stepped-voltage generator.
//!
//! The core is a "Rungler"-style shift-register oscillator: two bipolar
//! ramp oscillators, an edge-clocked shift register with nonlinear
//! feedback, a 3-bit voltage quantizer, and a one-pole smoothing filter,
//! closed into a feedback loop. Oscillator 2 clocks the register, the
//! register's quantized voltage is smoothed and bent into both
//! oscillators' effective frequency for the next sample. The loop stays
//! bounded without ever settling: the territory between a pattern and
//! noise.
//!
//! # Determinism
//!
//! Given the same seed and the same sequence of parameter changes, output
//! is bit-for-bit reproducible. All randomness flows through a
//! per-instance PCG32 stream with BLAKE3 seed derivation ([`rng`]); no
//! process-global state exists anywhere.
//!
//! # Real-time behavior
//!
//! Processing allocates nothing, never blocks, and never fails: invalid
//! parameter values are clamped or replaced at the setter boundary, and
//! processing before [`Rungler::prepare`] yields silence instead of an
//! error.
//!
//! # Example
//!
//! ```
//! use rungler_dsp::{Channel, Rungler};
//!
//! let mut rungler = Rungler::new();
//! rungler.seed(42);
//! rungler.set_osc1_freq(200.0);
//! rungler.set_osc2_freq(300.0);
//! rungler.set_mod_depth(0.5);
//! rungler.prepare(48000.0);
//!
//! let sample = rungler.process();
//! assert!(sample.mix.abs() <= 1.0);
//!
//! let mut voltage = [0.0; 64];
//! rungler.process_channel(Channel::Rungler, &mut voltage);
//! ```
//!
//! # Crate Structure
//!
//! - [`generator`] - The top-level [`Rungler`] generator and its lifecycle
//! - [`oscillator`] - Reflecting-ramp oscillator voice
//! - [`register`] - Shift register and 3-bit voltage quantizer
//! - [`filter`] - One-pole smoothing of the stepped voltage
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`patch`] - Serializable parameter snapshots

pub mod filter;
pub mod generator;
pub mod oscillator;
pub mod patch;
pub mod register;
pub mod rng;

// Re-export main types at crate root
pub use generator::{Channel, OutputSample, Rungler};
pub use patch::Patch;
