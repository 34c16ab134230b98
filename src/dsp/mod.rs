//! Low-level DSP units driven by the voice pool.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. The pool only talks to oscillators and
//! envelopes through [`OscillatorUnit`] and [`EnvelopeUnit`], so any unit that
//! produces one sample per call can be plugged into a voice.

/// Attack/decay envelope generator.
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Audio-band oscillator with a small set of discrete waveforms.
pub mod oscillator;
/// Schroeder reverb built from comb and allpass filters.
pub mod reverb;

pub use envelope::{AdEnvelope, EnvelopeStage};
pub use filter::SVFilter;
pub use oscillator::{Oscillator, Waveform};
pub use reverb::SchroederReverb;

/// A pitched sound source owned by a single voice.
pub trait OscillatorUnit: Send {
    fn set_frequency(&mut self, hz: f32);

    fn set_waveform(&mut self, waveform: Waveform);

    /// Advance one sample and return it (roughly -1.0..=1.0).
    fn next_sample(&mut self) -> f32;
}

/// An amplitude envelope owned by a single voice.
///
/// `trigger` is a stateless pulse: there is no gate-off. A voice that has been
/// released simply keeps reading the envelope until it decays to silence.
pub trait EnvelopeUnit: Send {
    fn set_attack(&mut self, seconds: f32);

    fn set_decay(&mut self, seconds: f32);

    fn trigger(&mut self);

    /// Advance one sample and return the new level.
    fn next_sample(&mut self) -> f32;

    /// Level produced by the most recent `next_sample` call.
    fn level(&self) -> f32;
}
