use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::OscillatorUnit;

/*
Audio Oscillator
================

An oscillator is the fundamental sound source in a synthesizer. It generates
a repeating waveform at a specific frequency (pitch), producing the raw
audio material that gets shaped by envelopes and the shared filter.

Phase Accumulator
-----------------

Every waveform here is a function of a single phase value in [0, 1):

    phase += frequency / sample_rate      (once per sample)
    phase -= 1.0 when phase >= 1.0        (wrap)

    Sine:      sin(TAU * phase)
    Triangle:  1 - 4 * |phase - 0.5|
    Saw:       2 * phase - 1
    Square:    +1 for phase < 0.5, -1 otherwise

No band-limiting is applied. The naive saw and square alias at high pitches,
which is acceptable for a control-core test bed.

Waveform Selection
------------------

The waveform is a discrete choice driven by a relative encoder. Turning the
encoder steps through the list and wraps at both ends:

    Sine → Triangle → Saw → Square → Sine → ...
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Waveform {
    Sine,
    Triangle,
    #[default]
    Saw,
    Square,
}

impl Waveform {
    /// All waveforms in encoder order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::Saw => 2,
            Waveform::Square => 3,
        }
    }

    /// Move `delta` positions through [`Waveform::ALL`], wrapping in both directions.
    pub fn step(self, delta: i32) -> Waveform {
        let count = Self::COUNT as i32;
        let next = (self.index() as i32 + delta).rem_euclid(count);
        Self::ALL[next as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Saw => "saw",
            Waveform::Square => "square",
        }
    }
}

pub struct Oscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    waveform: Waveform,
}

impl Oscillator {
    pub fn new(sample_rate: f32, waveform: Waveform) -> Self {
        Self {
            sample_rate,
            frequency: 220.0,
            phase: 0.0,
            waveform,
        }
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(sample_rate, Waveform::Sine)
    }

    pub fn sawtooth(sample_rate: f32) -> Self {
        Self::new(sample_rate, Waveform::Saw)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn shape(&self) -> f32 {
        let p = self.phase;
        match self.waveform {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
            Waveform::Saw => 2.0 * p - 1.0,
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl OscillatorUnit for Oscillator {
    fn set_frequency(&mut self, hz: f32) {
        // Keep below Nyquist so the phase increment stays under 0.5
        self.frequency = hz.clamp(0.0, self.sample_rate * 0.5);
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    fn next_sample(&mut self) -> f32 {
        let out = self.shape();
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let mut osc = Oscillator::sine(sample_rate);
        osc.set_frequency(440.0);

        let mut buffer = [0.0f32; 32];
        for s in buffer.iter_mut() {
            *s = osc.next_sample();
        }

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn saw_stays_in_range() {
        let mut osc = Oscillator::sawtooth(48_000.0);
        osc.set_frequency(1000.0);
        for _ in 0..4800 {
            let s = osc.next_sample();
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn waveform_step_wraps_both_ways() {
        assert_eq!(Waveform::Square.step(1), Waveform::Sine);
        assert_eq!(Waveform::Sine.step(-1), Waveform::Square);
        assert_eq!(Waveform::Saw.step(4), Waveform::Saw);
        assert_eq!(Waveform::Triangle.step(-6), Waveform::Square);
    }

    #[test]
    fn waveform_index_matches_all() {
        for (i, w) in Waveform::ALL.iter().enumerate() {
            assert_eq!(w.index(), i);
        }
    }
}
