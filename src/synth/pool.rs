use serde::{Deserialize, Serialize};

use crate::{
    dsp::{AdEnvelope, EnvelopeUnit, Oscillator, OscillatorUnit, Waveform},
    synth::voice::{Voice, SILENCE_THRESHOLD},
    MAX_VOICES,
};

/*
Voice Allocation
================

Every note-on goes through one deterministic decision, scanning voices in
index order:

  1. Duplicate?   Some active voice (Sounding or Releasing) already holds this
                  note → drop the event. No retrigger, no steal.
  2. Idle voice?  Take the lowest-indexed Idle voice.
  3. Steal.       Take the voice with the largest age. Ties go to the lowest
                  index.

Age is relative, not a timestamp. Triggering a voice resets its age to 0 and
bumps the age of every OTHER active voice by one:

    ages before   [3, 1, 4, 2]    (all active, pool full)
    NoteOn(60)    steal index 2   (largest age)
    ages after    [4, 2, 0, 3]

so the largest age always belongs to the voice that has gone the longest
without being retriggered.

Liveness Sweep
--------------

`next_sample` runs once per output sample. For each voice it advances the
envelope, reclaims releasing voices whose level fell below SILENCE_THRESHOLD,
and sums the active ones:

    mix = headroom * Σ osc * env [* velocity]

headroom = 1 / capacity, so a full pool at peak level cannot exceed unity.
*/

/// How a voice's stored velocity enters the mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixMode {
    /// osc * env * velocity
    #[default]
    Velocity,
    /// osc * env
    Flat,
}

/// Where a note-on landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// An idle voice was free.
    Idle(usize),
    /// The pool was full and this voice was taken over.
    Stolen(usize),
}

impl Allocation {
    pub fn index(self) -> usize {
        match self {
            Allocation::Idle(i) | Allocation::Stolen(i) => i,
        }
    }
}

/// Fixed-capacity set of voices. Built once, never resized.
pub struct VoicePool<O, E> {
    voices: Vec<Voice<O, E>>,
    mix_mode: MixMode,
    headroom: f32,
}

/// The pool used by [`Synth`](crate::synth::engine::Synth).
pub type SynthVoicePool = VoicePool<Oscillator, AdEnvelope>;

impl<O: OscillatorUnit, E: EnvelopeUnit> VoicePool<O, E> {
    /// Build `capacity` voices (clamped to 1..=MAX_VOICES) from a factory.
    pub fn from_fn(
        capacity: usize,
        mix_mode: MixMode,
        mut make_voice: impl FnMut(usize) -> Voice<O, E>,
    ) -> Self {
        let capacity = capacity.clamp(1, MAX_VOICES);
        let voices: Vec<_> = (0..capacity).map(&mut make_voice).collect();

        Self {
            voices,
            mix_mode,
            headroom: 1.0 / capacity as f32,
        }
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn mix_mode(&self) -> MixMode {
        self.mix_mode
    }

    pub fn set_mix_mode(&mut self, mix_mode: MixMode) {
        self.mix_mode = mix_mode;
    }

    pub fn voice(&self, index: usize) -> Option<&Voice<O, E>> {
        self.voices.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice<O, E>> {
        self.voices.iter()
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Pick the voice for `note`, or `None` if the note is already active.
    pub fn find_available_voice(&self, note: u8) -> Option<Allocation> {
        if self
            .voices
            .iter()
            .any(|v| v.is_active() && v.note() == Some(note))
        {
            return None;
        }

        if let Some(idx) = self.voices.iter().position(|v| v.is_idle()) {
            return Some(Allocation::Idle(idx));
        }

        // Strict `>` keeps the lowest index on ties
        let mut oldest = 0;
        for (idx, voice) in self.voices.iter().enumerate().skip(1) {
            if voice.age() > self.voices[oldest].age() {
                oldest = idx;
            }
        }
        Some(Allocation::Stolen(oldest))
    }

    /// Handle a note-on. Velocity 0 is treated as a note-off.
    ///
    /// Returns where the note landed, or `None` when nothing was triggered.
    pub fn handle_note_on(&mut self, note: u8, velocity: u8) -> Option<Allocation> {
        if velocity == 0 {
            self.handle_note_off(note);
            return None;
        }

        let Some(allocation) = self.find_available_voice(note) else {
            tracing::trace!(note, "duplicate note-on ignored");
            return None;
        };

        let target = allocation.index();
        if let Allocation::Stolen(idx) = allocation {
            tracing::trace!(
                note,
                voice = idx,
                previous = ?self.voices[idx].note(),
                "stealing voice"
            );
        }

        self.voices[target].set_note(note, velocity as f32 / 127.0);

        for (idx, voice) in self.voices.iter_mut().enumerate() {
            if idx != target && voice.is_active() {
                voice.increment_age();
            }
        }

        Some(allocation)
    }

    /// Release every active voice holding `note`.
    pub fn handle_note_off(&mut self, note: u8) {
        for voice in self
            .voices
            .iter_mut()
            .filter(|v| v.is_active() && v.note() == Some(note))
        {
            voice.release();
        }
    }

    /// Release every active voice.
    pub fn release_all(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.release();
        }
    }

    /// Force every voice back to Idle without waiting for the envelopes.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.clear();
        }
    }

    /// Per-sample liveness sweep and mix.
    pub fn next_sample(&mut self) -> f32 {
        let velocity_scaled = self.mix_mode == MixMode::Velocity;
        let mut mix = 0.0;

        for voice in &mut self.voices {
            let env = voice.next_envelope();

            if voice.is_releasing() && env.abs() < SILENCE_THRESHOLD {
                voice.clear();
                continue;
            }

            if voice.is_active() {
                let mut sample = voice.next_oscillator() * env;
                if velocity_scaled {
                    sample *= voice.velocity();
                }
                mix += sample;
            }
        }

        mix * self.headroom
    }

    /// Run the sweep for every sample in `out`, overwriting it.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        for voice in &mut self.voices {
            voice.set_waveform(waveform);
        }
    }

    pub fn set_attack(&mut self, seconds: f32) {
        for voice in &mut self.voices {
            voice.set_attack(seconds);
        }
    }

    pub fn set_decay(&mut self, seconds: f32) {
        for voice in &mut self.voices {
            voice.set_decay(seconds);
        }
    }

    #[cfg(test)]
    pub(crate) fn voice_mut(&mut self, index: usize) -> Option<&mut Voice<O, E>> {
        self.voices.get_mut(index)
    }
}

impl SynthVoicePool {
    /// Saw oscillators and AD envelopes with the given times.
    pub fn with_defaults(
        capacity: usize,
        sample_rate: f32,
        mix_mode: MixMode,
        waveform: Waveform,
        attack: f32,
        decay: f32,
    ) -> Self {
        Self::from_fn(capacity, mix_mode, |_| {
            Voice::new(
                Oscillator::new(sample_rate, waveform),
                AdEnvelope::ad(sample_rate, attack, decay),
            )
        })
    }
}
