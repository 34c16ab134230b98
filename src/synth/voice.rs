use crate::{
    dsp::{EnvelopeUnit, OscillatorUnit, Waveform},
    io::converter::midi_note_to_freq,
};

/*
Voice Lifecycle
===============

    ┌──────┐  set_note   ┌──────────┐  release   ┌───────────┐
    │ Idle │ ──────────→ │ Sounding │ ─────────→ │ Releasing │
    └──────┘             └──────────┘            └───────────┘
        ↑                                              │
        │        envelope < SILENCE_THRESHOLD          │
        └──────────────── (per sample) ────────────────┘

Sounding and Releasing are both "active": both are mixed and neither can be
handed out by plain allocation. Release does not touch the oscillator or the
envelope; the envelope finishes its decay on its own and the per-sample sweep
in the pool reclaims the voice once it is inaudible.
*/

/// Envelope level below which a releasing voice is considered finished.
pub const SILENCE_THRESHOLD: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Available for allocation
    Sounding,  // Note held
    Releasing, // Note released, envelope still audible
}

/// One synthesis slot: an oscillator, an envelope, and the note bookkeeping
/// the pool needs for allocation.
pub struct Voice<O, E> {
    note: Option<u8>,
    velocity: f32,
    state: VoiceState,
    age: u32,
    osc: O,
    env: E,
}

impl<O: OscillatorUnit, E: EnvelopeUnit> Voice<O, E> {
    pub fn new(osc: O, env: E) -> Self {
        Self {
            note: None,
            velocity: 0.0,
            state: VoiceState::Idle,
            age: 0,
            osc,
            env,
        }
    }

    /// Assign a note and fire the envelope.
    ///
    /// `velocity` is already normalized to 0.0..=1.0.
    pub fn set_note(&mut self, note: u8, velocity: f32) {
        self.note = Some(note);
        self.velocity = velocity.clamp(0.0, 1.0);
        self.state = VoiceState::Sounding;
        self.age = 0;

        self.osc.set_frequency(midi_note_to_freq(note));
        self.env.trigger();
    }

    /// Mark the note as released. Idempotent on Releasing and Idle voices.
    pub fn release(&mut self) {
        if self.state == VoiceState::Sounding {
            self.state = VoiceState::Releasing;
        }
    }

    /// Return to Idle and forget the note.
    pub fn clear(&mut self) {
        self.state = VoiceState::Idle;
        self.note = None;
        self.velocity = 0.0;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Sounding | VoiceState::Releasing)
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    pub fn is_releasing(&self) -> bool {
        self.state == VoiceState::Releasing
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub(crate) fn increment_age(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    #[cfg(test)]
    pub(crate) fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.env.level()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.env.set_attack(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.env.set_decay(seconds);
    }

    pub fn oscillator(&self) -> &O {
        &self.osc
    }

    pub fn envelope(&self) -> &E {
        &self.env
    }

    /// Advance the envelope one sample and return its level.
    #[inline]
    pub(crate) fn next_envelope(&mut self) -> f32 {
        self.env.next_sample()
    }

    #[inline]
    pub(crate) fn next_oscillator(&mut self) -> f32 {
        self.osc.next_sample()
    }
}
