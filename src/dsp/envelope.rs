use super::EnvelopeUnit;

/*
AD Envelope Implementation
==========================

This module implements a linear attack/decay envelope: a single trigger pulse
starts a rise to the peak level followed immediately by a fall back to zero.
There is no sustain stage and no gate, which is what makes it a good fit for
the voice pool: a released voice keeps reading the envelope and is reclaimed
once the decay has become inaudible.

Vocabulary
----------

  level       The envelope's current output value (0.0 to peak). This
              multiplies the oscillator signal to control its amplitude.

  stage       Which phase of the envelope we're in: Idle, Attack or Decay.

  trigger     A stateless pulse. Each trigger restarts the attack from the
              CURRENT level, so retriggering a sounding voice does not click.

  increment   How much `level` changes per sample, derived from the stage
              duration and the sample rate.


The Shape
---------

  Level
   peak ┐     ╱╲
        │    ╱  ╲
        │   ╱    ╲
        │  ╱      ╲
    0.0 └─╱────────╲──────→ Time
        Attack  Decay   Idle


The Math: Time to Increment
---------------------------

    increment = peak / (time_seconds * sample_rate)

Example: Decay of 0.35 seconds at 48kHz with a peak of 0.9
  - Total samples = 0.35 * 48000 = 16800 samples
  - decrement = 0.9 / 16800 ≈ 0.0000536

Times are clamped to at least one sample so the increment stays finite.


The State Machine
-----------------

    ┌──────┐  trigger  ┌────────┐  level=peak  ┌───────┐  level=0  ┌──────┐
    │ Idle │ ────────→ │ Attack │ ───────────→ │ Decay │ ────────→ │ Idle │
    └──────┘           └────────┘              └───────┘           └──────┘
                            ↑                      │
                            └──────── trigger ─────┘
*/

pub const DEFAULT_ATTACK: f32 = 0.005;
pub const DEFAULT_DECAY: f32 = 0.35;
pub const DEFAULT_PEAK: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,   // level = 0, waiting for a trigger
    Attack, // ramping up to peak
    Decay,  // ramping down to 0
}

pub struct AdEnvelope {
    sample_rate: f32,
    attack_time: f32, // seconds to ramp 0 → peak
    decay_time: f32,  // seconds to ramp peak → 0
    peak: f32,

    stage: EnvelopeStage,
    level: f32,
}

impl AdEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        Self::ad(sample_rate, DEFAULT_ATTACK, DEFAULT_DECAY)
    }

    pub fn ad(sample_rate: f32, attack: f32, decay: f32) -> Self {
        let mut env = Self {
            sample_rate,
            attack_time: 0.0,
            decay_time: 0.0,
            peak: DEFAULT_PEAK,
            stage: EnvelopeStage::Idle,
            level: 0.0,
        };
        env.set_attack(attack);
        env.set_decay(decay);
        env
    }

    #[inline]
    fn min_time(&self) -> f32 {
        1.0 / self.sample_rate
    }

    pub fn attack(&self) -> f32 {
        self.attack_time
    }

    pub fn decay(&self) -> f32 {
        self.decay_time
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }
}

impl EnvelopeUnit for AdEnvelope {
    fn set_attack(&mut self, seconds: f32) {
        self.attack_time = seconds.max(self.min_time());
    }

    fn set_decay(&mut self, seconds: f32) {
        self.decay_time = seconds.max(self.min_time());
    }

    fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += self.peak / (self.attack_time * self.sample_rate);
                if self.level >= self.peak {
                    self.level = self.peak;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= self.peak / (self.decay_time * self.sample_rate);
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }

    fn level(&self) -> f32 {
        self.level
    }
}
