//! Scripted DSP units so pool behavior can be checked sample by sample.

#![allow(dead_code)]

use polypod::{
    dsp::{EnvelopeUnit, OscillatorUnit, Waveform},
    synth::{MixMode, Voice, VoicePool},
};

/// Outputs a constant 1.0.
pub struct DcOsc;

impl OscillatorUnit for DcOsc {
    fn set_frequency(&mut self, _hz: f32) {}
    fn set_waveform(&mut self, _waveform: Waveform) {}
    fn next_sample(&mut self) -> f32 {
        1.0
    }
}

/// Jumps to 1.0 on trigger, then falls by `step` every sample.
pub struct LinearFall {
    level: f32,
    step: f32,
}

impl LinearFall {
    pub fn new(step: f32) -> Self {
        Self { level: 0.0, step }
    }
}

impl EnvelopeUnit for LinearFall {
    fn set_attack(&mut self, _seconds: f32) {}
    fn set_decay(&mut self, _seconds: f32) {}
    fn trigger(&mut self) {
        self.level = 1.0;
    }
    fn next_sample(&mut self) -> f32 {
        let out = self.level;
        self.level = (self.level - self.step).max(0.0);
        out
    }
    fn level(&self) -> f32 {
        self.level
    }
}

pub type ScriptedPool = VoicePool<DcOsc, LinearFall>;

pub fn scripted_pool(capacity: usize, step: f32) -> ScriptedPool {
    VoicePool::from_fn(capacity, MixMode::Flat, |_| {
        Voice::new(DcOsc, LinearFall::new(step))
    })
}

pub fn ages(pool: &ScriptedPool) -> Vec<u32> {
    pool.iter().map(|v| v.age()).collect()
}
