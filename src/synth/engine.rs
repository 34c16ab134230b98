#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{
    config::SynthConfig,
    control::surface::{Param, ParamChange},
    dsp::{SVFilter, SchroederReverb, Waveform},
    synth::{
        message::{MessageReceiver, SynthMessage},
        pool::SynthVoicePool,
        voice::VoiceState,
    },
    MAX_VOICES,
};

/*
Synth Engine
============

Owned by the audio thread. Nothing here locks or allocates after `new`.

    control thread                      audio thread
    ──────────────                      ────────────
    SynthMessage ──→ [rtrb queue] ──→  render_block:
                                          1. drain every queued message
                                          2. per sample:
                                               pool sweep + mix
                                               → lowpass filter
                                               → reverb
                                               → master volume
    UI           ←── [rtrb queue] ←──  publish_status (Copy snapshot)

Messages are only applied at block boundaries, so a block renders with one
consistent set of parameters.
*/

/// Display state of one voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceStatus {
    pub state: VoiceState,
    pub note: Option<u8>,
    pub age: u32,
    pub level: f32,
}

impl VoiceStatus {
    pub const IDLE: VoiceStatus = VoiceStatus {
        state: VoiceState::Idle,
        note: None,
        age: 0,
        level: 0.0,
    };
}

/// Snapshot published from the audio thread for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthStatus {
    voices: [VoiceStatus; MAX_VOICES],
    voice_count: usize,
    pub active: usize,
    pub frames: u64,
    pub waveform: Waveform,
    pub volume: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub reverb_feedback: f32,
    pub reverb_mix: f32,
    pub attack: f32,
    pub decay: f32,
    /// Snapshots that could not be published because the queue was full.
    pub dropped_status: u32,
}

impl SynthStatus {
    pub fn voices(&self) -> &[VoiceStatus] {
        &self.voices[..self.voice_count]
    }
}

pub struct Synth<R> {
    pool: SynthVoicePool,
    filter: SVFilter,
    reverb: SchroederReverb,
    volume: f32,
    waveform: Waveform,
    attack: f32,
    decay: f32,
    rx: R,
    frame_counter: u64,
    dropped_status: u32,
}

impl<R: MessageReceiver> Synth<R> {
    /// Build the voice pool and effect chain described by `config`.
    ///
    /// `sample_rate` comes from the audio device and takes precedence over
    /// `config.sample_rate`.
    pub fn new(config: &SynthConfig, sample_rate: f32, rx: R) -> Self {
        let pool = SynthVoicePool::with_defaults(
            config.voices,
            sample_rate,
            config.mix_mode,
            config.waveform,
            config.envelope.attack,
            config.envelope.decay,
        );

        let mut filter = SVFilter::lowpass(sample_rate, config.filter.cutoff);
        filter.set_resonance(config.filter.resonance);

        let mut reverb = SchroederReverb::new(sample_rate);
        reverb.set_feedback(config.reverb.feedback);
        reverb.set_mix(config.reverb.mix);
        reverb.set_damping(config.reverb.damping);

        Self {
            pool,
            filter,
            reverb,
            volume: config.master.volume.clamp(0.0, 1.0),
            waveform: config.waveform,
            attack: config.envelope.attack,
            decay: config.envelope.decay,
            rx,
            frame_counter: 0,
            dropped_status: 0,
        }
    }

    /// Drain pending messages, then render `out.len()` samples into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain_messages();

        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }

        self.frame_counter += out.len() as u64;
    }

    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            self.handle_message(msg);
        }
    }

    pub fn handle_message(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity } => {
                self.pool.handle_note_on(note, velocity);
            }
            SynthMessage::NoteOff { note } => self.pool.handle_note_off(note),
            SynthMessage::AllNotesOff => self.pool.release_all(),
            SynthMessage::Param(change) => self.apply(change),
            SynthMessage::Waveform(waveform) => {
                self.waveform = waveform;
                self.pool.set_waveform(waveform);
            }
        }
    }

    pub fn apply(&mut self, change: ParamChange) {
        let ParamChange { param, value } = change;
        match param {
            Param::Volume => self.volume = value.clamp(0.0, 1.0),
            Param::Cutoff => self.filter.set_cutoff(value),
            Param::Resonance => self.filter.set_resonance(value),
            Param::Attack => {
                self.attack = value;
                self.pool.set_attack(value);
            }
            Param::Decay => {
                self.decay = value;
                self.pool.set_decay(value);
            }
            Param::ReverbFeedback => self.reverb.set_feedback(value),
            Param::ReverbMix => self.reverb.set_mix(value),
        }
    }

    /// One output sample. Does not look at the message queue.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let dry = self.pool.next_sample();
        let filtered = self.filter.process(dry);
        self.reverb.process(filtered) * self.volume
    }

    pub fn pool(&self) -> &SynthVoicePool {
        &self.pool
    }

    pub fn status(&self) -> SynthStatus {
        let mut voices = [VoiceStatus::IDLE; MAX_VOICES];
        for (slot, voice) in voices.iter_mut().zip(self.pool.iter()) {
            *slot = VoiceStatus {
                state: voice.state(),
                note: voice.note(),
                age: voice.age(),
                level: voice.envelope_level(),
            };
        }

        SynthStatus {
            voices,
            voice_count: self.pool.capacity(),
            active: self.pool.active_count(),
            frames: self.frame_counter,
            waveform: self.waveform,
            volume: self.volume,
            cutoff: self.filter.cutoff(),
            resonance: self.filter.resonance(),
            reverb_feedback: self.reverb.feedback(),
            reverb_mix: self.reverb.mix(),
            attack: self.attack,
            decay: self.decay,
            dropped_status: self.dropped_status,
        }
    }

    /// Push a status snapshot without blocking. A full queue drops it and
    /// bumps the drop counter carried by later snapshots.
    #[cfg(feature = "rtrb")]
    pub fn publish_status(&mut self, tx: &mut Producer<SynthStatus>) -> bool {
        if tx.push(self.status()).is_ok() {
            true
        } else {
            self.dropped_status = self.dropped_status.saturating_add(1);
            false
        }
    }
}


#[cfg(all(test, feature = "rtrb"))]
mod queue_tests {
    use super::*;
    use crate::synth::message::MessageSender;
    use rtrb::RingBuffer;

    #[test]
    fn messages_apply_at_block_start() {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(16);
        let mut synth = Synth::new(&SynthConfig::default(), 48_000.0, rx);

        tx.send(SynthMessage::NoteOn {
            note: 60,
            velocity: 100,
        });
        tx.send(SynthMessage::NoteOn {
            note: 64,
            velocity: 100,
        });
        assert_eq!(synth.status().active, 0);

        let mut out = [0.0; 64];
        synth.render_block(&mut out);
        assert_eq!(synth.status().active, 2);
    }

    #[test]
    fn full_status_queue_counts_drops() {
        let (_tx, rx) = RingBuffer::<SynthMessage>::new(1);
        let (mut status_tx, mut status_rx) = RingBuffer::<SynthStatus>::new(1);
        let mut synth = Synth::new(&SynthConfig::default(), 48_000.0, rx);

        assert!(synth.publish_status(&mut status_tx));
        assert!(!synth.publish_status(&mut status_tx));

        assert_eq!(status_rx.pop().map(|s| s.dropped_status), Ok(0));
        assert!(synth.publish_status(&mut status_tx));
        assert_eq!(status_rx.pop().map(|s| s.dropped_status), Ok(1));
    }
}
