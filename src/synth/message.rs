#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use crate::{control::surface::ParamChange, dsp::Waveform};

/// Everything the control side can ask of the audio side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
    Param(ParamChange),
    Waveform(Waveform),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

/// Control-side half of the message queue.
pub trait MessageSender {
    /// Queue a message. Returns `false` if it had to be dropped.
    fn send(&mut self, msg: SynthMessage) -> bool;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl MessageSender for Producer<SynthMessage> {
    fn send(&mut self, msg: SynthMessage) -> bool {
        match self.push(msg) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(?msg, "synth message queue full, dropping");
                false
            }
        }
    }
}

/// A receiver that never yields anything, for driving a synth directly.
pub struct NoMessages;

impl MessageReceiver for NoMessages {
    fn pop(&mut self) -> Option<SynthMessage> {
        None
    }
}
