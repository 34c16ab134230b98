// Purpose - voice allocation, the per-sample sweep, and the audio-thread engine

pub mod engine;
pub mod message;
pub mod pool;
pub mod voice;

pub use engine::{Synth, SynthStatus, VoiceStatus};
pub use message::{MessageReceiver, MessageSender, NoMessages, SynthMessage};
pub use pool::{Allocation, MixMode, SynthVoicePool, VoicePool};
pub use voice::{Voice, VoiceState, SILENCE_THRESHOLD};
