pub mod config;
pub mod control; // Knob catch-up and mode dispatch
pub mod dsp;
pub mod error;
pub mod io;
pub mod synth; // Voice allocation and the audio-thread engine

/// Upper bound on the voice pool size.
pub const MAX_VOICES: usize = 16;

pub const MAX_BLOCK_SIZE: usize = 2048;
