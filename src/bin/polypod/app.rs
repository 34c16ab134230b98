//! Audio setup: build the synth, hand it to the cpal callback, run the UI

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use polypod::{
    config::SynthConfig,
    control::ControlSurface,
    synth::{Synth, SynthMessage, SynthStatus},
    MAX_BLOCK_SIZE,
};

use super::ui::{UiApp, SCOPE_LEN};

const MESSAGE_RING: usize = 256;
const STATUS_RING: usize = 8;
const SCOPE_RING_BLOCKS: usize = 8;
/// Only every Nth sample goes to the scope.
const SCOPE_DECIMATION: usize = 4;

pub fn run(config: SynthConfig) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;
    tracing::info!(sample_rate, channels, voices = config.voices, "audio device ready");

    // --- Cross-thread rings ---
    let (msg_tx, msg_rx) = RingBuffer::<SynthMessage>::new(MESSAGE_RING);
    let (mut status_tx, status_rx) = RingBuffer::<SynthStatus>::new(STATUS_RING);
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_LEN * SCOPE_RING_BLOCKS);

    let mut synth = Synth::new(&config, sample_rate, msg_rx);
    let initial_status = synth.status();
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut render_buf[..frames];
                synth.render_block(block);

                // Mono to all channels
                let out = &mut data[frames_written * channels..(frames_written + frames) * channels];
                for (frame, &s) in out.chunks_exact_mut(channels).zip(block.iter()) {
                    frame.fill(s);
                }

                for &s in block.iter().step_by(SCOPE_DECIMATION) {
                    if scope_tx.push(s).is_err() {
                        break;
                    }
                }

                frames_written += frames;
            }

            synth.publish_status(&mut status_tx);
        },
        |err| tracing::error!(%err, "audio stream error"),
        None,
    )?;

    stream.play().wrap_err("failed to start audio stream")?;

    let surface = ControlSurface::from_config(&config);
    let mut app = UiApp::new(msg_tx, status_rx, scope_rx, surface, initial_status, sample_rate);

    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();

    tracing::info!(dropped = app.dropped_messages(), "shutting down");
    res
}
