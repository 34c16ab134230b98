//! Benchmarks for note allocation under load.
//!
//! The steal path scans the whole pool, so it is measured with every voice
//! busy.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polypod::{
    dsp::Waveform,
    synth::{MixMode, SynthVoicePool},
    MAX_VOICES,
};

use crate::SAMPLE_RATE;

const STEAL_CYCLE: u8 = 40;

fn pool(capacity: usize) -> SynthVoicePool {
    SynthVoicePool::with_defaults(capacity, SAMPLE_RATE, MixMode::Velocity, Waveform::Saw, 0.005, 0.35)
}

pub fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/allocation");

    for capacity in [4, 8, MAX_VOICES] {
        group.bench_with_input(BenchmarkId::new("idle", capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let mut p = pool(capacity);
                for note in 0..capacity as u8 {
                    black_box(p.handle_note_on(40 + note, 100));
                }
            })
        });

        // Every note-on steals. The pool starts above the cycle, and the
        // cycle is longer than any pool, so the next note has always been
        // stolen away before it comes round again.
        let mut full = pool(capacity);
        for note in 0..capacity as u8 {
            full.handle_note_on(STEAL_CYCLE + note, 100);
        }
        let mut next = 0u8;
        group.bench_with_input(BenchmarkId::new("steal", capacity), &capacity, |b, _| {
            b.iter(|| {
                next = (next + 1) % STEAL_CYCLE;
                black_box(full.handle_note_on(next, 100));
            })
        });
    }

    group.finish();
}
