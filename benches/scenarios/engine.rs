//! Full engine blocks: sweep, mix, filter, reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polypod::{
    config::SynthConfig,
    synth::{NoMessages, Synth, SynthMessage},
    MAX_VOICES,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for voices in [8, MAX_VOICES] {
        let config = SynthConfig {
            voices,
            ..SynthConfig::default()
        };

        for &size in BLOCK_SIZES {
            let mut synth = Synth::new(&config, SAMPLE_RATE, NoMessages);
            for i in 0..voices as u8 {
                synth.handle_message(SynthMessage::NoteOn {
                    note: 48 + i,
                    velocity: 100,
                });
            }
            let mut buffer = vec![0.0; size];

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        synth.render_block(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
