//! Benchmarks for the AD envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polypod::dsp::{AdEnvelope, EnvelopeUnit};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut env = AdEnvelope::new(SAMPLE_RATE);
        let mut buffer = vec![0.0; size];

        group.bench_with_input(BenchmarkId::new("ad", size), &size, |b, _| {
            b.iter(|| {
                env.trigger();
                for sample in buffer.iter_mut() {
                    *sample = env.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
