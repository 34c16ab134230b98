//! Benchmarks for the oscillator waveforms.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polypod::dsp::{Oscillator, OscillatorUnit, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        for waveform in Waveform::ALL {
            let mut osc = Oscillator::new(SAMPLE_RATE, waveform);
            osc.set_frequency(440.0);
            let mut buffer = vec![0.0; size];

            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample();
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
