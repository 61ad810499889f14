use brainweb_core::noise::noise;
use brainweb_core::synth::{paint_native, to_pet_mmr, ModalityVolumes, SynthesisOptions};
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

/// Concentric shells of skin, skull, csf, grey and white matter.
fn shell_phantom(n: usize) -> Array3<u16> {
    let c = n as f64 / 2.0;
    Array3::from_shape_fn((n, n, n), |(k, j, i)| {
        let r = ((k as f64 - c).powi(2) + (j as f64 - c).powi(2) + (i as f64 - c).powi(2)).sqrt() / c;
        let label: u16 = match r {
            r if r < 0.4 => 3,
            r if r < 0.6 => 2,
            r if r < 0.7 => 1,
            r if r < 0.8 => 7,
            r if r < 0.9 => 6,
            _ => 0,
        };
        label << 4
    })
}

fn bench_paint_native(c: &mut Criterion) {
    let labels = shell_phantom(96);
    c.bench_function("paint_native_96cubed", |b| {
        b.iter(|| black_box(paint_native(&labels).unwrap()))
    });
}

fn bench_to_pet_mmr(c: &mut Criterion) {
    let labels = shell_phantom(128);
    let options = SynthesisOptions::default();

    let mut group = c.benchmark_group("to_pet_mmr_128cubed");
    group.sample_size(10);
    group.bench_function("padded_f32", |b| {
        b.iter(|| {
            let out: ModalityVolumes<f32> = to_pet_mmr(&labels, &options).unwrap();
            black_box(out.pet[[63, 172, 172]]);
        })
    });
    group.finish();
}

fn bench_noise(c: &mut Criterion) {
    let vol = Array3::from_elem((64, 64, 64), 1.0_f32);
    c.bench_function("noise_64cubed", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            black_box(noise(&vol, 0.1, 1.0, false, &mut rng).unwrap())
        })
    });
}

criterion_group!(benches, bench_paint_native, bench_to_pet_mmr, bench_noise);
criterion_main!(benches);
