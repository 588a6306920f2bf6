use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voicegate_voiceprint::{
    compute_fbank, cosine_similarity, AudioBuffer, FbankConfig, SpectralModel, VoiceprintModel,
};

fn make_tone(freq_hz: f64, n_samples: usize) -> Vec<f32> {
    (0..n_samples)
        .map(|i| {
            let t = i as f64 / 16_000.0;
            (freq_hz * 2.0 * std::f64::consts::PI * t).sin() as f32 * 0.5
        })
        .collect()
}

fn bench_fbank_1s(c: &mut Criterion) {
    let cfg = FbankConfig::default();
    let samples = make_tone(440.0, 16_000);

    c.bench_function("fbank_1s", |b| {
        b.iter(|| {
            let _ = black_box(compute_fbank(black_box(&samples), &cfg));
        });
    });
}

fn bench_spectral_embed_4s(c: &mut Criterion) {
    let model = SpectralModel::new();
    let audio = AudioBuffer::from_samples(make_tone(440.0, 64_000));

    c.bench_function("spectral_embed_4s", |b| {
        b.iter(|| {
            let _ = black_box(model.embed(black_box(&audio)));
        });
    });
}

fn bench_cosine_80(c: &mut Criterion) {
    let a: Vec<f32> = (0..80).map(|i| (i as f32 * 0.37).sin()).collect();
    let b_vec: Vec<f32> = (0..80).map(|i| (i as f32 * 0.11).cos()).collect();

    c.bench_function("cosine_80", |b| {
        b.iter(|| black_box(cosine_similarity(black_box(&a), black_box(&b_vec))));
    });
}

criterion_group!(benches, bench_fbank_1s, bench_spectral_embed_4s, bench_cosine_80);
criterion_main!(benches);
