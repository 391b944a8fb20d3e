use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spray_card_core::{analyze, otsu_threshold, AnalysisParams, RasterImage};

fn synthetic_card(width: usize, height: usize) -> RasterImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let droplet = (x * 7919 + y * 104_729) % 97 < 23;
            let base: u8 = if droplet { 35 } else { 210 };
            let jitter = ((x ^ y) % 13) as u8;
            data.extend_from_slice(&[base + jitter, base.saturating_sub(jitter), base]);
        }
    }
    RasterImage {
        width,
        height,
        channels: 3,
        data,
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let card = synthetic_card(2048, 512);
    let params = AnalysisParams::with_sections(15);

    c.bench_function("analyze_2048x512_rgb", |b| {
        b.iter(|| analyze(black_box(&card.as_view()), black_box(&params)).expect("analyze"))
    });

    let gray = spray_card_core::to_grayscale(&card.as_view(), params.luma).expect("gray");
    c.bench_function("otsu_2048x512", |b| {
        b.iter(|| otsu_threshold(black_box(&gray.as_view())).expect("otsu"))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
