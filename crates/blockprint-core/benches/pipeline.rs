//! Benchmarks for the Blockprint fingerprinting pipeline.
//!
//! Run with: cargo bench -p blockprint-core

use blockprint_core::pipeline::{
    BlockHasher, DecodedImage, ImageDecoder, MimeSniffer, PerceptualHasher, PngDecoder,
    SignatureSniffer,
};
use blockprint_core::{Config, FingerprintPipeline, HashMethod, HashRequest, ImageSource};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn benchmark_sniff(c: &mut Criterion) {
    let bytes = png_fixture(64, 64);
    c.bench_function("sniff_signature", |b| {
        b.iter(|| SignatureSniffer.sniff(black_box(&bytes)))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = png_fixture(1024, 768);
    c.bench_function("decode_png", |b| {
        b.iter(|| PngDecoder.decode(black_box(&bytes)))
    });
}

fn benchmark_block_hash(c: &mut Criterion) {
    let even = DecodedImage::new(DynamicImage::new_rgb8(1024, 768));
    let odd = DecodedImage::new(DynamicImage::new_rgb8(1023, 767));

    c.bench_function("block_hash_quick", |b| {
        b.iter(|| BlockHasher.hash(black_box(&odd), 16, 1))
    });
    c.bench_function("block_hash_precise", |b| {
        b.iter(|| BlockHasher.hash(black_box(&odd), 16, 2))
    });
    c.bench_function("block_hash_even_frame", |b| {
        b.iter(|| BlockHasher.hash(black_box(&even), 16, 2))
    });
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let bytes = png_fixture(1024, 768);
    let pipeline = FingerprintPipeline::new(&Config::default()).unwrap();
    let request = HashRequest::new(16, HashMethod::Precise);
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("pipeline_named_buffer", |b| {
        b.iter(|| {
            let source = ImageSource::named_buffer(bytes.clone(), "bench.png");
            rt.block_on(pipeline.compute_image_hash(Some(source), request))
        })
    });
}

criterion_group!(
    benches,
    benchmark_sniff,
    benchmark_decode,
    benchmark_block_hash,
    benchmark_full_pipeline
);
criterion_main!(benches);
