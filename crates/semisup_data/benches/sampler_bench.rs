use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::RgbImage;
use semisup_data::sampler::CyclicBatchSampler;
use semisup_data::transforms::train_pipeline;
use semisup_data::Pool;

/// Benchmarks for `CyclicBatchSampler::fetch_batch` throughput.
///
/// Measures the cost of one training batch (index draws + weak/strong
/// augmentation + stacking) across typical batch sizes.
const BATCH_SIZES: [usize; 3] = [16, 64, 128];

const POOL_SIZE: usize = 2_000;

fn make_pool(size: usize) -> Pool {
    let images = (0..size)
        .map(|i| RgbImage::from_pixel(32, 32, image::Rgb([(i % 256) as u8, 64, 128])))
        .collect();
    let labels = (0..size).map(|i| (i % 10) as i64).collect();
    Pool::new(images, labels).unwrap()
}

fn bench_fetch_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch_batch");
    let pool = make_pool(POOL_SIZE);

    for &batch_size in &BATCH_SIZES {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &batch_size| {
                let mut sampler = CyclicBatchSampler::new(
                    pool.clone(),
                    batch_size,
                    train_pipeline().unwrap(),
                    train_pipeline().unwrap(),
                    42,
                )
                .unwrap();
                b.iter(|| {
                    let batch = sampler.fetch_batch().unwrap();
                    black_box(batch);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fetch_batch);
criterion_main!(benches);
