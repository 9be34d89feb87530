//! Criterion benchmarks for the RLE calldata codec.
//!
//! Run with:
//!   cargo bench --bench cd

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn synthetic_calldata(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size * 3 / 4];
    let mut x: u32 = 0x9E37_79B9;
    for _ in 0..(size - data.len()) {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
        data.push((x >> 16) as u8);
    }
    data
}

fn bench_cd_compress_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("cd_compress_decompress");

    for &size in &[256usize, 4096, 65_536] {
        let data = synthetic_calldata(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| calldata_compress::cd::compress_bytes(data))
        });

        let compressed = calldata_compress::cd::compress_bytes(&data);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("decompress", size),
            &compressed,
            |b, compressed| b.iter(|| calldata_compress::cd::decompress_bytes(compressed).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cd_compress_decompress);
criterion_main!(benches);
