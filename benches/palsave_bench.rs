use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use palsave::{SavFile, SavWriter};

fn payload() -> Vec<u8> {
    (0..1_000_000u32)
        .map(|x| (x % 251) as u8 ^ (x >> 12) as u8)
        .collect()
}

pub fn read_benchmark(c: &mut Criterion) {
    let data = payload();
    let mut container = Vec::new();
    SavWriter::new().encode(&data, &mut container).unwrap();

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("from_slice", |b| {
        b.iter(|| SavFile::from_slice(&container).unwrap());
    });
    group.finish();
}

pub fn write_benchmark(c: &mut Criterion) {
    let data = payload();
    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for level in [1, 6, 9] {
        group.bench_function(format!("level-{}", level), |b| {
            let writer = SavWriter::new().compression_level(level);
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len());
                writer.encode(&data, &mut out).unwrap();
                out
            });
        });
    }
    group.finish();
}

criterion_group!(benches, read_benchmark, write_benchmark);
criterion_main!(benches);
