use criterion::{black_box, criterion_group, criterion_main, Criterion};

use strfinder_rust::align::{map_read, smith_waterman};
use strfinder_rust::index::KmerIndex;
use strfinder_rust::repeat;
use strfinder_rust::variant::VariationTable;

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn bench_index_build(c: &mut Criterion) {
    let reference = make_reference(10_000);

    c.bench_function("kmer_index_build_10k", |b| {
        b.iter(|| {
            black_box(KmerIndex::build(black_box(&reference)));
        })
    });
}

fn bench_map_read(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let index = KmerIndex::build(&reference);
    let mut read = reference[500..550].to_vec();
    read[20] = if read[20] == b'A' { b'C' } else { b'A' };

    c.bench_function("map_read_50bp", |b| {
        b.iter(|| {
            let mut variations = VariationTable::new();
            black_box(map_read(
                black_box(&read),
                black_box(&index),
                black_box(&reference),
                &mut variations,
            ));
        })
    });
}

fn bench_smith_waterman(c: &mut Criterion) {
    let window = make_reference(400);
    let mut read = window[180..230].to_vec();
    // 制造一个双碱基插入
    read.insert(25, b'G');
    read.insert(26, b'G');

    c.bench_function("smith_waterman_400x52", |b| {
        b.iter(|| {
            black_box(smith_waterman(black_box(&window), black_box(&read)));
        })
    });
}

fn bench_tandem_scan(c: &mut Criterion) {
    let mut seq = make_reference(2_000);
    seq.extend_from_slice(&b"ACG".repeat(12));
    seq.extend_from_slice(&make_reference(500));

    c.bench_function("tandem_repeat_scan_2k5", |b| {
        b.iter(|| {
            black_box(repeat::find_tandem_repeats(black_box(&seq)));
        })
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_map_read,
    bench_smith_waterman,
    bench_tandem_scan
);
criterion_main!(benches);
