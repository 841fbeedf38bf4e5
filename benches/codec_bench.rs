use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fca::classify;
use fca::io_stream::{FcaReader, FcaWriter};
use std::io::Cursor;

fn figure_dump() -> Vec<u8> {
    let mut v = vec![0u8; 540];
    v[0x0C..0x10].copy_from_slice(&[0xF1, 0x10, 0xFF, 0xEE]);
    v[0x58..0x5C].copy_from_slice(&[0x03, 0x4C, 0x09, 0x02]);
    v
}

fn bench_classify(c: &mut Criterion) {
    let fig = figure_dump();
    let blob = vec![7u8; 2048];

    c.bench_function("classify_figure_v2", |b| b.iter(|| classify(black_box(&fig))));
    c.bench_function("classify_unknown_2k", |b| b.iter(|| classify(black_box(&blob))));
}

fn bench_encode_decode(c: &mut Criterion) {
    let fig = figure_dump();

    c.bench_function("encode_1000_figures", |b| {
        b.iter(|| {
            let mut writer = FcaWriter::new(Vec::new()).unwrap();
            for _ in 0..1000 {
                writer.add_file(black_box(&fig)).unwrap();
            }
            writer.finish().unwrap()
        })
    });

    let mut writer = FcaWriter::new(Vec::new()).unwrap();
    for _ in 0..1000 {
        writer.add_file(&fig).unwrap();
    }
    let archive = writer.finish().unwrap();

    c.bench_function("read_1000_records", |b| {
        b.iter(|| {
            let reader = FcaReader::new(Cursor::new(black_box(&archive[..]))).unwrap();
            reader.map(|r| r.unwrap().content.len()).sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_classify, bench_encode_decode);
criterion_main!(benches);
