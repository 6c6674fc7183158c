use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relir_codec::{value_input, value_output, Entry, ReadCursor, ValueWriter, WriteCursor};

fn sample_rows() -> Vec<u8> {
    let mut writer = ValueWriter::new(Vec::new());
    for i in 0..1_000i64 {
        writer.write_row_begin(3).unwrap();
        writer.write_int(i * 7919).unwrap();
        writer.write_character("relational").unwrap();
        writer.write_float8(i as f64 / 3.0).unwrap();
    }
    writer.write_end_of_contents().unwrap();
    writer.into_inner()
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode ints into cursor", |b| {
        let mut buf = vec![0u8; 16 * 1_000];
        b.iter(|| {
            let mut output = WriteCursor::new(&mut buf);
            for i in 0..1_000i64 {
                value_output::write_int(&mut output, black_box(i * 7919 - 500_000));
            }
            output.position()
        });
    });

    c.bench_function("encode rows through writer", |b| {
        b.iter(sample_rows);
    });
}

fn bench_decode(c: &mut Criterion) {
    let encoded = sample_rows();

    c.bench_function("decode rows with read_entry", |b| {
        b.iter(|| {
            let mut input = ReadCursor::new(black_box(&encoded));
            let mut count = 0usize;
            while let Ok(entry) = value_input::read_entry(&mut input) {
                if entry == Entry::EndOfContents {
                    break;
                }
                count += 1;
            }
            count
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
