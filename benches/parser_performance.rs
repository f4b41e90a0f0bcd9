use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use bme280_logger::logger;
use bme280_logger::recorder::Sample;
use bme280_logger::sensor::{decode_line, LineBuffer, Reading, SensorState};

fn benchmark_line_parsing(c: &mut Criterion) {
    let _ = logger::init_logger();

    let mut group = c.benchmark_group("line_parsing");

    let inputs: [(&str, &[u8]); 3] = [
        ("well_formed", b"$21.53,40.12,101325.00#\r\n"),
        ("malformed", b"$21.53,40.12\r\n"),
        ("non_ascii", b"$21.53,40.12,\xff101325#\r\n"),
    ];

    for (name, line) in inputs {
        group.bench_with_input(BenchmarkId::new("decode_line", name), &line, |b, line| {
            b.iter(|| black_box(decode_line(black_box(line))))
        });
    }

    group.finish();
}

fn benchmark_stream_framing(c: &mut Criterion) {
    let _ = logger::init_logger();

    // One second of traffic at 9600 baud is roughly 960 bytes
    let stream: Vec<u8> = b"$21.53,40.12,101325.00#\r\n".repeat(40);

    c.bench_function("frame_and_apply_stream", |b| {
        b.iter(|| {
            let mut buffer = LineBuffer::new();
            let mut state = SensorState::new();
            for chunk in stream.chunks(32) {
                buffer.extend(chunk);
                while let Some(line) = buffer.next_line() {
                    state.apply_line(&line);
                }
            }
            black_box(state.publishable())
        })
    });
}

fn benchmark_csv_record(c: &mut Criterion) {
    let sample = Sample::now(Reading::new(21.53, 40.12, 101325.0));

    c.bench_function("sample_to_record", |b| {
        b.iter(|| black_box(sample.to_record()))
    });
}

criterion_group!(benches, benchmark_line_parsing, benchmark_stream_framing, benchmark_csv_record);
criterion_main!(benches);
