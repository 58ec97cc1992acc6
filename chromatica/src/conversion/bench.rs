//! Benchmark module for frame conversions.
//! Run with: cargo bench -p chromatica --features bench --bench conversion -- "<pattern>"
//!
//! Examples:
//!   cargo bench -p chromatica --features bench --bench conversion -- "shuffle"
//!   cargo bench -p chromatica --features bench --bench conversion -- "yuv420"
//!   cargo bench -p chromatica --features bench --bench conversion -- "packed"

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use crate::common::PixelFormat;
use crate::conversion::{ConversionFlag, FrameConverter, Options, Worker};
use crate::frame::{Frame, FrameType, PixelOrigin};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

/// Full HD frame with a deterministic byte pattern.
fn create_test_frame(format: PixelFormat) -> Frame<'static> {
    let frame_type = FrameType::new(WIDTH, HEIGHT, format, PixelOrigin::UpperLeft)
        .expect("bench dimensions fit every format");
    let mut frame = Frame::new(frame_type);
    for plane in 0..frame.planes().len() {
        if let Some(bytes) = frame.plane_bytes_mut(plane) {
            for (i, byte) in bytes.iter_mut().enumerate() {
                *byte = (i % 251) as u8;
            }
        }
    }
    frame
}

fn converters() -> [(&'static str, FrameConverter); 2] {
    let threads = std::thread::available_parallelism().map_or(4, |n| n.get());
    let worker = Worker::with_threads(threads).expect("failed to build bench worker");
    [
        ("serial", FrameConverter::new()),
        ("parallel", FrameConverter::with_worker(worker)),
    ]
}

/// Serial vs parallel conversion of one pair.
fn bench(
    group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>,
    name: &str,
    from: PixelFormat,
    to: PixelFormat,
    flag: ConversionFlag,
    options: &Options,
) {
    let source = create_test_frame(from);
    let target_type = source
        .frame_type()
        .with_format(to)
        .expect("bench dimensions fit every format");
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

    for (mode, converter) in converters() {
        let mut target = Frame::new(target_type);
        group.bench_function(BenchmarkId::new(name, mode), |b| {
            b.iter(|| {
                converter
                    .convert_and_copy_with_flag(black_box(&source), &mut target, flag, options)
                    .expect("bench conversion is supported");
                black_box(&target);
            })
        });
    }
}

pub fn benchmarks(c: &mut Criterion) {
    benchmark_shuffle(c);
    benchmark_yuv420(c);
    benchmark_packed(c);
}

fn benchmark_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");
    let options = Options::default();
    bench(&mut group, "rgb24_to_bgr24", PixelFormat::RGB24, PixelFormat::BGR24, ConversionFlag::Normal, &options);
    bench(&mut group, "rgb24_to_rgba32", PixelFormat::RGB24, PixelFormat::RGBA32, ConversionFlag::Normal, &options);
    bench(&mut group, "rgba32_to_rgb24", PixelFormat::RGBA32, PixelFormat::RGB24, ConversionFlag::Normal, &options);
    bench(&mut group, "rgb24_mirrored", PixelFormat::RGB24, PixelFormat::RGB24, ConversionFlag::Mirrored, &options);
    group.finish();
}

fn benchmark_yuv420(c: &mut Criterion) {
    let mut group = c.benchmark_group("yuv420");
    let precise = Options::default();
    let approximate = Options::default().with_approximation(true);
    bench(&mut group, "nv12_to_rgb24_precise", PixelFormat::Y_UV12, PixelFormat::RGB24, ConversionFlag::Normal, &precise);
    bench(&mut group, "nv12_to_rgb24_approximate", PixelFormat::Y_UV12, PixelFormat::RGB24, ConversionFlag::Normal, &approximate);
    bench(&mut group, "i420_to_bgra32", PixelFormat::Y_U_V12, PixelFormat::BGRA32, ConversionFlag::Normal, &precise);
    bench(&mut group, "rgb24_to_nv12", PixelFormat::RGB24, PixelFormat::Y_UV12, ConversionFlag::Normal, &precise);
    group.finish();
}

fn benchmark_packed(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed");
    let options = Options::default();
    let raw = Options::black_level_white_balance_gamma(64, [1.8, 1.0, 1.5], 0.45);
    bench(&mut group, "y10_packed_to_y10", PixelFormat::Y10_PACKED, PixelFormat::Y10, ConversionFlag::Normal, &options);
    bench(&mut group, "y10_packed_to_y8_gamma", PixelFormat::Y10_PACKED, PixelFormat::Y8, ConversionFlag::Normal, &Options::gamma_correction(0.45));
    bench(&mut group, "rggb10_to_rgb24", PixelFormat::RGGB10_PACKED, PixelFormat::RGB24, ConversionFlag::Normal, &options);
    bench(&mut group, "rggb10_to_rgb24_advanced", PixelFormat::RGGB10_PACKED, PixelFormat::RGB24, ConversionFlag::Normal, &raw);
    group.finish();
}
