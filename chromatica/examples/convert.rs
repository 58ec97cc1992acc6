//! Walks a synthetic frame through a few conversions.
//!
//! Run with: cargo run -p chromatica --example convert [dispatch.yaml]

use anyhow::Context;
use chromatica::prelude::*;
use common::log_setup::{setup_logging, LogSettings};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn gradient_rgb() -> anyhow::Result<Frame<'static>> {
    let frame_type = FrameType::new(WIDTH, HEIGHT, PixelFormat::RGB24, PixelOrigin::UpperLeft)?;
    let mut bytes = Vec::with_capacity((WIDTH * HEIGHT * 3) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            bytes.extend_from_slice(&[
                (x * 255 / WIDTH) as u8,
                (y * 255 / HEIGHT) as u8,
                ((x + y) % 256) as u8,
            ]);
        }
    }
    Ok(Frame::from_planes(frame_type, vec![bytes], &[0])?)
}

fn print_frame_info(name: &str, frame: &Frame<'_>) {
    println!(
        "{}: {}x{} {} {} planes, {}",
        name,
        frame.width(),
        frame.height(),
        frame.format(),
        frame.planes().len(),
        if frame.is_owned() { "owned" } else { "borrowed" }
    );
}

fn main() -> anyhow::Result<()> {
    setup_logging(&LogSettings::default()).context("failed to set up logging")?;

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let yaml = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {path}"))?;
            DispatchConfig::from_yaml_str(&yaml)?
        }
        None => DispatchConfig::default(),
    };

    let threads = std::thread::available_parallelism().map_or(4, |n| n.get());
    let converter = FrameConverter::with_worker(Worker::with_threads(threads)?).with_config(config)?;

    let mut rgb = gradient_rgb()?;
    rgb.set_timestamp(Timestamp::new(0.040));
    print_frame_info("Input", &rgb);

    let options = Options::default();
    let same = converter.convert(&rgb, PixelFormat::RGB24, PixelOrigin::UpperLeft, false, &options)?;
    print_frame_info("Identity", &same);

    let nv12 = converter.convert(&rgb, PixelFormat::Y_UV12, PixelOrigin::UpperLeft, false, &options)?;
    print_frame_info("NV12", &nv12);

    let approximate = Options::default().with_approximation(true);
    let back = converter.convert(&nv12, PixelFormat::BGRA32, PixelOrigin::LowerLeft, false, &approximate)?;
    print_frame_info("BGRA (bottom-up)", &back);

    let mirrored = converter.convert_with_flag(
        &rgb,
        PixelFormat::RGB24,
        PixelOrigin::UpperLeft,
        ConversionFlag::Mirrored,
        false,
        &options,
    )?;
    print_frame_info("Mirrored", &mirrored);

    let raw_type = FrameType::new(WIDTH, HEIGHT, PixelFormat::RGGB10_PACKED, PixelOrigin::UpperLeft)?;
    let raw = Frame::new(raw_type);
    let sensor = Options::black_level_white_balance_gamma(64, [1.9, 1.0, 1.6], 0.45);
    let developed = converter.convert(&raw, PixelFormat::RGB24, PixelOrigin::UpperLeft, false, &sensor)?;
    print_frame_info("Developed raw", &developed);

    let mut frame = rgb.clone();
    converter.change(&mut frame, PixelFormat::Y8, PixelOrigin::UpperLeft, false, &options)?;
    print_frame_info("Changed in place", &frame);
    println!("timestamp carried: {:?}", frame.timestamp().seconds());

    println!("registry holds {} conversions", registry().len());
    Ok(())
}
