use super::color_matrix::*;
use super::packed10::*;
use super::planar::{UV, V_U};
use super::*;

fn assert_close(fixed: [u8; 3], exact: [f64; 3], tolerance: f64, input: [i32; 3]) {
    for c in 0..3 {
        let diff = (fixed[c] as f64 - exact[c]).abs();
        assert!(
            diff <= tolerance,
            "input {input:?} channel {c}: fixed {} exact {:.3}",
            fixed[c],
            exact[c]
        );
    }
}

fn check_against_exact<M: ColorTransform>(
    exact: &ExactMatrix,
    ranges: [(i32, i32); 3],
    tolerance: f64,
) {
    for a in (ranges[0].0..=ranges[0].1).step_by(7) {
        for b in (ranges[1].0..=ranges[1].1).step_by(7) {
            for c in (ranges[2].0..=ranges[2].1).step_by(7) {
                let input = [a, b, c];
                let fixed = M::MATRIX.apply(input);
                let reference = exact.apply(input.map(|v| v as f64));
                assert_close(fixed, reference, tolerance, input);
            }
        }
    }
}

const FULL: [(i32, i32); 3] = [(0, 255), (0, 255), (0, 255)];
const LIMITED: [(i32, i32); 3] = [(16, 235), (16, 240), (16, 240)];

#[test]
fn fixed_point_matrices_track_float_references() {
    check_against_exact::<RgbToYuvFull7>(&RGB_TO_YUV_FULL, FULL, 4.0);
    check_against_exact::<RgbToYuvLimited7>(&RGB_TO_YUV_LIMITED, FULL, 4.0);
    check_against_exact::<YuvFullToRgb6>(&YUV_FULL_TO_RGB, FULL, 5.0);
    check_against_exact::<YuvFullToRgb10>(&YUV_FULL_TO_RGB, FULL, 2.0);
    check_against_exact::<YuvAndroidToRgb6>(&YUV_ANDROID_TO_RGB, FULL, 5.0);
    check_against_exact::<YuvLimitedToRgb6>(&YUV_LIMITED_TO_RGB, LIMITED, 5.0);
    check_against_exact::<YuvLimitedToRgb8>(&YUV_LIMITED_TO_RGB, LIMITED, 2.0);
    check_against_exact::<YuvLimitedToRgb10>(&YUV_LIMITED_TO_RGB, LIMITED, 2.0);
    check_against_exact::<YuvLimitedToRgb13>(&YUV_LIMITED_TO_RGB, LIMITED, 2.0);
}

#[test]
fn rgb_to_yuv_full_range_values() {
    let m = RgbToYuvFull7::MATRIX;
    assert_eq!(m.apply([0, 0, 0]), [0, 128, 128]);
    assert_eq!(m.apply([255, 255, 255]), [255, 128, 128]);
    assert_eq!(m.apply([255, 0, 0]), [76, 84, 255]);
    assert_eq!(m.apply([0, 255, 0]), [149, 44, 20]);
    assert_eq!(m.apply([0, 0, 255]), [30, 255, 108]);
}

#[test]
fn rgb_to_yuv_limited_range_values() {
    let m = RgbToYuvLimited7::MATRIX;
    assert_eq!(m.apply([0, 0, 0]), [16, 128, 128]);
    assert_eq!(m.apply([255, 255, 255]), [235, 128, 128]);
    assert_eq!(m.apply([255, 0, 0]), [82, 90, 240]);
    assert_eq!(m.apply([0, 255, 0]), [144, 54, 34]);
    assert_eq!(m.apply([0, 0, 255]), [42, 240, 110]);
}

/// Black, white, red, green and blue as produced by the RGB to YUV
/// transform of the matching range.
const FULL_RANGE_INPUTS: [[i32; 3]; 5] = [
    [0, 128, 128],
    [255, 128, 128],
    [76, 84, 255],
    [149, 44, 20],
    [30, 255, 108],
];
const LIMITED_RANGE_INPUTS: [[i32; 3]; 5] = [
    [16, 128, 128],
    [235, 128, 128],
    [82, 90, 240],
    [144, 54, 34],
    [42, 240, 110],
];

fn assert_literals(name: &str, matrix: FixedMatrix, inputs: [[i32; 3]; 5], expected: [[u8; 3]; 5]) {
    for (input, expected) in inputs.into_iter().zip(expected) {
        assert_eq!(matrix.apply(input), expected, "{name} {input:?}");
    }
}

#[test]
fn yuv_to_rgb_literal_vectors() {
    assert_literals(
        "full 6",
        YuvFullToRgb6::MATRIX,
        FULL_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 255, 1], [2, 1, 254]],
    );
    assert_literals(
        "full 10",
        YuvFullToRgb10::MATRIX,
        FULL_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [254, 0, 0], [0, 255, 0], [2, 1, 255]],
    );
    assert_literals(
        "android 6",
        YuvAndroidToRgb6::MATRIX,
        FULL_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [251, 2, 0], [1, 254, 3], [3, 0, 250]],
    );
    assert_literals(
        "limited 6",
        YuvLimitedToRgb6::MATRIX,
        LIMITED_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [255, 1, 1], [0, 255, 2], [2, 1, 254]],
    );
    assert_literals(
        "limited 8",
        YuvLimitedToRgb8::MATRIX,
        LIMITED_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [255, 1, 0], [0, 254, 0], [2, 1, 255]],
    );
    assert_literals(
        "limited 10",
        YuvLimitedToRgb10::MATRIX,
        LIMITED_RANGE_INPUTS,
        [[0, 0, 0], [255, 254, 255], [255, 0, 0], [0, 254, 0], [1, 1, 255]],
    );
    assert_literals(
        "limited 13",
        YuvLimitedToRgb13::MATRIX,
        LIMITED_RANGE_INPUTS,
        [[0, 0, 0], [255, 255, 255], [255, 1, 0], [0, 254, 0], [2, 1, 255]],
    );
}

#[test]
fn matrix_row_honors_channel_order() {
    let params = KernelParams::default();
    let src = [255, 0, 0, 0, 0, 255];
    let mut dst = [0u8; 6];
    // BGR24 -> YVU24
    matrix_row::<RgbToYuvFull7, 2, 1, 0, 0, 2, 1>(&src, &mut dst, 2, &params);
    assert_eq!(dst, [30, 108, 255, 76, 255, 84]);
}

// =============================================================================
// Packed 10-bit
// =============================================================================

#[test]
fn pack_unpack() {
    for values in [[0, 511, 1023, 700], [1, 2, 3, 4], [1023; 4]] {
        assert_eq!(unpack_10bit(&pack_10bit(values)), values);
    }
    assert_eq!(pack_10bit([0b11_1111_1101, 0, 0, 0b01]), [0xFF, 0, 0, 0, 0b0100_0001]);
}

#[test]
fn gamma_lut_endpoints() {
    let linear = GammaLut::new(1.0);
    assert_eq!(linear.get(0), 0);
    assert_eq!(linear.get(1023), 255);
    assert_eq!(linear.get(512), 128);

    let bright = GammaLut::new(0.5);
    assert_eq!(bright.get(0), 0);
    assert_eq!(bright.get(1023), 255);
    assert!(bright.get(256) > linear.get(256));
}

#[test]
fn gamma_segments_follow_the_table() {
    let linear = GammaSegments::new(1.0);
    let lut = GammaLut::new(1.0);
    for value in 0..1024u16 {
        assert!((linear.get(value) as i32 - lut.get(value) as i32).abs() <= 1, "{value}");
    }

    let segments = GammaSegments::new(0.45);
    let lut = GammaLut::new(0.45);
    assert_eq!(segments.get(0), 0);
    assert_eq!(segments.get(1023), 255);
    assert_eq!(segments.get(GAMMA_STEP_01), lut.get(GAMMA_STEP_01));
    assert!((segments.get(GAMMA_STEP_12) as i32 - lut.get(GAMMA_STEP_12) as i32).abs() <= 1);
    for value in 0..1023u16 {
        assert!(segments.get(value) <= segments.get(value + 1), "{value}");
    }
}

#[test]
fn y10_packed_rows() {
    let src = [pack_10bit([0, 4, 1023, 515]), pack_10bit([8, 12, 16, 20])].concat();

    let mut y8 = [0u8; 8];
    y10_packed_to_y8_row(&src, &mut y8, 8, &KernelParams::default());
    assert_eq!(y8, [0, 1, 255, 128, 2, 3, 4, 5]);

    let params = KernelParams {
        gamma_lut: Some(Box::new(GammaLut::new(1.0))),
        ..KernelParams::default()
    };
    y10_packed_to_y8_row(&src, &mut y8, 8, &params);
    assert_eq!(&y8[..4], &[0, 1, 255, 128]);

    let mut yyy = [0u8; 24];
    y10_packed_to_yyy24_row(&src, &mut yyy, 8, &params);
    assert_eq!(&yyy[..12], &[0, 0, 0, 1, 1, 1, 255, 255, 255, 128, 128, 128]);

    let mut copy = [0u8; 10];
    copy_packed_row(&src, &mut copy, 8, &params);
    assert_eq!(copy[..], src[..]);

    let mut y10 = [0u16; 8];
    y10_packed_to_y10_row(&src, bytemuck::cast_slice_mut(&mut y10), 8, &params);
    assert_eq!(y10, [0, 4, 1023, 515, 8, 12, 16, 20]);
}

/// One RGGB or BGGR quad repeated over a 4x2 mosaic.
fn mosaic(tl: u16, tr: u16, bl: u16, br: u16) -> Vec<u8> {
    [pack_10bit([tl, tr, tl, tr]), pack_10bit([bl, br, bl, br])].concat()
}

fn demosaic(
    kernel: MultiRowKernelFn,
    source: &[u8],
    flipped: bool,
    params: &KernelParams,
) -> Vec<u8> {
    let sources = [SourcePlane {
        data: source,
        stride: 5,
        row_bytes: 5,
    }];
    let mut target = vec![0u8; 24];
    let mut targets = [TargetRows {
        data: &mut target,
        stride: 12,
        row_bytes: 12,
    }];
    let group = RowGroup {
        index: 0,
        rows_per_iteration: 2,
        width: 4,
        height: 2,
        flipped,
    };
    kernel(&sources, &mut targets, &group, params);
    target
}

#[test]
fn bayer_rggb_plain() {
    let source = mosaic(800, 404, 396, 200);
    let rgb = demosaic(
        bayer_to_rgb::<true, 0, 1, 2>,
        &source,
        false,
        &KernelParams::default(),
    );
    let top = [200, 100, 50, 200, 101, 50];
    let bottom = [200, 99, 50, 200, 100, 50];
    assert_eq!(&rgb[..6], &top);
    assert_eq!(&rgb[6..12], &top);
    assert_eq!(&rgb[12..18], &bottom);
    assert_eq!(&rgb[18..], &bottom);

    let flipped = demosaic(
        bayer_to_rgb::<true, 0, 1, 2>,
        &source,
        true,
        &KernelParams::default(),
    );
    assert_eq!(&flipped[..12], &rgb[12..]);
    assert_eq!(&flipped[12..], &rgb[..12]);
}

#[test]
fn bayer_bggr_to_bgr() {
    // Blue sits top left.
    let source = mosaic(200, 400, 400, 800);
    let bgr = demosaic(
        bayer_to_rgb::<false, 2, 1, 0>,
        &source,
        false,
        &KernelParams::default(),
    );
    assert_eq!(&bgr[..3], &[50, 100, 200]);
}

#[test]
fn bayer_advanced_applies_black_level_and_white_balance() {
    let source = mosaic(800, 400, 400, 200);
    let identity = KernelParams {
        gamma_lut: Some(Box::new(GammaLut::new(1.0))),
        ..KernelParams::default()
    };
    let lut = GammaLut::new(1.0);
    let rgb = demosaic(bayer_to_rgb_advanced::<true, 0, 1, 2>, &source, false, &identity);
    assert_eq!(&rgb[..3], &[lut.get(800), lut.get(400), lut.get(200)]);

    let params = KernelParams {
        black_level: 100,
        white_balance: [256, 128, 64],
        ..identity
    };
    let rgb = demosaic(bayer_to_rgb_advanced::<true, 0, 1, 2>, &source, false, &params);
    // red: (800 - 100) * 2 saturates, blue: (200 - 100) / 2
    assert_eq!(&rgb[..3], &[255, lut.get(300), lut.get(50)]);
}

#[test]
fn planar_kernels_share_chroma() {
    // 2x2 NV12: one chroma sample for four luma samples.
    let luma = [10u8, 20, 30, 40];
    let chroma = [100u8, 200];
    let sources = [
        SourcePlane {
            data: &luma,
            stride: 2,
            row_bytes: 2,
        },
        SourcePlane {
            data: &chroma,
            stride: 2,
            row_bytes: 2,
        },
    ];
    let group = RowGroup {
        index: 0,
        rows_per_iteration: 2,
        width: 2,
        height: 2,
        flipped: false,
    };

    let mut yuv = vec![0u8; 12];
    let mut targets = [TargetRows {
        data: &mut yuv,
        stride: 6,
        row_bytes: 6,
    }];
    planar::yuv420_to_yuv444::<UV, false>(&sources, &mut targets, &group, &KernelParams::default());
    assert_eq!(yuv, vec![10, 100, 200, 20, 100, 200, 30, 100, 200, 40, 100, 200]);

    let (mut y, mut v, mut u) = (vec![0u8; 4], vec![0u8; 1], vec![0u8; 1]);
    let mut targets = [
        TargetRows {
            data: &mut y,
            stride: 2,
            row_bytes: 2,
        },
        TargetRows {
            data: &mut v,
            stride: 1,
            row_bytes: 1,
        },
        TargetRows {
            data: &mut u,
            stride: 1,
            row_bytes: 1,
        },
    ];
    planar::repack_yuv420::<UV, V_U>(&sources, &mut targets, &group, &KernelParams::default());
    assert_eq!((y, v, u), (luma.to_vec(), vec![200], vec![100]));
}
