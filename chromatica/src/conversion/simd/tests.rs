//! SIMD kernels against their scalar counterparts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::simd_row_kernel;
use crate::common::PixelFormat;
use crate::conversion::kernels::channels::{rgb24_to_rgba32_row, rgba32_to_rgb24_row};
use crate::conversion::kernels::packed10::y10_packed_to_y10_row;
use crate::conversion::kernels::{KernelParams, RowKernelFn};

/// Widths around the 4 pixel step and the 16 byte store.
const TEST_WIDTHS: [usize; 12] = [1, 4, 5, 6, 7, 15, 16, 17, 31, 32, 100, 256];

fn random_row(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random()).collect()
}

fn compare(
    simd: RowKernelFn,
    scalar: RowKernelFn,
    src_bytes: impl Fn(usize) -> usize,
    dst_bytes: impl Fn(usize) -> usize,
    widths: &[usize],
    params: &KernelParams,
) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for &width in widths {
        let src = random_row(&mut rng, src_bytes(width));
        // u16 backing keeps 16-bit targets aligned
        let mut expected = vec![0u16; dst_bytes(width).div_ceil(2)];
        let mut actual = vec![0u16; dst_bytes(width).div_ceil(2)];
        scalar(&src, bytemuck::cast_slice_mut(&mut expected), width, params);
        simd(&src, bytemuck::cast_slice_mut(&mut actual), width, params);
        assert_eq!(actual, expected, "width {width}");
    }
}

#[test]
fn rgba_to_rgb_matches_scalar() {
    let Some((_, simd)) = simd_row_kernel(PixelFormat::RGBA32, PixelFormat::RGB24) else {
        return; // no SIMD path on this CPU
    };
    compare(
        simd,
        rgba32_to_rgb24_row,
        |w| w * 4,
        |w| w * 3,
        &TEST_WIDTHS,
        &KernelParams::default(),
    );
}

#[test]
fn rgb_to_rgba_matches_scalar() {
    let Some((_, simd)) = simd_row_kernel(PixelFormat::RGB24, PixelFormat::RGBA32) else {
        return;
    };
    for alpha in [0x00, 0x7F, 0xFF] {
        let params = KernelParams {
            alpha,
            ..KernelParams::default()
        };
        compare(
            simd,
            rgb24_to_rgba32_row,
            |w| w * 3,
            |w| w * 4,
            &TEST_WIDTHS,
            &params,
        );
    }
}

#[test]
fn unpack_matches_scalar() {
    let Some((_, simd)) = simd_row_kernel(PixelFormat::Y10_PACKED, PixelFormat::Y10) else {
        return;
    };
    let widths = TEST_WIDTHS.map(|w| w * 4);
    compare(
        simd,
        y10_packed_to_y10_row,
        |w| w / 4 * 5,
        |w| w * 2,
        &widths,
        &KernelParams::default(),
    );
}

#[test]
fn kernels_exist_where_expected() {
    #[cfg(target_arch = "aarch64")]
    assert!(simd_row_kernel(PixelFormat::RGB24, PixelFormat::RGBA32).is_some());

    assert!(simd_row_kernel(PixelFormat::RGB24, PixelFormat::BGR24).is_none());
}
