// SIMD row kernels
//
// Each kernel processes one row and matches its scalar counterpart bit for
// bit. Parallelization is handled by the caller.
//
// Paths with SIMD:
// - RGB24 <-> RGBA32 (SSSE3, NEON)
// - Y10_PACKED -> Y10 (SSSE3, NEON)

#![allow(unsafe_op_in_unsafe_fn)]

use common::cpu_features;

use crate::common::PixelFormat;
use crate::conversion::kernels::{KernelParams, RowKernelFn};

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod sse;

#[cfg(test)]
mod tests;

/// SIMD replacement for the scalar kernel of a format pair, if this CPU has one.
pub(crate) fn simd_row_kernel(from: PixelFormat, to: PixelFormat) -> Option<(&'static str, RowKernelFn)> {
    #[cfg(target_arch = "x86_64")]
    {
        if !cpu_features::has_ssse3() {
            return None;
        }
        match (from, to) {
            (PixelFormat::RGBA32, PixelFormat::RGB24) => {
                Some(("rgba32_to_rgb24_row_ssse3", rgba32_to_rgb24_row))
            }
            (PixelFormat::RGB24, PixelFormat::RGBA32) => {
                Some(("rgb24_to_rgba32_row_ssse3", rgb24_to_rgba32_row))
            }
            (PixelFormat::Y10_PACKED, PixelFormat::Y10) => {
                Some(("y10_packed_to_y10_row_ssse3", y10_packed_to_y10_row))
            }
            _ => None,
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if !cpu_features::has_neon() {
            return None;
        }
        match (from, to) {
            (PixelFormat::RGBA32, PixelFormat::RGB24) => {
                Some(("rgba32_to_rgb24_row_neon", rgba32_to_rgb24_row))
            }
            (PixelFormat::RGB24, PixelFormat::RGBA32) => {
                Some(("rgb24_to_rgba32_row_neon", rgb24_to_rgba32_row))
            }
            (PixelFormat::Y10_PACKED, PixelFormat::Y10) => {
                Some(("y10_packed_to_y10_row_neon", y10_packed_to_y10_row))
            }
            _ => None,
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        let _ = (from, to);
        None
    }
}

// =============================================================================
// Row kernel wrappers
// These are only handed out after the feature check above.
// =============================================================================

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn rgba32_to_rgb24_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    let (src, dst) = (&src[..width * 4], &mut dst[..width * 3]);

    #[cfg(target_arch = "x86_64")]
    unsafe {
        sse::rgba_to_rgb_row_ssse3(src, dst, width);
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        neon::rgba_to_rgb_row_neon(src, dst, width);
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn rgb24_to_rgba32_row(src: &[u8], dst: &mut [u8], width: usize, params: &KernelParams) {
    let (src, dst) = (&src[..width * 3], &mut dst[..width * 4]);

    #[cfg(target_arch = "x86_64")]
    unsafe {
        sse::rgb_to_rgba_row_ssse3(src, dst, width, params.alpha);
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        neon::rgb_to_rgba_row_neon(src, dst, width, params.alpha);
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn y10_packed_to_y10_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    let width = width / 4 * 4;
    let src = &src[..width / 4 * 5];
    let dst: &mut [u16] = bytemuck::cast_slice_mut(&mut dst[..width * 2]);

    #[cfg(target_arch = "x86_64")]
    unsafe {
        sse::unpack_10bit_row_ssse3(src, dst);
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        neon::unpack_10bit_row_neon(src, dst);
    }
}

/// Scalar tail shared by the unpack kernels, starting at pixel `first`.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn unpack_10bit_tail(src: &[u8], dst: &mut [u16], first: usize) {
    use crate::conversion::kernels::packed10::{PACKED_BYTES, PACKED_PIXELS, unpack_10bit};

    let src = &src[first / PACKED_PIXELS * PACKED_BYTES..];
    for (s, d) in src
        .chunks_exact(PACKED_BYTES)
        .zip(dst[first..].chunks_exact_mut(PACKED_PIXELS))
    {
        d.copy_from_slice(&unpack_10bit(s));
    }
}
