//! Element-type conversions between formats with the same channel layout.

use std::mem::size_of;

use bytemuck::Pod;

use super::KernelParams;

// =============================================================================
// Channel conversion
// =============================================================================

pub(crate) trait ChannelConvert<To>: Copy {
    fn convert(self) -> To;
}

// Upscale: replicate bits to fill larger type
macro_rules! impl_convert_upscale {
    ($from:ty, $to:ty) => {
        impl ChannelConvert<$to> for $from {
            #[inline]
            fn convert(self) -> $to {
                let shift = (size_of::<$to>() - size_of::<$from>()) * 8;
                (self as $to) << shift | (self as $to)
            }
        }
    };
}

// Downscale: take high bits
macro_rules! impl_convert_downscale {
    ($from:ty, $to:ty) => {
        impl ChannelConvert<$to> for $from {
            #[inline]
            fn convert(self) -> $to {
                let shift = (size_of::<$from>() - size_of::<$to>()) * 8;
                (self >> shift) as $to
            }
        }
    };
}

macro_rules! impl_convert_int_to_float {
    ($int:ty) => {
        impl ChannelConvert<f32> for $int {
            #[inline]
            fn convert(self) -> f32 {
                self as f32 / <$int>::MAX as f32
            }
        }
    };
}

// Float to integer: clamp to [0, 1], round to nearest
macro_rules! impl_convert_float_to_int {
    ($int:ty) => {
        impl ChannelConvert<$int> for f32 {
            #[inline]
            fn convert(self) -> $int {
                let value = if self.is_nan() { 0.0 } else { self.clamp(0.0, 1.0) };
                (value as f64 * <$int>::MAX as f64 + 0.5) as $int
            }
        }
    };
}

impl_convert_upscale!(u8, u16);
impl_convert_downscale!(u16, u8);
impl_convert_int_to_float!(u8);
impl_convert_int_to_float!(u16);
impl_convert_float_to_int!(u8);
impl_convert_float_to_int!(u16);

// =============================================================================
// Row kernels
// =============================================================================

/// Converts every channel of `width` pixels with `CH` channels.
pub(crate) fn cast_row<F, T, const CH: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) where
    F: Pod + ChannelConvert<T>,
    T: Pod,
{
    let count = width * CH;
    let src: &[F] = bytemuck::cast_slice(&src[..count * size_of::<F>()]);
    let dst: &mut [T] = bytemuck::cast_slice_mut(&mut dst[..count * size_of::<T>()]);
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.convert();
    }
}

// 10-bit samples live in the low bits of a u16; values above 1023 saturate.

#[inline]
fn y10(value: u16) -> u16 {
    value.min(1023)
}

fn map_u16_row<T: Pod>(src: &[u8], dst: &mut [u8], width: usize, f: impl Fn(u16) -> T) {
    let src: &[u16] = bytemuck::cast_slice(&src[..width * 2]);
    let dst: &mut [T] = bytemuck::cast_slice_mut(&mut dst[..width * size_of::<T>()]);
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = f(s);
    }
}

pub(crate) fn y10_to_y8_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    map_u16_row(src, dst, width, |v| (y10(v) >> 2) as u8);
}

pub(crate) fn y10_to_y16_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    map_u16_row(src, dst, width, |v| {
        let v = y10(v);
        (v << 6) | (v >> 4)
    });
}

pub(crate) fn y16_to_y10_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    map_u16_row(src, dst, width, |v| v >> 6);
}

pub(crate) fn y8_to_y10_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    let dst: &mut [u16] = bytemuck::cast_slice_mut(&mut dst[..width * 2]);
    for (d, &s) in dst.iter_mut().zip(&src[..width]) {
        let s = s as u16;
        *d = (s << 2) | (s >> 6);
    }
}
