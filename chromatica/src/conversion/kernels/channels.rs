//! 8-bit channel shuffles, identity copies and luma extraction.
//!
//! Shuffle kernels are generated from the channel order of each format, so
//! adding a pair only needs a line in `shuffle_kernels!`.

use crate::common::PixelFormat;

use super::{KernelParams, RowKernelFn};

// =============================================================================
// Channel layouts
// =============================================================================

const R: u8 = 0;
const G: u8 = 1;
const B: u8 = 2;
const A: u8 = 3;
/// Unused padding byte.
const X: u8 = 4;
const L: u8 = 5;
const Y: u8 = 6;
const U: u8 = 7;
const V: u8 = 8;

/// Marks a target channel filled with the alpha value instead of a source channel.
const ALPHA: u8 = u8::MAX;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    pub channels: usize,
    pub order: [u8; 4],
}

impl Layout {
    const fn new(channels: usize, order: [u8; 4]) -> Self {
        Self { channels, order }
    }

    const fn position(&self, channel: u8) -> Option<u8> {
        let mut i = 0;
        while i < self.channels {
            if self.order[i] == channel {
                return Some(i as u8);
            }
            i += 1;
        }
        None
    }
}

/// Channel order of an 8-bit interleaved format. Panics on other formats.
pub(crate) const fn layout(format: PixelFormat) -> Layout {
    match format {
        PixelFormat::Y8 => Layout::new(1, [L, X, X, X]),
        PixelFormat::YA16 => Layout::new(2, [L, A, X, X]),
        PixelFormat::RGB24 => Layout::new(3, [R, G, B, X]),
        PixelFormat::BGR24 => Layout::new(3, [B, G, R, X]),
        PixelFormat::RGB32 => Layout::new(4, [R, G, B, X]),
        PixelFormat::BGR32 => Layout::new(4, [B, G, R, X]),
        PixelFormat::RGBA32 => Layout::new(4, [R, G, B, A]),
        PixelFormat::BGRA32 => Layout::new(4, [B, G, R, A]),
        PixelFormat::ARGB32 => Layout::new(4, [A, R, G, B]),
        PixelFormat::ABGR32 => Layout::new(4, [A, B, G, R]),
        PixelFormat::YUV24 => Layout::new(3, [Y, U, V, X]),
        PixelFormat::YVU24 => Layout::new(3, [Y, V, U, X]),
        _ => panic!("format has no 8-bit interleaved layout"),
    }
}

/// Source index for each target channel, or [`ALPHA`].
///
/// Color channels missing from the source fall back to luma.
pub(crate) const fn shuffle_pattern(from: Layout, to: Layout) -> [u8; 4] {
    let mut pattern = [ALPHA; 4];
    let mut i = 0;
    while i < to.channels {
        let channel = to.order[i];
        pattern[i] = match from.position(channel) {
            Some(index) if channel != X => index,
            _ => match channel {
                R | G | B => match from.position(L) {
                    Some(index) => index,
                    None => panic!("missing source channel"),
                },
                L => panic!("luma needs a weighted kernel"),
                _ => ALPHA,
            },
        };
        i += 1;
    }
    pattern
}

// =============================================================================
// Kernels
// =============================================================================

/// Rearranges `S`-channel pixels into `D`-channel pixels.
#[inline]
pub(crate) fn shuffle_row<const S: usize, const D: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    pattern: [u8; 4],
    alpha: u8,
) {
    let src = &src[..width * S];
    let dst = &mut dst[..width * D];
    for (s, d) in src.chunks_exact(S).zip(dst.chunks_exact_mut(D)) {
        for (i, out) in d.iter_mut().enumerate() {
            let index = pattern[i];
            *out = if index == ALPHA { alpha } else { s[index as usize] };
        }
    }
}

macro_rules! shuffle_kernels {
    ($($from:ident => $to:ident;)+) => {
        paste::paste! {
            $(
                pub(crate) fn [<$from:lower _to_ $to:lower _row>](
                    src: &[u8],
                    dst: &mut [u8],
                    width: usize,
                    params: &KernelParams,
                ) {
                    const FROM: Layout = layout(PixelFormat::$from);
                    const TO: Layout = layout(PixelFormat::$to);
                    const PATTERN: [u8; 4] = shuffle_pattern(FROM, TO);
                    shuffle_row::<{ FROM.channels }, { TO.channels }>(
                        src,
                        dst,
                        width,
                        PATTERN,
                        params.alpha,
                    );
                }
            )+

            /// Every shuffle kernel as `(source, target, name, kernel)`.
            pub(crate) fn shuffle_table() -> Vec<(PixelFormat, PixelFormat, &'static str, RowKernelFn)> {
                vec![
                    $((
                        PixelFormat::$from,
                        PixelFormat::$to,
                        stringify!([<$from:lower _to_ $to:lower _row>]),
                        [<$from:lower _to_ $to:lower _row>] as RowKernelFn,
                    ),)+
                ]
            }
        }
    };
}

shuffle_kernels! {
    RGB24 => BGR24;
    BGR24 => RGB24;

    RGB24 => RGB32;
    RGB24 => BGR32;
    RGB24 => RGBA32;
    RGB24 => BGRA32;
    RGB24 => ARGB32;
    RGB24 => ABGR32;
    BGR24 => RGB32;
    BGR24 => BGR32;
    BGR24 => RGBA32;
    BGR24 => BGRA32;
    BGR24 => ARGB32;
    BGR24 => ABGR32;

    RGB32 => RGB24;
    RGB32 => BGR24;
    BGR32 => RGB24;
    BGR32 => BGR24;
    RGBA32 => RGB24;
    RGBA32 => BGR24;
    BGRA32 => RGB24;
    BGRA32 => BGR24;
    ARGB32 => RGB24;
    ARGB32 => BGR24;
    ABGR32 => RGB24;
    ABGR32 => BGR24;

    RGB32 => BGR32;
    RGB32 => RGBA32;
    RGB32 => BGRA32;
    BGR32 => RGB32;
    BGR32 => RGBA32;
    BGR32 => BGRA32;
    RGBA32 => BGRA32;
    RGBA32 => ARGB32;
    RGBA32 => ABGR32;
    RGBA32 => RGB32;
    RGBA32 => BGR32;
    BGRA32 => RGBA32;
    BGRA32 => ARGB32;
    BGRA32 => ABGR32;
    BGRA32 => RGB32;
    BGRA32 => BGR32;
    ARGB32 => RGBA32;
    ARGB32 => BGRA32;
    ARGB32 => ABGR32;
    ABGR32 => RGBA32;
    ABGR32 => BGRA32;
    ABGR32 => ARGB32;

    YUV24 => YVU24;
    YVU24 => YUV24;

    Y8 => RGB24;
    Y8 => BGR24;
    Y8 => RGBA32;
    Y8 => BGRA32;
    Y8 => YA16;
    YA16 => Y8;
    YA16 => RGBA32;
}

/// Copies `width` pixels of `N` bytes.
pub(crate) fn copy_row<const N: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    let len = width * N;
    dst[..len].copy_from_slice(&src[..len]);
}

/// Identity kernel for pixels of `pixel_bytes` bytes.
pub(crate) fn copy_kernel_for(pixel_bytes: usize) -> Option<RowKernelFn> {
    let kernel: RowKernelFn = match pixel_bytes {
        1 => copy_row::<1>,
        2 => copy_row::<2>,
        3 => copy_row::<3>,
        4 => copy_row::<4>,
        6 => copy_row::<6>,
        8 => copy_row::<8>,
        _ => return None,
    };
    Some(kernel)
}

/// Keeps channel `I` of `CH`-channel pixels.
pub(crate) fn extract_channel_row<const CH: usize, const I: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    for (pixel, out) in src[..width * CH].chunks_exact(CH).zip(&mut dst[..width]) {
        *out = pixel[I];
    }
}

// BT.601 luma weights in 7-bit fixed point.
const LUMA_R: u32 = 38;
const LUMA_G: u32 = 75;
const LUMA_B: u32 = 15;

#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 64) >> 7) as u8
}

/// Weighted luma of `CH`-channel pixels with color channels at `RI`, `GI`, `BI`.
pub(crate) fn rgb_to_y8_row<const CH: usize, const RI: usize, const GI: usize, const BI: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    for (s, d) in src[..width * CH].chunks_exact(CH).zip(&mut dst[..width]) {
        *d = luma(s[RI], s[GI], s[BI]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(alpha: u8) -> KernelParams {
        KernelParams {
            alpha,
            ..KernelParams::default()
        }
    }

    #[test]
    fn patterns() {
        assert_eq!(
            shuffle_pattern(layout(PixelFormat::RGB24), layout(PixelFormat::BGR24)),
            [2, 1, 0, ALPHA]
        );
        assert_eq!(
            shuffle_pattern(layout(PixelFormat::BGRA32), layout(PixelFormat::ARGB32)),
            [3, 2, 1, 0]
        );
        assert_eq!(
            shuffle_pattern(layout(PixelFormat::Y8), layout(PixelFormat::BGRA32)),
            [0, 0, 0, ALPHA]
        );
        assert_eq!(
            shuffle_pattern(layout(PixelFormat::RGB32), layout(PixelFormat::RGBA32)),
            [0, 1, 2, ALPHA]
        );
    }

    #[test]
    fn adds_requested_alpha() {
        let src = [1, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 8];
        rgb24_to_argb32_row(&src, &mut dst, 2, &params(0x40));
        assert_eq!(dst, [0x40, 1, 2, 3, 0x40, 4, 5, 6]);
    }

    #[test]
    fn drops_alpha() {
        let src = [10, 20, 30, 40];
        let mut dst = [0u8; 3];
        abgr32_to_rgb24_row(&src, &mut dst, 1, &params(0xFF));
        assert_eq!(dst, [40, 30, 20]);
    }

    #[test]
    fn preserves_source_alpha() {
        let src = [1, 2, 3, 77];
        let mut dst = [0u8; 4];
        rgba32_to_bgra32_row(&src, &mut dst, 1, &params(0xFF));
        assert_eq!(dst, [3, 2, 1, 77]);
    }

    #[test]
    fn luma_expansion() {
        let mut dst = [0u8; 4];
        ya16_to_rgba32_row(&[9, 200], &mut dst, 1, &params(0xFF));
        assert_eq!(dst, [9, 9, 9, 200]);

        let mut dst = [0u8; 2];
        y8_to_ya16_row(&[9], &mut dst, 1, &params(0x10));
        assert_eq!(dst, [9, 0x10]);
    }

    #[test]
    fn table_names_match_kernels() {
        let table = shuffle_table();
        assert!(table.len() > 50);
        let (from, to, name, _) = table[0];
        assert_eq!((from, to), (PixelFormat::RGB24, PixelFormat::BGR24));
        assert_eq!(name, "rgb24_to_bgr24_row");
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        let mut dst = [0u8; 2];
        rgb_to_y8_row::<4, 2, 1, 0>(&[0, 0, 255, 9, 255, 255, 255, 9], &mut dst, 2, &params(0));
        assert_eq!(dst, [76, 255]);
    }
}
