//! Packed 10-bit formats: four samples in five bytes.
//!
//! Bytes 0..4 hold the upper eight bits of samples 0..4, byte 4 holds the
//! lower two bits of sample `i` at bit `2 * i`.

use super::{KernelParams, RowGroup, SourcePlane, TargetRows};

pub(crate) const PACKED_BYTES: usize = 5;
pub(crate) const PACKED_PIXELS: usize = 4;

#[inline(always)]
pub(crate) fn unpack_10bit(packed: &[u8]) -> [u16; 4] {
    let low = packed[4];
    std::array::from_fn(|i| ((packed[i] as u16) << 2) | ((low >> (2 * i)) & 0b11) as u16)
}

pub(crate) fn pack_10bit(values: [u16; 4]) -> [u8; 5] {
    let mut packed = [0u8; 5];
    for (i, &value) in values.iter().enumerate() {
        let value = value.min(1023);
        packed[i] = (value >> 2) as u8;
        packed[4] |= ((value & 0b11) as u8) << (2 * i);
    }
    packed
}

/// Maps 10-bit values to gamma-encoded 8-bit values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GammaLut([u8; 1024]);

impl GammaLut {
    pub fn new(gamma: f32) -> Self {
        let gamma = gamma as f64;
        Self(std::array::from_fn(|i| {
            (255.0 * (i as f64 / 1023.0).powf(gamma)).round() as u8
        }))
    }

    #[inline(always)]
    pub fn get(&self, value: u16) -> u8 {
        self.0[value.min(1023) as usize]
    }
}

/// Gamma curve as three linear pieces split at [`GAMMA_STEP_01`] and
/// [`GAMMA_STEP_12`]; slopes and intercepts are scaled by 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GammaSegments {
    slopes: [i32; 3],
    intercepts: [i32; 2],
}

pub(crate) const GAMMA_STEP_01: u16 = 40;
pub(crate) const GAMMA_STEP_12: u16 = 280;

impl GammaSegments {
    /// Pieces through the curve at 0, both steps and 1023.
    pub fn new(gamma: f32) -> Self {
        let gamma = gamma as f64;
        let curve = |x: f64| 255.0 * (x / 1023.0).powf(gamma);
        let (x1, x2) = (GAMMA_STEP_01 as f64, GAMMA_STEP_12 as f64);
        let (y1, y2) = (curve(x1), curve(x2));

        let slopes = [y1 / x1, (y2 - y1) / (x2 - x1), (255.0 - y2) / (1023.0 - x2)];
        let intercepts = [y1 - slopes[1] * x1, y2 - slopes[2] * x2];
        let scale = |value: f64| (value * 256.0).round() as i32;
        Self {
            slopes: slopes.map(scale),
            intercepts: intercepts.map(scale),
        }
    }

    #[inline(always)]
    pub fn get(&self, value: u16) -> u8 {
        let x = value.min(1023) as i32;
        let scaled = if value < GAMMA_STEP_01 {
            self.slopes[0] * x
        } else if value <= GAMMA_STEP_12 {
            self.slopes[1] * x + self.intercepts[0]
        } else {
            self.slopes[2] * x + self.intercepts[1]
        };
        ((scaled + 128) >> 8).clamp(0, 255) as u8
    }
}

// =============================================================================
// Y10_PACKED
// =============================================================================

/// Linear `>> 2` or, with a gamma table in `params`, gamma-encoded output.
pub(crate) fn y10_packed_to_y8_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    params: &KernelParams,
) {
    let blocks = width / PACKED_PIXELS;
    let src = src[..blocks * PACKED_BYTES].chunks_exact(PACKED_BYTES);
    let dst = dst[..blocks * PACKED_PIXELS].chunks_exact_mut(PACKED_PIXELS);
    match params.gamma_lut.as_deref() {
        Some(lut) => {
            for (s, d) in src.zip(dst) {
                for (out, value) in d.iter_mut().zip(unpack_10bit(s)) {
                    *out = lut.get(value);
                }
            }
        }
        None => {
            for (s, d) in src.zip(dst) {
                d.copy_from_slice(&s[..PACKED_PIXELS]);
            }
        }
    }
}

/// Gamma encoding through [`GammaSegments`] instead of the full table.
pub(crate) fn y10_packed_to_y8_approximated_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    params: &KernelParams,
) {
    let Some(segments) = params.gamma_segments else {
        y10_packed_to_y8_row(src, dst, width, params);
        return;
    };
    let blocks = width / PACKED_PIXELS;
    for (s, d) in src[..blocks * PACKED_BYTES]
        .chunks_exact(PACKED_BYTES)
        .zip(dst[..blocks * PACKED_PIXELS].chunks_exact_mut(PACKED_PIXELS))
    {
        for (out, value) in d.iter_mut().zip(unpack_10bit(s)) {
            *out = segments.get(value);
        }
    }
}

/// Linear `>> 2` replicated into three equal channels, so RGB24 and BGR24 share it.
pub(crate) fn y10_packed_to_yyy24_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    let blocks = width / PACKED_PIXELS;
    for (s, d) in src[..blocks * PACKED_BYTES]
        .chunks_exact(PACKED_BYTES)
        .zip(dst[..blocks * PACKED_PIXELS * 3].chunks_exact_mut(PACKED_PIXELS * 3))
    {
        for (pixel, &value) in d.chunks_exact_mut(3).zip(&s[..PACKED_PIXELS]) {
            pixel.fill(value);
        }
    }
}

/// Copies whole packed blocks; `width` is in pixels.
pub(crate) fn copy_packed_row(src: &[u8], dst: &mut [u8], width: usize, _params: &KernelParams) {
    let len = width / PACKED_PIXELS * PACKED_BYTES;
    dst[..len].copy_from_slice(&src[..len]);
}

pub(crate) fn y10_packed_to_y10_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    let blocks = width / PACKED_PIXELS;
    let dst: &mut [u16] = bytemuck::cast_slice_mut(&mut dst[..blocks * PACKED_PIXELS * 2]);
    for (s, d) in src[..blocks * PACKED_BYTES]
        .chunks_exact(PACKED_BYTES)
        .zip(dst.chunks_exact_mut(PACKED_PIXELS))
    {
        d.copy_from_slice(&unpack_10bit(s));
    }
}

// =============================================================================
// Bayer mosaics
// =============================================================================

const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;

/// Demosaics one pair of mosaic rows.
///
/// `top` is the even source row. Each 2x2 quad shares its red and blue
/// sample; green pixels keep their own green, the other two pixels take the
/// average of both greens.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn demosaic_rows<const RGGB: bool, const RI: usize, const GI: usize, const BI: usize>(
    top: &[u8],
    bottom: &[u8],
    top_out: &mut [u8],
    bottom_out: &mut [u8],
    width: usize,
    sample: impl Fn(u16, usize) -> u8,
    green_average: impl Fn(u16, u16) -> u8,
) {
    let (tl_channel, br_channel) = if RGGB { (RED, BLUE) } else { (BLUE, RED) };
    let blocks = width / PACKED_PIXELS;
    for block in 0..blocks {
        let packed = block * PACKED_BYTES..(block + 1) * PACKED_BYTES;
        let top_values = unpack_10bit(&top[packed.clone()]);
        let bottom_values = unpack_10bit(&bottom[packed]);

        for quad in 0..2 {
            let tl = top_values[quad * 2];
            let tr = top_values[quad * 2 + 1];
            let bl = bottom_values[quad * 2];
            let br = bottom_values[quad * 2 + 1];

            let first = sample(tl, tl_channel);
            let second = sample(br, br_channel);
            let (red, blue) = if RGGB { (first, second) } else { (second, first) };
            let average = green_average(tr, bl);

            let x = (block * PACKED_PIXELS + quad * 2) * 3;
            let pixels = [
                (&mut top_out[x..x + 6], [average, sample(tr, GREEN)]),
                (&mut bottom_out[x..x + 6], [sample(bl, GREEN), average]),
            ];
            for (out, greens) in pixels {
                for (pixel, green) in out.chunks_exact_mut(3).zip(greens) {
                    pixel[RI] = red;
                    pixel[GI] = green;
                    pixel[BI] = blue;
                }
            }
        }
    }
}

/// Source rows of a two-row group ordered top to bottom, with the target row
/// each one is written to.
#[inline]
fn mosaic_rows<'a>(
    source: &SourcePlane<'a>,
    target: &'a mut TargetRows<'_>,
    group: &RowGroup,
) -> (&'a [u8], &'a [u8], &'a mut [u8], &'a mut [u8]) {
    let (s0, s1) = (group.source_row(0), group.source_row(1));
    let (row0, row1) = target.two_rows_mut();
    if s0 < s1 {
        (source.row(s0), source.row(s1), row0, row1)
    } else {
        (source.row(s1), source.row(s0), row1, row0)
    }
}

/// Plain demosaic, averaging in 10 bits and keeping the upper eight.
pub(crate) fn bayer_to_rgb<const RGGB: bool, const RI: usize, const GI: usize, const BI: usize>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    let (top, bottom, top_out, bottom_out) = mosaic_rows(&sources[0], &mut targets[0], group);
    demosaic_rows::<RGGB, RI, GI, BI>(
        top,
        bottom,
        top_out,
        bottom_out,
        group.width,
        |value, _| (value >> 2) as u8,
        |a, b| ((a + b + 1) >> 3) as u8,
    );
}

/// Demosaic with black level, white balance and gamma applied per sample.
pub(crate) fn bayer_to_rgb_advanced<
    const RGGB: bool,
    const RI: usize,
    const GI: usize,
    const BI: usize,
>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    params: &KernelParams,
) {
    let black_level = params.black_level;
    let white_balance = params.white_balance;
    let lut = params.gamma_lut.as_deref();
    let sample = |value: u16, channel: usize| {
        let value = value.saturating_sub(black_level) as u32;
        let balanced = ((value * white_balance[channel] + 64) >> 7).min(1023) as u16;
        match lut {
            Some(lut) => lut.get(balanced),
            None => (balanced >> 2) as u8,
        }
    };
    let (top, bottom, top_out, bottom_out) = mosaic_rows(&sources[0], &mut targets[0], group);
    demosaic_rows::<RGGB, RI, GI, BI>(
        top,
        bottom,
        top_out,
        bottom_out,
        group.width,
        sample,
        |a, b| ((sample(a, GREEN) as u16 + sample(b, GREEN) as u16 + 1) >> 1) as u8,
    );
}
