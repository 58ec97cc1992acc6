//! Kernels for 4:2:0 formats with one luma plane and 2x2 subsampled chroma.
//!
//! Chroma either lives in one interleaved plane (`UV`, `VU`) or in two
//! separate planes (`U_V`, `V_U`), always in plane order after luma.

use super::color_matrix::ColorTransform;
use super::{KernelParams, RowGroup, SourcePlane, TargetRows};

pub(crate) const UV: u8 = 0;
pub(crate) const VU: u8 = 1;
pub(crate) const U_V: u8 = 2;
pub(crate) const V_U: u8 = 3;

/// One chroma row of a source frame.
struct ChromaRow<'a, const L: u8> {
    first: &'a [u8],
    second: &'a [u8],
}

impl<'a, const L: u8> ChromaRow<'a, L> {
    #[inline(always)]
    fn new(sources: &[SourcePlane<'a>], row: usize) -> Self {
        let first = sources[1].row(row);
        let second = if L == UV || L == VU {
            first
        } else {
            sources[2].row(row)
        };
        Self { first, second }
    }

    /// `(u, v)` of chroma column `x`.
    #[inline(always)]
    fn get(&self, x: usize) -> (u8, u8) {
        match L {
            UV => (self.first[2 * x], self.first[2 * x + 1]),
            VU => (self.first[2 * x + 1], self.first[2 * x]),
            U_V => (self.first[x], self.second[x]),
            _ => (self.second[x], self.first[x]),
        }
    }
}

/// Writes `(u, v)` of chroma column `x` into the first row of the chroma targets.
#[inline(always)]
fn put_chroma<const L: u8>(chroma: &mut [TargetRows<'_>], x: usize, u: u8, v: u8) {
    match L {
        UV | VU => {
            let row = chroma[0].row_mut(0);
            let (first, second) = if L == UV { (u, v) } else { (v, u) };
            row[2 * x] = first;
            row[2 * x + 1] = second;
        }
        _ => {
            let (first, second) = if L == U_V { (u, v) } else { (v, u) };
            chroma[0].row_mut(0)[x] = first;
            chroma[1].row_mut(0)[x] = second;
        }
    }
}

/// 4:2:0 to 3 or 4 channel RGB with matrix `M`; the fourth channel is alpha.
pub(crate) fn yuv420_to_rgb<
    M: ColorTransform,
    const L: u8,
    const RI: usize,
    const GI: usize,
    const BI: usize,
    const CH: usize,
>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    params: &KernelParams,
) {
    for local in 0..group.rows_per_iteration {
        let source_row = group.source_row(local);
        let luma = sources[0].row(source_row);
        let chroma = ChromaRow::<L>::new(sources, source_row / 2);
        let out = targets[0].row_mut(local);

        for (x, (pixel, &y)) in out
            .chunks_exact_mut(CH)
            .zip(&luma[..group.width])
            .enumerate()
        {
            let (u, v) = chroma.get(x / 2);
            let rgb = M::MATRIX.apply([y as i32, u as i32, v as i32]);
            pixel[RI] = rgb[0];
            pixel[GI] = rgb[1];
            pixel[BI] = rgb[2];
            if CH == 4 {
                pixel[3] = params.alpha;
            }
        }
    }
}

/// 3 or 4 channel RGB to 4:2:0; chroma comes from the average of each 2x2 block.
pub(crate) fn rgb_to_yuv420<
    M: ColorTransform,
    const L: u8,
    const RI: usize,
    const GI: usize,
    const BI: usize,
    const CH: usize,
>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    let rows = [
        sources[0].row(group.source_row(0)),
        sources[0].row(group.source_row(1)),
    ];
    let (luma, chroma) = targets.split_at_mut(1);
    let rgb_at = |row: usize, x: usize| {
        let pixel = &rows[row][x * CH..x * CH + CH];
        [pixel[RI] as i32, pixel[GI] as i32, pixel[BI] as i32]
    };

    {
        let (luma0, luma1) = luma[0].two_rows_mut();
        for (row, out) in [luma0, luma1].into_iter().enumerate() {
            for (x, y) in out[..group.width].iter_mut().enumerate() {
                *y = M::MATRIX.apply(rgb_at(row, x))[0];
            }
        }
    }

    for cx in 0..group.width / 2 {
        let block = [
            rgb_at(0, 2 * cx),
            rgb_at(0, 2 * cx + 1),
            rgb_at(1, 2 * cx),
            rgb_at(1, 2 * cx + 1),
        ];
        let average: [i32; 3] =
            std::array::from_fn(|c| (block[0][c] + block[1][c] + block[2][c] + block[3][c] + 2) >> 2);
        let yuv = M::MATRIX.apply(average);
        put_chroma::<L>(chroma, cx, yuv[1], yuv[2]);
    }
}

/// 4:2:0 to YUV24 (or YVU24 with `SWAP`), replicating each chroma sample.
pub(crate) fn yuv420_to_yuv444<const L: u8, const SWAP: bool>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    for local in 0..group.rows_per_iteration {
        let source_row = group.source_row(local);
        let luma = sources[0].row(source_row);
        let chroma = ChromaRow::<L>::new(sources, source_row / 2);
        let out = targets[0].row_mut(local);

        for (x, (pixel, &y)) in out.chunks_exact_mut(3).zip(&luma[..group.width]).enumerate() {
            let (u, v) = chroma.get(x / 2);
            let (first, second) = if SWAP { (v, u) } else { (u, v) };
            pixel[0] = y;
            pixel[1] = first;
            pixel[2] = second;
        }
    }
}

/// YUV24 (or YVU24 with `SWAP`) to 4:2:0, averaging chroma over each 2x2 block.
pub(crate) fn yuv444_to_yuv420<const L: u8, const SWAP: bool>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    let rows = [
        sources[0].row(group.source_row(0)),
        sources[0].row(group.source_row(1)),
    ];
    let (luma, chroma) = targets.split_at_mut(1);
    {
        let (luma0, luma1) = luma[0].two_rows_mut();
        for (row, out) in rows.iter().zip([luma0, luma1]) {
            for (y, pixel) in out[..group.width].iter_mut().zip(row.chunks_exact(3)) {
                *y = pixel[0];
            }
        }
    }

    let (ui, vi) = if SWAP { (2, 1) } else { (1, 2) };
    let average = |x: usize, channel: usize| {
        let sum: u32 = rows
            .iter()
            .flat_map(|row| [row[6 * x + channel], row[6 * x + 3 + channel]])
            .map(u32::from)
            .sum();
        ((sum + 2) >> 2) as u8
    };
    for cx in 0..group.width / 2 {
        put_chroma::<L>(chroma, cx, average(cx, ui), average(cx, vi));
    }
}

/// Copies the luma plane.
pub(crate) fn yuv420_luma_to_y8(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    for local in 0..group.rows_per_iteration {
        let luma = sources[0].row(group.source_row(local));
        targets[0].row_mut(local)[..group.width].copy_from_slice(&luma[..group.width]);
    }
}

/// Moves luma and chroma between 4:2:0 layouts, `S == T` is a plain copy.
pub(crate) fn repack_yuv420<const S: u8, const T: u8>(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    _params: &KernelParams,
) {
    let width = group.width;
    let (luma, chroma) = targets.split_at_mut(1);
    for local in 0..2 {
        let row = sources[0].row(group.source_row(local));
        luma[0].row_mut(local)[..width].copy_from_slice(&row[..width]);
    }

    let source_chroma = ChromaRow::<S>::new(sources, group.source_row(0) / 2);
    for x in 0..width / 2 {
        let (u, v) = source_chroma.get(x);
        put_chroma::<T>(chroma, x, u, v);
    }
}
