//! Pixel kernels and the plane views they operate on.
//!
//! Row kernels convert one row of a single-plane frame. Multi-row kernels
//! convert one group of rows across all planes of a frame and resolve their
//! own source rows, plane strides and subsampling. Neither kind can fail:
//! every precondition is checked before dispatch.

pub(crate) mod cast;
pub(crate) mod channels;
pub(crate) mod color_matrix;
pub(crate) mod packed10;
pub(crate) mod planar;
pub(crate) mod reverse;

#[cfg(test)]
mod tests;

use crate::conversion::options::{Options, OptionsVariant};

pub(crate) use packed10::{GammaLut, GammaSegments};

/// Converts `width` pixels from `src` into `dst`.
pub(crate) type RowKernelFn = fn(src: &[u8], dst: &mut [u8], width: usize, params: &KernelParams);

/// Reverses the pixel order of the first `width` pixels of a row in place.
pub(crate) type RowReverseFn = fn(row: &mut [u8], width: usize);

/// Converts the row group described by `group`.
pub(crate) type MultiRowKernelFn = fn(
    sources: &[SourcePlane<'_>],
    targets: &mut [TargetRows<'_>],
    group: &RowGroup,
    params: &KernelParams,
);

/// Values kernels derive from [`Options`], resolved once per call.
#[derive(Debug, Clone)]
pub(crate) struct KernelParams {
    pub alpha: u8,
    pub black_level: u16,
    /// White balance per red, green, blue in 7-bit fixed point (128 == 1.0).
    pub white_balance: [u32; 3],
    pub gamma_lut: Option<Box<GammaLut>>,
    pub gamma_segments: Option<GammaSegments>,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            alpha: crate::conversion::options::DEFAULT_ALPHA,
            black_level: 0,
            white_balance: [128; 3],
            gamma_lut: None,
            gamma_segments: None,
        }
    }
}

impl KernelParams {
    /// Expects validated options.
    pub(crate) fn from_options(options: &Options) -> Self {
        let mut params = Self {
            alpha: options.alpha_value(),
            ..Self::default()
        };
        match *options.variant() {
            OptionsVariant::Default | OptionsVariant::AlphaChannelTargetValue(_) => {}
            OptionsVariant::GammaCorrection(gamma) => {
                params.gamma_lut = Some(Box::new(GammaLut::new(gamma)));
                params.gamma_segments = Some(GammaSegments::new(gamma));
            }
            OptionsVariant::BlackLevelWhiteBalanceGamma {
                black_level,
                white_balance,
                gamma,
            } => {
                params.black_level = black_level;
                params.white_balance = white_balance.map(|factor| (factor * 128.0).round() as u32);
                params.gamma_lut = Some(Box::new(GammaLut::new(gamma)));
            }
        }
        params
    }
}

/// Read-only plane handed to multi-row kernels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourcePlane<'a> {
    pub data: &'a [u8],
    pub stride: usize,
    pub row_bytes: usize,
}

impl<'a> SourcePlane<'a> {
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes]
    }
}

/// The rows of one target plane that belong to a single row group.
#[derive(Debug)]
pub(crate) struct TargetRows<'a> {
    pub data: &'a mut [u8],
    pub stride: usize,
    pub row_bytes: usize,
}

impl TargetRows<'_> {
    #[inline]
    pub fn row_mut(&mut self, local_row: usize) -> &mut [u8] {
        let start = local_row * self.stride;
        &mut self.data[start..start + self.row_bytes]
    }

    /// The first two rows of the group.
    #[inline]
    pub fn two_rows_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        let (first, second) = self.data.split_at_mut(self.stride);
        (
            &mut first[..self.row_bytes],
            &mut second[..self.row_bytes],
        )
    }
}

/// Position of a row group inside the frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowGroup {
    pub index: usize,
    pub rows_per_iteration: usize,
    pub width: usize,
    pub height: usize,
    pub flipped: bool,
}

impl RowGroup {
    /// Frame row written by local row `local_row`.
    #[inline]
    pub fn target_row(&self, local_row: usize) -> usize {
        self.index * self.rows_per_iteration + local_row
    }

    /// Frame row read for local row `local_row`.
    #[inline]
    pub fn source_row(&self, local_row: usize) -> usize {
        let row = self.target_row(local_row);
        if self.flipped {
            self.height - 1 - row
        } else {
            row
        }
    }
}
