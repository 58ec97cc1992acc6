//! Process-wide table of conversion kernels.
//!
//! The table is built once on first use and is read-only afterwards, so
//! lookups from any thread see the same entries.

use std::fmt;
use std::sync::LazyLock;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::common::{ElementType, PixelFormat};
use crate::conversion::kernels::cast::{
    cast_row, y10_to_y16_row, y10_to_y8_row, y16_to_y10_row, y8_to_y10_row,
};
use crate::conversion::kernels::channels::{
    copy_kernel_for, extract_channel_row, rgb_to_y8_row, shuffle_table,
};
use crate::conversion::kernels::color_matrix::*;
use crate::conversion::kernels::packed10::{
    bayer_to_rgb, bayer_to_rgb_advanced, copy_packed_row, y10_packed_to_y10_row,
    y10_packed_to_y8_approximated_row, y10_packed_to_y8_row, y10_packed_to_yyy24_row,
};
use crate::conversion::kernels::planar::{
    repack_yuv420, rgb_to_yuv420, yuv420_luma_to_y8, yuv420_to_rgb, yuv420_to_yuv444,
    yuv444_to_yuv420, U_V, UV, V_U, VU,
};
use crate::conversion::kernels::{MultiRowKernelFn, RowKernelFn};
use crate::conversion::options::{Options, OptionsKind};
use crate::conversion::simd::simd_row_kernel;

/// Accuracy tier of a kernel.
#[derive(
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Precision {
    Precise,
    /// Cheaper arithmetic, only chosen when options allow approximation.
    Approximate,
}

#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct ConversionKey {
    pub source: PixelFormat,
    pub target: PixelFormat,
    pub options: OptionsKind,
    pub precision: Precision,
}

impl fmt::Display for ConversionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {})",
            self.source, self.target, self.options, self.precision
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum KernelRef {
    Row(RowKernelFn),
    MultiRow {
        kernel: MultiRowKernelFn,
        rows_per_iteration: usize,
    },
}

/// Planes and element types a kernel reads and writes.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct KernelArity {
    pub source_planes: usize,
    pub target_planes: usize,
    pub source_element: ElementType,
    pub target_element: ElementType,
}

impl KernelArity {
    pub fn of(source: PixelFormat, target: PixelFormat) -> Self {
        Self {
            source_planes: source.plane_count(),
            target_planes: target.plane_count(),
            source_element: source.element_type(),
            target_element: target.element_type(),
        }
    }
}

/// A registered kernel.
#[derive(Debug, Clone)]
pub struct KernelEntry {
    name: &'static str,
    kernel: KernelRef,
    arity: KernelArity,
    precision_bits: Option<u8>,
    flippable: bool,
}

impl KernelEntry {
    /// Kernel name, for logs and diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed-point precision of color-matrix kernels.
    #[inline]
    pub fn precision_bits(&self) -> Option<u8> {
        self.precision_bits
    }

    #[inline]
    pub fn arity(&self) -> KernelArity {
        self.arity
    }

    /// Whether the kernel may read source rows bottom to top.
    ///
    /// Copies between equal Bayer formats may not: a flipped mosaic starts
    /// with the other row of each quad.
    #[inline]
    pub fn supports_flip(&self) -> bool {
        self.flippable
    }

    #[inline]
    pub fn is_multi_row(&self) -> bool {
        matches!(self.kernel, KernelRef::MultiRow { .. })
    }

    /// Rows each multi-row iteration converts, `1` for row kernels.
    pub fn rows_per_iteration(&self) -> usize {
        match self.kernel {
            KernelRef::Row(_) => 1,
            KernelRef::MultiRow {
                rows_per_iteration, ..
            } => rows_per_iteration,
        }
    }

    #[inline]
    pub(crate) fn kernel(&self) -> KernelRef {
        self.kernel
    }
}

pub struct ConversionRegistry {
    entries: HashMap<ConversionKey, KernelEntry>,
}

static REGISTRY: LazyLock<ConversionRegistry> = LazyLock::new(ConversionRegistry::build);

/// The process-wide registry.
pub fn registry() -> &'static ConversionRegistry {
    &REGISTRY
}

impl ConversionRegistry {
    /// Kernel for the pair under `options`.
    ///
    /// With approximation allowed an approximate kernel is preferred and the
    /// precise one used when none exists.
    pub fn lookup(
        &self,
        source: PixelFormat,
        target: PixelFormat,
        options: &Options,
    ) -> Option<&KernelEntry> {
        let key = |precision| ConversionKey {
            source,
            target,
            options: options.kind(),
            precision,
        };
        if options.allow_approximation() {
            if let Some(entry) = self.entries.get(&key(Precision::Approximate)) {
                return Some(entry);
            }
        }
        self.entries.get(&key(Precision::Precise))
    }

    pub fn get(&self, key: &ConversionKey) -> Option<&KernelEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ConversionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &ConversionKey> {
        self.entries.keys()
    }

    fn build() -> Self {
        let mut builder = Builder::default();
        builder.identities();
        builder.shuffles();
        builder.casts();
        builder.matrices();
        builder.planar();
        builder.packed();

        tracing::info!(
            conversions = builder.entries.len(),
            simd = builder.simd_kernels,
            "conversion registry built"
        );
        Self {
            entries: builder.entries,
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Default)]
struct Builder {
    entries: HashMap<ConversionKey, KernelEntry>,
    simd_kernels: usize,
}

/// Option kinds a kernel is registered under; gaining alpha also accepts an
/// explicit alpha value.
fn option_kinds(source: PixelFormat, target: PixelFormat) -> &'static [OptionsKind] {
    if target.has_alpha() && !source.has_alpha() {
        &[OptionsKind::Default, OptionsKind::AlphaChannelTargetValue]
    } else {
        &[OptionsKind::Default]
    }
}

impl Builder {
    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        source: PixelFormat,
        target: PixelFormat,
        kinds: &[OptionsKind],
        precision: Precision,
        name: &'static str,
        kernel: KernelRef,
        precision_bits: Option<u8>,
    ) {
        let entry = KernelEntry {
            name,
            kernel,
            arity: KernelArity::of(source, target),
            precision_bits,
            flippable: !(source.is_bayer() && source == target),
        };
        for &options in kinds {
            let key = ConversionKey {
                source,
                target,
                options,
                precision,
            };
            let previous = self.entries.insert(key, entry.clone());
            debug_assert!(previous.is_none(), "duplicate kernel for {key}");
        }
    }

    /// Row kernel; a SIMD kernel for the pair replaces the scalar one.
    fn row(
        &mut self,
        source: PixelFormat,
        target: PixelFormat,
        name: &'static str,
        kernel: RowKernelFn,
    ) {
        debug_assert!(!source.is_multi_plane() && !target.is_multi_plane());
        let (name, kernel) = match simd_row_kernel(source, target) {
            Some(simd) => {
                self.simd_kernels += 1;
                simd
            }
            None => (name, kernel),
        };
        self.insert(
            source,
            target,
            option_kinds(source, target),
            Precision::Precise,
            name,
            KernelRef::Row(kernel),
            None,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn multi_row(
        &mut self,
        source: PixelFormat,
        target: PixelFormat,
        kinds: &[OptionsKind],
        precision: Precision,
        name: &'static str,
        kernel: MultiRowKernelFn,
        rows_per_iteration: usize,
        precision_bits: Option<u8>,
    ) {
        self.insert(
            source,
            target,
            kinds,
            precision,
            name,
            KernelRef::MultiRow {
                kernel,
                rows_per_iteration,
            },
            precision_bits,
        );
    }

    fn matrix_row(
        &mut self,
        source: PixelFormat,
        target: PixelFormat,
        precision: Precision,
        kernel: RowKernelFn,
        bits: u8,
    ) {
        self.insert(
            source,
            target,
            option_kinds(source, target),
            precision,
            "matrix_row",
            KernelRef::Row(kernel),
            Some(bits),
        );
    }

    /// Copies for every single-plane format; 4:2:0 copies live with the repacks.
    fn identities(&mut self) {
        for format in PixelFormat::iter() {
            if format.is_multi_plane() {
                continue;
            }
            if format.is_packed() {
                self.row(format, format, "copy_packed_row", copy_packed_row);
            } else if let Some(kernel) = copy_kernel_for(format.plane_pixel_bytes(0)) {
                self.row(format, format, "copy_row", kernel);
            }
        }
    }

    fn shuffles(&mut self) {
        for (source, target, name, kernel) in shuffle_table() {
            self.row(source, target, name, kernel);
        }

        use PixelFormat::*;
        self.row(RGB24, Y8, "rgb24_to_y8_row", rgb_to_y8_row::<3, 0, 1, 2>);
        self.row(BGR24, Y8, "bgr24_to_y8_row", rgb_to_y8_row::<3, 2, 1, 0>);
        self.row(RGBA32, Y8, "rgba32_to_y8_row", rgb_to_y8_row::<4, 0, 1, 2>);
        self.row(BGRA32, Y8, "bgra32_to_y8_row", rgb_to_y8_row::<4, 2, 1, 0>);
        self.row(YUV24, Y8, "yuv24_to_y8_row", extract_channel_row::<3, 0>);
        self.row(YVU24, Y8, "yvu24_to_y8_row", extract_channel_row::<3, 0>);
    }

    fn casts(&mut self) {
        use PixelFormat::*;
        self.row(Y8, Y16, "cast_row", cast_row::<u8, u16, 1>);
        self.row(Y16, Y8, "cast_row", cast_row::<u16, u8, 1>);
        self.row(Y8, F32, "cast_row", cast_row::<u8, f32, 1>);
        self.row(F32, Y8, "cast_row", cast_row::<f32, u8, 1>);
        self.row(Y16, F32, "cast_row", cast_row::<u16, f32, 1>);
        self.row(F32, Y16, "cast_row", cast_row::<f32, u16, 1>);
        self.row(RGB24, RGB48, "cast_row", cast_row::<u8, u16, 3>);
        self.row(RGB48, RGB24, "cast_row", cast_row::<u16, u8, 3>);
        self.row(RGBA32, RGBA64, "cast_row", cast_row::<u8, u16, 4>);
        self.row(RGBA64, RGBA32, "cast_row", cast_row::<u16, u8, 4>);

        self.row(Y10, Y8, "y10_to_y8_row", y10_to_y8_row);
        self.row(Y8, Y10, "y8_to_y10_row", y8_to_y10_row);
        self.row(Y10, Y16, "y10_to_y16_row", y10_to_y16_row);
        self.row(Y16, Y10, "y16_to_y10_row", y16_to_y10_row);
    }

    /// Single-plane color matrices; YUV24 and YVU24 hold full-range values.
    fn matrices(&mut self) {
        use PixelFormat::*;
        use Precision::*;

        self.matrix_row(RGB24, YUV24, Precise, matrix_row::<RgbToYuvFull7, 0, 1, 2, 0, 1, 2>, 7);
        self.matrix_row(RGB24, YVU24, Precise, matrix_row::<RgbToYuvFull7, 0, 1, 2, 0, 2, 1>, 7);
        self.matrix_row(BGR24, YUV24, Precise, matrix_row::<RgbToYuvFull7, 2, 1, 0, 0, 1, 2>, 7);
        self.matrix_row(BGR24, YVU24, Precise, matrix_row::<RgbToYuvFull7, 2, 1, 0, 0, 2, 1>, 7);

        self.matrix_row(YUV24, RGB24, Precise, matrix_row::<YuvFullToRgb10, 0, 1, 2, 0, 1, 2>, 10);
        self.matrix_row(YUV24, BGR24, Precise, matrix_row::<YuvFullToRgb10, 0, 1, 2, 2, 1, 0>, 10);
        self.matrix_row(YVU24, RGB24, Precise, matrix_row::<YuvFullToRgb10, 0, 2, 1, 0, 1, 2>, 10);
        self.matrix_row(YVU24, BGR24, Precise, matrix_row::<YuvFullToRgb10, 0, 2, 1, 2, 1, 0>, 10);

        self.matrix_row(YUV24, RGB24, Approximate, matrix_row::<YuvFullToRgb6, 0, 1, 2, 0, 1, 2>, 6);
        self.matrix_row(YUV24, BGR24, Approximate, matrix_row::<YuvFullToRgb6, 0, 1, 2, 2, 1, 0>, 6);
        self.matrix_row(YVU24, RGB24, Approximate, matrix_row::<YuvFullToRgb6, 0, 2, 1, 0, 1, 2>, 6);
        self.matrix_row(YVU24, BGR24, Approximate, matrix_row::<YuvFullToRgb6, 0, 2, 1, 2, 1, 0>, 6);

        // 4-channel targets only exist with the 6-bit Android factors
        self.matrix_row(YUV24, RGBA32, Precise, matrix_alpha_row::<YuvAndroidToRgb6, 0, 1, 2, 0, 1, 2>, 6);
        self.matrix_row(YUV24, BGRA32, Precise, matrix_alpha_row::<YuvAndroidToRgb6, 0, 1, 2, 2, 1, 0>, 6);
        self.matrix_row(YVU24, RGBA32, Precise, matrix_alpha_row::<YuvAndroidToRgb6, 0, 2, 1, 0, 1, 2>, 6);
        self.matrix_row(YVU24, BGRA32, Precise, matrix_alpha_row::<YuvAndroidToRgb6, 0, 2, 1, 2, 1, 0>, 6);
    }

    fn planar(&mut self) {
        use PixelFormat::*;

        // 4:2:0 -> RGB, precise and approximate tier per source layout and range
        macro_rules! yuv420_to_rgb {
            (@tier $source:ident, $layout:ident, $precision:ident, $m:ty, $rows:expr, $bits:expr) => {
                self.yuv420_to_rgb_tier(
                    $source,
                    Precision::$precision,
                    [
                        yuv420_to_rgb::<$m, $layout, 0, 1, 2, 3>,
                        yuv420_to_rgb::<$m, $layout, 2, 1, 0, 3>,
                        yuv420_to_rgb::<$m, $layout, 0, 1, 2, 4>,
                        yuv420_to_rgb::<$m, $layout, 2, 1, 0, 4>,
                    ],
                    $rows,
                    $bits,
                );
            };
            ($source:ident, $layout:ident, [$pm:ty, $prows:expr, $pbits:expr], [$am:ty, $arows:expr, $abits:expr]) => {
                yuv420_to_rgb!(@tier $source, $layout, Precise, $pm, $prows, $pbits);
                yuv420_to_rgb!(@tier $source, $layout, Approximate, $am, $arows, $abits);
            };
        }

        yuv420_to_rgb!(Y_UV12, UV, [YuvLimitedToRgb10, 1, 10], [YuvLimitedToRgb6, 2, 6]);
        yuv420_to_rgb!(Y_VU12, VU, [YuvLimitedToRgb10, 1, 10], [YuvLimitedToRgb6, 2, 6]);
        yuv420_to_rgb!(Y_U_V12, U_V, [YuvLimitedToRgb13, 2, 13], [YuvLimitedToRgb6, 2, 6]);
        yuv420_to_rgb!(Y_V_U12, V_U, [YuvLimitedToRgb13, 2, 13], [YuvLimitedToRgb8, 2, 8]);
        yuv420_to_rgb!(Y_UV12_FULL_RANGE, UV, [YuvFullToRgb10, 2, 10], [YuvFullToRgb6, 2, 6]);
        yuv420_to_rgb!(Y_VU12_FULL_RANGE, VU, [YuvAndroidToRgb6, 2, 6], [YuvAndroidToRgb6, 2, 6]);
        yuv420_to_rgb!(Y_U_V12_FULL_RANGE, U_V, [YuvFullToRgb10, 2, 10], [YuvFullToRgb6, 2, 6]);

        // RGB -> 4:2:0
        macro_rules! rgb_to_yuv420 {
            ($($target:ident: $layout:ident, $m:ty;)+) => {
                $(
                    self.multi_row(RGB24, $target, &[OptionsKind::Default], Precision::Precise,
                        "rgb_to_yuv420", rgb_to_yuv420::<$m, $layout, 0, 1, 2, 3>, 2, Some(7));
                    self.multi_row(BGR24, $target, &[OptionsKind::Default], Precision::Precise,
                        "rgb_to_yuv420", rgb_to_yuv420::<$m, $layout, 2, 1, 0, 3>, 2, Some(7));
                )+
            };
        }

        rgb_to_yuv420! {
            Y_UV12: UV, RgbToYuvLimited7;
            Y_VU12: VU, RgbToYuvLimited7;
            Y_U_V12: U_V, RgbToYuvLimited7;
            Y_V_U12: V_U, RgbToYuvLimited7;
            Y_UV12_FULL_RANGE: UV, RgbToYuvFull7;
            Y_VU12_FULL_RANGE: VU, RgbToYuvFull7;
            Y_U_V12_FULL_RANGE: U_V, RgbToYuvFull7;
        }

        // 4:2:0 -> YUV24, YVU24, Y8
        macro_rules! yuv420_maps {
            ($($source:ident: $layout:ident;)+) => {
                $(
                    self.multi_row($source, YUV24, &[OptionsKind::Default], Precision::Precise,
                        "yuv420_to_yuv444", yuv420_to_yuv444::<$layout, false>, 2, None);
                    self.multi_row($source, YVU24, &[OptionsKind::Default], Precision::Precise,
                        "yuv420_to_yuv444", yuv420_to_yuv444::<$layout, true>, 2, None);
                    self.multi_row($source, Y8, &[OptionsKind::Default], Precision::Precise,
                        "yuv420_luma_to_y8", yuv420_luma_to_y8, 2, None);
                )+
            };
        }

        // YUV24, YVU24 -> 4:2:0 layouts
        macro_rules! yuv444_to_yuv420 {
            ($($target:ident: $layout:ident;)+) => {
                $(
                    self.multi_row(YUV24, $target, &[OptionsKind::Default], Precision::Precise,
                        "yuv444_to_yuv420", yuv444_to_yuv420::<$layout, false>, 2, None);
                    self.multi_row(YVU24, $target, &[OptionsKind::Default], Precision::Precise,
                        "yuv444_to_yuv420", yuv444_to_yuv420::<$layout, true>, 2, None);
                )+
            };
        }

        yuv444_to_yuv420! {
            Y_UV12: UV;
            Y_U_V12: U_V;
        }

        yuv420_maps! {
            Y_UV12: UV;
            Y_VU12: VU;
            Y_U_V12: U_V;
            Y_V_U12: V_U;
            Y_UV12_FULL_RANGE: UV;
            Y_VU12_FULL_RANGE: VU;
            Y_U_V12_FULL_RANGE: U_V;
        }

        // Layout changes within one range, including the identity
        macro_rules! repack {
            ($(($source:ident: $sl:ident) => [$($target:ident: $tl:ident),+];)+) => {
                $($(
                    self.multi_row($source, $target, &[OptionsKind::Default], Precision::Precise,
                        "repack_yuv420", repack_yuv420::<$sl, $tl>, 2, None);
                )+)+
            };
        }

        repack! {
            (Y_UV12: UV) => [Y_UV12: UV, Y_VU12: VU, Y_U_V12: U_V, Y_V_U12: V_U];
            (Y_VU12: VU) => [Y_UV12: UV, Y_VU12: VU, Y_U_V12: U_V, Y_V_U12: V_U];
            (Y_U_V12: U_V) => [Y_UV12: UV, Y_VU12: VU, Y_U_V12: U_V, Y_V_U12: V_U];
            (Y_V_U12: V_U) => [Y_UV12: UV, Y_VU12: VU, Y_U_V12: U_V, Y_V_U12: V_U];
            (Y_UV12_FULL_RANGE: UV) => [
                Y_UV12_FULL_RANGE: UV, Y_VU12_FULL_RANGE: VU, Y_U_V12_FULL_RANGE: U_V
            ];
            (Y_VU12_FULL_RANGE: VU) => [
                Y_UV12_FULL_RANGE: UV, Y_VU12_FULL_RANGE: VU, Y_U_V12_FULL_RANGE: U_V
            ];
            (Y_U_V12_FULL_RANGE: U_V) => [
                Y_UV12_FULL_RANGE: UV, Y_VU12_FULL_RANGE: VU, Y_U_V12_FULL_RANGE: U_V
            ];
        }
    }

    /// Registers one tier of a 4:2:0 source for RGB24, BGR24, RGBA32 and BGRA32.
    fn yuv420_to_rgb_tier(
        &mut self,
        source: PixelFormat,
        precision: Precision,
        kernels: [MultiRowKernelFn; 4],
        rows_per_iteration: usize,
        bits: u8,
    ) {
        let targets = [
            PixelFormat::RGB24,
            PixelFormat::BGR24,
            PixelFormat::RGBA32,
            PixelFormat::BGRA32,
        ];
        for (target, kernel) in targets.into_iter().zip(kernels) {
            self.multi_row(
                source,
                target,
                option_kinds(source, target),
                precision,
                "yuv420_to_rgb",
                kernel,
                rows_per_iteration,
                Some(bits),
            );
        }
    }

    fn packed(&mut self) {
        use PixelFormat::*;

        self.insert(
            Y10_PACKED,
            Y8,
            &[OptionsKind::Default, OptionsKind::GammaCorrection],
            Precision::Precise,
            "y10_packed_to_y8_row",
            KernelRef::Row(y10_packed_to_y8_row),
            None,
        );
        self.insert(
            Y10_PACKED,
            Y8,
            &[OptionsKind::GammaCorrection],
            Precision::Approximate,
            "y10_packed_to_y8_approximated_row",
            KernelRef::Row(y10_packed_to_y8_approximated_row),
            None,
        );
        self.row(Y10_PACKED, Y10, "y10_packed_to_y10_row", y10_packed_to_y10_row);
        self.row(Y10_PACKED, RGB24, "y10_packed_to_yyy24_row", y10_packed_to_yyy24_row);
        self.row(Y10_PACKED, BGR24, "y10_packed_to_yyy24_row", y10_packed_to_yyy24_row);

        macro_rules! bayer {
            ($($source:ident => $target:ident: <$rggb:literal, $r:literal, $g:literal, $b:literal>;)+) => {
                $(
                    self.multi_row($source, $target, &[OptionsKind::Default], Precision::Precise,
                        "bayer_to_rgb", bayer_to_rgb::<$rggb, $r, $g, $b>, 2, None);
                    self.multi_row($source, $target, &[OptionsKind::BlackLevelWhiteBalanceGamma],
                        Precision::Precise, "bayer_to_rgb_advanced",
                        bayer_to_rgb_advanced::<$rggb, $r, $g, $b>, 2, None);
                )+
            };
        }

        bayer! {
            RGGB10_PACKED => RGB24: <true, 0, 1, 2>;
            RGGB10_PACKED => BGR24: <true, 2, 1, 0>;
            BGGR10_PACKED => RGB24: <false, 0, 1, 2>;
            BGGR10_PACKED => BGR24: <false, 2, 1, 0>;
        }
    }
}
