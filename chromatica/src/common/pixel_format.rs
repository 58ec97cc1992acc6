use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};

/// Storage type of one channel value.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[repr(u8)]
pub enum ElementType {
    U8 = 1,
    U16 = 2,
    F32 = 4,
}

impl ElementType {
    #[inline]
    pub const fn size(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::U8 => write!(f, "u8"),
            ElementType::U16 => write!(f, "u16"),
            ElementType::F32 => write!(f, "f32"),
        }
    }
}

/// One memory plane of a pixel format.
///
/// `h_sub`/`v_sub` are the subsampling factors relative to the frame size.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct PlaneDesc {
    pub channels: u32,
    pub h_sub: u32,
    pub v_sub: u32,
}

impl PlaneDesc {
    const fn full(channels: u32) -> Self {
        Self {
            channels,
            h_sub: 1,
            v_sub: 1,
        }
    }

    const fn quarter(channels: u32) -> Self {
        Self {
            channels,
            h_sub: 2,
            v_sub: 2,
        }
    }
}

/// Everything the engine needs to know about a pixel format.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct FormatDesc {
    pub element: ElementType,
    pub planes: &'static [PlaneDesc],
    /// Width must be a multiple of this.
    pub width_multiple: u32,
    /// Height must be a multiple of this.
    pub height_multiple: u32,
    /// Four 10-bit samples packed into five bytes.
    pub packed_10bit: bool,
}

const ONE_CHANNEL: &[PlaneDesc] = &[PlaneDesc::full(1)];
const TWO_CHANNELS: &[PlaneDesc] = &[PlaneDesc::full(2)];
const THREE_CHANNELS: &[PlaneDesc] = &[PlaneDesc::full(3)];
const FOUR_CHANNELS: &[PlaneDesc] = &[PlaneDesc::full(4)];
const LUMA_AND_CHROMA: &[PlaneDesc] = &[PlaneDesc::full(1), PlaneDesc::quarter(2)];
const LUMA_AND_TWO_CHROMA: &[PlaneDesc] = &[
    PlaneDesc::full(1),
    PlaneDesc::quarter(1),
    PlaneDesc::quarter(1),
];

/// The closed set of supported pixel formats.
///
/// Formats without a `_FULL_RANGE` suffix in the 4:2:0 family hold
/// limited-range (16..235) luma.
#[allow(non_camel_case_types)]
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
    strum_macros::EnumString,
)]
pub enum PixelFormat {
    Y8,
    Y10,
    Y10_PACKED,
    Y16,
    YA16,
    F32,
    RGB24,
    BGR24,
    RGB32,
    BGR32,
    RGBA32,
    BGRA32,
    ARGB32,
    ABGR32,
    RGB48,
    RGBA64,
    YUV24,
    YVU24,
    Y_UV12,
    Y_VU12,
    Y_U_V12,
    Y_V_U12,
    Y_UV12_FULL_RANGE,
    Y_VU12_FULL_RANGE,
    Y_U_V12_FULL_RANGE,
    RGGB10_PACKED,
    BGGR10_PACKED,
}

impl PixelFormat {
    pub const fn desc(self) -> FormatDesc {
        use PixelFormat::*;

        let (element, planes) = match self {
            Y8 | Y10_PACKED | RGGB10_PACKED | BGGR10_PACKED => (ElementType::U8, ONE_CHANNEL),
            YA16 => (ElementType::U8, TWO_CHANNELS),
            RGB24 | BGR24 | YUV24 | YVU24 => (ElementType::U8, THREE_CHANNELS),
            RGB32 | BGR32 | RGBA32 | BGRA32 | ARGB32 | ABGR32 => {
                (ElementType::U8, FOUR_CHANNELS)
            }
            Y10 | Y16 => (ElementType::U16, ONE_CHANNEL),
            RGB48 => (ElementType::U16, THREE_CHANNELS),
            RGBA64 => (ElementType::U16, FOUR_CHANNELS),
            F32 => (ElementType::F32, ONE_CHANNEL),
            Y_UV12 | Y_VU12 | Y_UV12_FULL_RANGE | Y_VU12_FULL_RANGE => {
                (ElementType::U8, LUMA_AND_CHROMA)
            }
            Y_U_V12 | Y_V_U12 | Y_U_V12_FULL_RANGE => (ElementType::U8, LUMA_AND_TWO_CHROMA),
        };

        let (width_multiple, height_multiple, packed_10bit) = match self {
            Y10_PACKED => (4, 1, true),
            RGGB10_PACKED | BGGR10_PACKED => (4, 2, true),
            Y_UV12 | Y_VU12 | Y_U_V12 | Y_V_U12 | Y_UV12_FULL_RANGE | Y_VU12_FULL_RANGE
            | Y_U_V12_FULL_RANGE => (2, 2, false),
            _ => (1, 1, false),
        };

        FormatDesc {
            element,
            planes,
            width_multiple,
            height_multiple,
            packed_10bit,
        }
    }

    #[inline]
    pub fn element_type(self) -> ElementType {
        self.desc().element
    }

    #[inline]
    pub fn plane_count(self) -> usize {
        self.desc().planes.len()
    }

    #[inline]
    pub fn is_packed(self) -> bool {
        self.desc().packed_10bit
    }

    /// Whether the format is a packed Bayer mosaic; flipping it changes the mosaic phase.
    #[inline]
    pub fn is_bayer(self) -> bool {
        matches!(self, PixelFormat::RGGB10_PACKED | PixelFormat::BGGR10_PACKED)
    }

    /// Whether the format is stored as more than one plane.
    #[inline]
    pub fn is_multi_plane(self) -> bool {
        self.plane_count() > 1
    }

    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::YA16
                | PixelFormat::RGBA32
                | PixelFormat::BGRA32
                | PixelFormat::ARGB32
                | PixelFormat::ABGR32
                | PixelFormat::RGBA64
        )
    }

    /// Channels of the given plane, in elements per pixel.
    ///
    /// Packed formats report one element per stored byte.
    pub fn plane_channels(self, plane: usize) -> u32 {
        self.desc().planes[plane].channels
    }

    /// Pixels (or packed bytes) per row of the given plane.
    pub fn plane_width(self, plane: usize, width: u32) -> u32 {
        let desc = self.desc();
        if desc.packed_10bit {
            width / 4 * 5
        } else {
            width / desc.planes[plane].h_sub
        }
    }

    pub fn plane_height(self, plane: usize, height: u32) -> u32 {
        height / self.desc().planes[plane].v_sub
    }

    /// Bytes one pixel occupies in the given plane.
    pub fn plane_pixel_bytes(self, plane: usize) -> usize {
        self.plane_channels(plane) as usize * self.element_type().size()
    }

    /// Rejects zero sizes and sizes the layout cannot represent.
    pub fn validate_dimensions(self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidBufferGeometry(format!(
                "{self}: zero dimension {width}x{height}"
            )));
        }
        let desc = self.desc();
        if width % desc.width_multiple != 0 || height % desc.height_multiple != 0 {
            return Err(Error::InvalidBufferGeometry(format!(
                "{self}: {width}x{height} is not a multiple of {}x{}",
                desc.width_multiple, desc.height_multiple
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_format_is_well_defined() {
        for format in PixelFormat::iter() {
            let desc = format.desc();
            assert!(!desc.planes.is_empty(), "{format}");
            for plane in desc.planes {
                assert!(plane.channels > 0, "{format}");
                assert!(desc.width_multiple % plane.h_sub == 0, "{format}");
                assert!(desc.height_multiple % plane.v_sub == 0, "{format}");
            }
            format
                .validate_dimensions(desc.width_multiple * 4, desc.height_multiple * 4)
                .unwrap();
        }
    }

    #[test]
    fn nv12_planes() {
        let format = PixelFormat::Y_UV12;
        assert_eq!(format.plane_count(), 2);
        assert_eq!(format.plane_width(0, 640), 640);
        assert_eq!(format.plane_width(1, 640), 320);
        assert_eq!(format.plane_height(1, 480), 240);
        assert_eq!(format.plane_pixel_bytes(1), 2);
    }

    #[test]
    fn packed_row_bytes() {
        assert_eq!(PixelFormat::Y10_PACKED.plane_width(0, 8), 10);
        assert_eq!(PixelFormat::RGGB10_PACKED.plane_width(0, 4), 5);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(PixelFormat::RGB24.validate_dimensions(0, 10).is_err());
        assert!(PixelFormat::Y_UV12.validate_dimensions(3, 2).is_err());
        assert!(PixelFormat::Y_UV12.validate_dimensions(2, 3).is_err());
        assert!(PixelFormat::Y10_PACKED.validate_dimensions(6, 1).is_err());
        assert!(PixelFormat::BGGR10_PACKED.validate_dimensions(4, 1).is_err());
        assert!(PixelFormat::Y8.validate_dimensions(3, 3).is_ok());
    }

    #[test]
    fn display_round_trip() {
        for format in PixelFormat::iter() {
            assert_eq!(PixelFormat::from_str(&format.to_string()).unwrap(), format);
        }
        assert_eq!(PixelFormat::Y_UV12_FULL_RANGE.to_string(), "Y_UV12_FULL_RANGE");
    }

    #[test]
    fn element_sizes() {
        assert_eq!(PixelFormat::RGB48.plane_pixel_bytes(0), 6);
        assert_eq!(PixelFormat::F32.plane_pixel_bytes(0), 4);
        assert_eq!(PixelFormat::RGBA32.plane_pixel_bytes(0), 4);
    }
}
