//! Frame and plane model shared by every conversion.

mod plane;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::common::{AlignedBytes, Error, PixelFormat, Result};

pub use plane::{Plane, PlaneLayout};

/// Whether row 0 is the top or the bottom of the image.
#[derive(
    Debug,
    Default,
    Hash,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum PixelOrigin {
    #[default]
    UpperLeft,
    LowerLeft,
}

/// Opaque capture time carried through conversions untouched.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Timestamp(Option<f64>);

impl Timestamp {
    pub fn new(seconds: f64) -> Self {
        Self(Some(seconds))
    }

    pub fn seconds(&self) -> Option<f64> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }
}

/// Frame geometry and encoding.
///
/// A `FrameType` only exists with dimensions its pixel format can represent.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct FrameType {
    width: u32,
    height: u32,
    format: PixelFormat,
    origin: PixelOrigin,
}

impl FrameType {
    pub fn new(width: u32, height: u32, format: PixelFormat, origin: PixelOrigin) -> Result<Self> {
        format.validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            format,
            origin,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn origin(&self) -> PixelOrigin {
        self.origin
    }

    /// Same size and origin with another format.
    pub fn with_format(&self, format: PixelFormat) -> Result<Self> {
        Self::new(self.width, self.height, format, self.origin)
    }

    pub fn with_origin(&self, origin: PixelOrigin) -> Self {
        Self { origin, ..*self }
    }

    pub fn plane_count(&self) -> usize {
        self.format.plane_count()
    }

    pub fn plane_layout(&self, plane: usize) -> PlaneLayout {
        PlaneLayout {
            width: self.format.plane_width(plane, self.width),
            height: self.format.plane_height(plane, self.height),
            channels: self.format.plane_channels(plane),
            element: self.format.element_type(),
        }
    }
}

/// An image buffer of one or more planes.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    frame_type: FrameType,
    planes: Vec<Plane<'a>>,
    timestamp: Timestamp,
}

impl Frame<'static> {
    /// Owned, zero-filled frame without padding.
    pub fn new(frame_type: FrameType) -> Self {
        let planes = (0..frame_type.plane_count())
            .map(|plane| Plane::new_owned(frame_type.plane_layout(plane), 0))
            .collect();
        Self {
            frame_type,
            planes,
            timestamp: Timestamp::default(),
        }
    }

    /// Owned, zero-filled frame with per-plane padding elements.
    pub fn with_padding(frame_type: FrameType, padding_elements: &[u32]) -> Result<Self> {
        check_plane_count(&frame_type, padding_elements.len())?;
        let planes = padding_elements
            .iter()
            .enumerate()
            .map(|(plane, &padding)| Plane::new_owned(frame_type.plane_layout(plane), padding))
            .collect();
        Ok(Self {
            frame_type,
            planes,
            timestamp: Timestamp::default(),
        })
    }

    /// Owned frame taking over the given plane bytes.
    pub fn from_planes(
        frame_type: FrameType,
        planes: Vec<Vec<u8>>,
        padding_elements: &[u32],
    ) -> Result<Self> {
        check_plane_count(&frame_type, planes.len())?;
        check_plane_count(&frame_type, padding_elements.len())?;
        let planes = planes
            .into_iter()
            .zip(padding_elements)
            .enumerate()
            .map(|(plane, (bytes, &padding))| {
                Plane::from_owned(
                    frame_type.plane_layout(plane),
                    padding,
                    AlignedBytes::from_vec(bytes),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            frame_type,
            planes,
            timestamp: Timestamp::default(),
        })
    }
}

impl<'a> Frame<'a> {
    /// Frame referencing external memory read-only.
    pub fn from_borrowed(
        frame_type: FrameType,
        planes: &[&'a [u8]],
        padding_elements: &[u32],
    ) -> Result<Self> {
        check_plane_count(&frame_type, planes.len())?;
        check_plane_count(&frame_type, padding_elements.len())?;
        let planes = planes
            .iter()
            .zip(padding_elements)
            .enumerate()
            .map(|(plane, (&bytes, &padding))| {
                Plane::from_borrowed(frame_type.plane_layout(plane), padding, bytes)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            frame_type,
            planes,
            timestamp: Timestamp::default(),
        })
    }

    #[inline]
    pub fn frame_type(&self) -> &FrameType {
        &self.frame_type
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.frame_type.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.frame_type.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.frame_type.format
    }

    #[inline]
    pub fn origin(&self) -> PixelOrigin {
        self.frame_type.origin
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Reinterprets the rows under another origin without moving pixels.
    pub fn with_origin(mut self, origin: PixelOrigin) -> Self {
        self.frame_type = self.frame_type.with_origin(origin);
        self
    }

    #[inline]
    pub fn planes(&self) -> &[Plane<'a>] {
        &self.planes
    }

    #[inline]
    pub fn plane(&self, index: usize) -> &Plane<'a> {
        &self.planes[index]
    }

    /// Mutable bytes of one plane, `None` when the plane is read-only.
    pub fn plane_bytes_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.planes[index].bytes_mut()
    }

    /// Mutable bytes of all planes at once, `None` if any plane is read-only.
    pub(crate) fn all_plane_bytes_mut(&mut self) -> Option<Vec<&mut [u8]>> {
        self.planes.iter_mut().map(Plane::bytes_mut).collect()
    }

    /// Whether every plane owns its memory.
    pub fn is_owned(&self) -> bool {
        self.planes.iter().all(Plane::is_owned)
    }

    pub fn is_read_only(&self) -> bool {
        !self.is_owned()
    }

    /// A read-only view sharing this frame's memory.
    pub fn view(&self) -> Frame<'_> {
        Frame {
            frame_type: self.frame_type,
            planes: self.planes.iter().map(Plane::view).collect(),
            timestamp: self.timestamp,
        }
    }

    /// Takes ownership, copying any referenced planes.
    pub fn into_owned(self) -> Frame<'static> {
        Frame {
            frame_type: self.frame_type,
            planes: self.planes.into_iter().map(Plane::into_owned).collect(),
            timestamp: self.timestamp,
        }
    }

    /// Owned copy with padding removed.
    pub fn copy_compact(&self) -> Frame<'static> {
        Frame {
            frame_type: self.frame_type,
            planes: self.planes.iter().map(Plane::copy_compact).collect(),
            timestamp: self.timestamp,
        }
    }

    /// Same type and same pixel values, padding ignored.
    pub fn pixels_equal(&self, other: &Frame<'_>) -> bool {
        self.frame_type == other.frame_type
            && self
                .planes
                .iter()
                .zip(&other.planes)
                .all(|(a, b)| a.pixels_equal(b))
    }

    /// Checks plane count and per-plane layout against the frame type.
    pub fn validate(&self) -> Result<()> {
        check_plane_count(&self.frame_type, self.planes.len())?;
        for (index, plane) in self.planes.iter().enumerate() {
            let expected = self.frame_type.plane_layout(index);
            if *plane.layout() != expected {
                return Err(Error::InvalidBufferGeometry(format!(
                    "plane {index} layout {:?} does not match {:?}",
                    plane.layout(),
                    expected
                )));
            }
            let required = plane.stride_bytes() * expected.height as usize;
            if plane.bytes().len() < required {
                return Err(Error::InvalidBufferGeometry(format!(
                    "plane {index} holds {} bytes, {required} required",
                    plane.bytes().len()
                )));
            }
        }
        Ok(())
    }
}

fn check_plane_count(frame_type: &FrameType, count: usize) -> Result<()> {
    if count != frame_type.plane_count() {
        return Err(Error::InvalidBufferGeometry(format!(
            "{} expects {} planes, got {count}",
            frame_type.format,
            frame_type.plane_count()
        )));
    }
    Ok(())
}
