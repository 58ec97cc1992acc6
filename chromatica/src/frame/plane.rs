use crate::common::{AlignedBytes, ElementType, Error, Result};

/// Geometry of one plane, excluding padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneLayout {
    /// Pixels per row (stored bytes for packed formats).
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub element: ElementType,
}

impl PlaneLayout {
    #[inline]
    pub fn row_elements(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_elements() * self.element.size()
    }

    #[inline]
    pub fn pixel_bytes(&self) -> usize {
        self.channels as usize * self.element.size()
    }

    #[inline]
    pub fn stride_bytes(&self, padding_elements: u32) -> usize {
        (self.row_elements() + padding_elements as usize) * self.element.size()
    }
}

#[derive(Debug, Clone)]
enum PlaneData<'a> {
    Owned(AlignedBytes),
    Borrowed(&'a [u8]),
}

/// One memory region of a frame.
///
/// A plane either owns its bytes (and may be written) or references external
/// memory read-only for `'a`.
#[derive(Debug, Clone)]
pub struct Plane<'a> {
    data: PlaneData<'a>,
    layout: PlaneLayout,
    padding_elements: u32,
}

impl<'a> Plane<'a> {
    pub(crate) fn new_owned(layout: PlaneLayout, padding_elements: u32) -> Plane<'static> {
        let len = layout.stride_bytes(padding_elements) * layout.height as usize;
        Plane {
            data: PlaneData::Owned(AlignedBytes::new_zeroed(len)),
            layout,
            padding_elements,
        }
    }

    pub(crate) fn from_owned(
        layout: PlaneLayout,
        padding_elements: u32,
        bytes: AlignedBytes,
    ) -> Result<Plane<'static>> {
        check_length(&layout, padding_elements, bytes.len())?;
        Ok(Plane {
            data: PlaneData::Owned(bytes),
            layout,
            padding_elements,
        })
    }

    pub(crate) fn from_borrowed(
        layout: PlaneLayout,
        padding_elements: u32,
        bytes: &'a [u8],
    ) -> Result<Self> {
        check_length(&layout, padding_elements, bytes.len())?;
        if bytes.as_ptr() as usize % layout.element.size() != 0 {
            return Err(Error::InvalidBufferGeometry(format!(
                "plane memory is not aligned for {} elements",
                layout.element
            )));
        }
        Ok(Self {
            data: PlaneData::Borrowed(bytes),
            layout,
            padding_elements,
        })
    }

    #[inline]
    pub fn layout(&self) -> &PlaneLayout {
        &self.layout
    }

    #[inline]
    pub fn padding_elements(&self) -> u32 {
        self.padding_elements
    }

    #[inline]
    pub fn stride_elements(&self) -> usize {
        self.layout.row_elements() + self.padding_elements as usize
    }

    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.layout.stride_bytes(self.padding_elements)
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.layout.row_bytes()
    }

    /// Whether rows follow each other without padding.
    #[inline]
    pub fn is_continuous(&self) -> bool {
        self.padding_elements == 0
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self.data, PlaneData::Owned(_))
    }

    /// All bytes of the plane, including padding.
    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            PlaneData::Owned(bytes) => bytes.as_slice(),
            PlaneData::Borrowed(bytes) => bytes,
        }
    }

    /// Mutable bytes, `None` for planes referencing external memory.
    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.data {
            PlaneData::Owned(bytes) => Some(bytes.as_mut_slice()),
            PlaneData::Borrowed(_) => None,
        }
    }

    /// Row `y` without padding.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride_bytes();
        &self.bytes()[start..start + self.row_bytes()]
    }

    /// Row `y` reinterpreted as elements of `T`.
    pub fn row_as<T: bytemuck::Pod>(&self, y: usize) -> &[T] {
        bytemuck::cast_slice(self.row(y))
    }

    /// A read-only view of this plane.
    pub fn view(&self) -> Plane<'_> {
        Plane {
            data: PlaneData::Borrowed(self.bytes()),
            layout: self.layout,
            padding_elements: self.padding_elements,
        }
    }

    pub fn into_owned(self) -> Plane<'static> {
        let data = match self.data {
            PlaneData::Owned(bytes) => bytes,
            PlaneData::Borrowed(bytes) => AlignedBytes::from_slice(bytes),
        };
        Plane {
            data: PlaneData::Owned(data),
            layout: self.layout,
            padding_elements: self.padding_elements,
        }
    }

    /// Owned copy without padding.
    pub fn copy_compact(&self) -> Plane<'static> {
        let mut target = Plane::new_owned(self.layout, 0);
        let row_bytes = self.row_bytes();
        if let Some(bytes) = target.bytes_mut() {
            for (y, dst) in bytes.chunks_exact_mut(row_bytes).enumerate() {
                dst.copy_from_slice(self.row(y));
            }
        }
        target
    }

    /// Row-wise equality, ignoring padding.
    pub fn pixels_equal(&self, other: &Plane<'_>) -> bool {
        self.layout == other.layout
            && (0..self.layout.height as usize).all(|y| self.row(y) == other.row(y))
    }
}

fn check_length(layout: &PlaneLayout, padding_elements: u32, len: usize) -> Result<()> {
    let required = layout.stride_bytes(padding_elements) * layout.height as usize;
    if len < required {
        return Err(Error::InvalidBufferGeometry(format!(
            "plane holds {len} bytes, {required} required for {}x{} with {padding_elements} padding elements",
            layout.width, layout.height
        )));
    }
    Ok(())
}
