pub(crate) mod aligned_bytes;
pub(crate) mod error;
pub(crate) mod pixel_format;

pub use aligned_bytes::AlignedBytes;
pub use error::{Error, Result};
pub use pixel_format::{ElementType, FormatDesc, PixelFormat, PlaneDesc};
