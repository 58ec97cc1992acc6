// Pixel formats
pub use crate::common::{ElementType, FormatDesc, PixelFormat, PlaneDesc};

// Error handling
pub use crate::common::{Error, Result};

// Storage
pub use crate::common::AlignedBytes;

// Frames
pub use crate::frame::{Frame, FrameType, PixelOrigin, Plane, PlaneLayout, Timestamp};

// Conversion
pub use crate::conversion::{
    registry, ConversionFlag, DispatchConfig, FrameConverter, KernelArity, Options, OptionsKind,
    OptionsVariant, Precision, Worker,
};
