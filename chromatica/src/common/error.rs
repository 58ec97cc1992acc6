use crate::common::PixelFormat;
use crate::conversion::OptionsKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported conversion from {from} to {to} with {options} options")]
    UnsupportedConversion {
        from: PixelFormat,
        to: PixelFormat,
        options: OptionsKind,
    },
    #[error("invalid buffer geometry: {0}")]
    InvalidBufferGeometry(String),
    #[error("invalid conversion options: {0}")]
    InvalidOptions(String),
    #[error("frame references read-only memory")]
    ReadOnlyFrame,
    #[error("invalid dispatch config: {0}")]
    InvalidConfig(String),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
