mod common;
pub mod conversion;
pub mod frame;

#[cfg(feature = "bench")]
pub mod bench {
    pub use crate::conversion::bench as conversion;
}

pub mod prelude;

pub use prelude::*;
