//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once and is cached. Use these functions instead of the
//! `is_x86_feature_detected!` macro directly to avoid repeated CPUID calls.

use std::sync::OnceLock;

/// CPU feature flags detected once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    pub sse2: bool,
    pub ssse3: bool,
    pub neon: bool,
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Get cached CPU features (detected once on first call).
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(|| CpuFeatures {
        sse2: is_x86_feature_detected!("sse2"),
        ssse3: is_x86_feature_detected!("ssse3"),
        neon: false,
    })
}

/// NEON is mandatory on aarch64.
#[cfg(target_arch = "aarch64")]
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(|| CpuFeatures {
        neon: true,
        ..CpuFeatures::default()
    })
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(CpuFeatures::default)
}

#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}

/// SSSE3 provides `pshufb`, which the byte-shuffle kernels depend on.
#[inline]
pub fn has_ssse3() -> bool {
    get().ssse3
}

#[inline]
pub fn has_neon() -> bool {
    get().neon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_cached() {
        assert_eq!(get(), get());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn x86_64_baseline_has_sse2() {
        assert!(has_sse2());
        assert!(!has_neon());
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn aarch64_has_neon() {
        assert!(has_neon());
        assert!(!has_ssse3());
    }
}
