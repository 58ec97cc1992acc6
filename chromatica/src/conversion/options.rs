use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Alpha written when the target gains an alpha channel the source lacks.
pub const DEFAULT_ALPHA: u8 = 0xFF;

/// Black levels are 10-bit sensor values.
pub const MAX_BLACK_LEVEL: u16 = 1024;

/// Exclusive upper bound of every white-balance factor.
pub const MAX_WHITE_BALANCE: f32 = 16.0;

/// The registry-visible part of [`Options`].
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
pub enum OptionsKind {
    Default,
    AlphaChannelTargetValue,
    GammaCorrection,
    BlackLevelWhiteBalanceGamma,
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum OptionsVariant {
    Default,
    AlphaChannelTargetValue(u8),
    /// Gamma in (0, 2) applied to 10-bit input.
    GammaCorrection(f32),
    /// Raw sensor pipeline: subtract `black_level`, scale each channel by its
    /// white-balance factor (red, green, blue), then gamma encode.
    BlackLevelWhiteBalanceGamma {
        black_level: u16,
        white_balance: [f32; 3],
        gamma: f32,
    },
}

/// Per-call conversion options.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Options {
    variant: OptionsVariant,
    allow_approximation: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            variant: OptionsVariant::Default,
            allow_approximation: false,
        }
    }
}

impl Options {
    pub fn new(variant: OptionsVariant) -> Self {
        Self {
            variant,
            allow_approximation: false,
        }
    }

    pub fn alpha_channel_target_value(alpha: u8) -> Self {
        Self::new(OptionsVariant::AlphaChannelTargetValue(alpha))
    }

    pub fn gamma_correction(gamma: f32) -> Self {
        Self::new(OptionsVariant::GammaCorrection(gamma))
    }

    pub fn black_level_white_balance_gamma(
        black_level: u16,
        white_balance: [f32; 3],
        gamma: f32,
    ) -> Self {
        Self::new(OptionsVariant::BlackLevelWhiteBalanceGamma {
            black_level,
            white_balance,
            gamma,
        })
    }

    /// Allows kernels trading precision for speed.
    pub fn with_approximation(mut self, allow: bool) -> Self {
        self.allow_approximation = allow;
        self
    }

    #[inline]
    pub fn variant(&self) -> &OptionsVariant {
        &self.variant
    }

    #[inline]
    pub fn allow_approximation(&self) -> bool {
        self.allow_approximation
    }

    pub fn kind(&self) -> OptionsKind {
        match self.variant {
            OptionsVariant::Default => OptionsKind::Default,
            OptionsVariant::AlphaChannelTargetValue(_) => OptionsKind::AlphaChannelTargetValue,
            OptionsVariant::GammaCorrection(_) => OptionsKind::GammaCorrection,
            OptionsVariant::BlackLevelWhiteBalanceGamma { .. } => {
                OptionsKind::BlackLevelWhiteBalanceGamma
            }
        }
    }

    pub fn alpha_value(&self) -> u8 {
        match self.variant {
            OptionsVariant::AlphaChannelTargetValue(alpha) => alpha,
            _ => DEFAULT_ALPHA,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.variant {
            OptionsVariant::Default | OptionsVariant::AlphaChannelTargetValue(_) => Ok(()),
            OptionsVariant::GammaCorrection(gamma) => validate_gamma(gamma),
            OptionsVariant::BlackLevelWhiteBalanceGamma {
                black_level,
                white_balance,
                gamma,
            } => {
                if black_level >= MAX_BLACK_LEVEL {
                    return Err(Error::InvalidOptions(format!(
                        "black level {black_level} outside [0, {MAX_BLACK_LEVEL})"
                    )));
                }
                for factor in white_balance {
                    if !factor.is_finite() || !(0.0..MAX_WHITE_BALANCE).contains(&factor) {
                        return Err(Error::InvalidOptions(format!(
                            "white balance {factor} outside [0, {MAX_WHITE_BALANCE})"
                        )));
                    }
                }
                validate_gamma(gamma)
            }
        }
    }
}

fn validate_gamma(gamma: f32) -> Result<()> {
    if gamma.is_finite() && gamma > 0.0 && gamma < 2.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions(format!(
            "gamma {gamma} outside (0, 2)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(Options::default().kind(), OptionsKind::Default);
        assert_eq!(
            Options::alpha_channel_target_value(7).kind(),
            OptionsKind::AlphaChannelTargetValue
        );
        assert_eq!(Options::gamma_correction(1.0).kind(), OptionsKind::GammaCorrection);
        assert_eq!(
            Options::black_level_white_balance_gamma(0, [1.0; 3], 1.0).kind(),
            OptionsKind::BlackLevelWhiteBalanceGamma
        );
    }

    #[test]
    fn alpha_defaults_to_opaque() {
        assert_eq!(Options::default().alpha_value(), 0xFF);
        assert_eq!(Options::alpha_channel_target_value(0x40).alpha_value(), 0x40);
    }

    #[test]
    fn approximation_bit_is_independent() {
        let options = Options::gamma_correction(0.5).with_approximation(true);
        assert!(options.allow_approximation());
        assert_eq!(options.kind(), OptionsKind::GammaCorrection);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert!(Options::gamma_correction(0.0).validate().is_err());
        assert!(Options::gamma_correction(2.0).validate().is_err());
        assert!(Options::gamma_correction(f32::NAN).validate().is_err());
        assert!(Options::gamma_correction(1.99).validate().is_ok());
        assert!(Options::black_level_white_balance_gamma(1024, [1.0; 3], 1.0)
            .validate()
            .is_err());
        assert!(Options::black_level_white_balance_gamma(64, [1.0, -0.1, 1.0], 1.0)
            .validate()
            .is_err());
        assert!(Options::black_level_white_balance_gamma(64, [1.0, 16.0, 1.0], 1.0)
            .validate()
            .is_err());
        assert!(Options::black_level_white_balance_gamma(64, [1.5, 1.0, 2.2], 0.8)
            .validate()
            .is_ok());
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(
            OptionsKind::BlackLevelWhiteBalanceGamma.to_string(),
            "black_level_white_balance_gamma"
        );
    }
}
