use serde::{Deserialize, Serialize};

/// Geometric remapping applied while converting.
///
/// Every flag is its own inverse.
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
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversionFlag {
    #[default]
    Normal,
    /// Row order reversed.
    Flipped,
    /// Column order reversed.
    Mirrored,
    /// Rotated by 180 degrees.
    FlippedAndMirrored,
}

impl ConversionFlag {
    pub const ALL: [ConversionFlag; 4] = [
        ConversionFlag::Normal,
        ConversionFlag::Flipped,
        ConversionFlag::Mirrored,
        ConversionFlag::FlippedAndMirrored,
    ];

    pub const fn new(flipped: bool, mirrored: bool) -> Self {
        match (flipped, mirrored) {
            (false, false) => ConversionFlag::Normal,
            (true, false) => ConversionFlag::Flipped,
            (false, true) => ConversionFlag::Mirrored,
            (true, true) => ConversionFlag::FlippedAndMirrored,
        }
    }

    #[inline]
    pub const fn flipped(self) -> bool {
        matches!(
            self,
            ConversionFlag::Flipped | ConversionFlag::FlippedAndMirrored
        )
    }

    #[inline]
    pub const fn mirrored(self) -> bool {
        matches!(
            self,
            ConversionFlag::Mirrored | ConversionFlag::FlippedAndMirrored
        )
    }

    /// Applying `self` then `other`.
    pub const fn combine(self, other: ConversionFlag) -> Self {
        Self::new(
            self.flipped() != other.flipped(),
            self.mirrored() != other.mirrored(),
        )
    }

    /// Source row feeding target row `row`.
    #[inline]
    pub const fn source_row(self, row: usize, height: usize) -> usize {
        if self.flipped() {
            height - 1 - row
        } else {
            row
        }
    }

    /// Source column feeding target column `column`.
    #[inline]
    pub const fn source_column(self, column: usize, width: usize) -> usize {
        if self.mirrored() {
            width - 1 - column
        } else {
            column
        }
    }
}
