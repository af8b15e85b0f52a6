//! Aspect-ratio tokens and the dimensions derived from them.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;
use crate::types::Resolution;

/// Aspect ratios offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    Square,
    Landscape16x9,
    Portrait9x16,
    Landscape4x3,
    Portrait3x4,
    Ultrawide21x9,
    Tall9x21,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 7] = [
        Self::Square,
        Self::Landscape16x9,
        Self::Portrait9x16,
        Self::Landscape4x3,
        Self::Portrait3x4,
        Self::Ultrawide21x9,
        Self::Tall9x21,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape16x9 => "16:9",
            Self::Portrait9x16 => "9:16",
            Self::Landscape4x3 => "4:3",
            Self::Portrait3x4 => "3:4",
            Self::Ultrawide21x9 => "21:9",
            Self::Tall9x21 => "9:21",
        }
    }

    /// Dimensions for `base`: the longer side stays at `base`, the shorter
    /// side is scaled and floored.
    pub fn dimensions(&self, base: u32) -> Resolution {
        let scaled = |num: u64, den: u64| (u64::from(base) * num / den) as u32;
        match self {
            Self::Square => Resolution::square(base),
            Self::Landscape16x9 => Resolution::new(base, scaled(9, 16)),
            Self::Portrait9x16 => Resolution::new(scaled(9, 16), base),
            Self::Landscape4x3 => Resolution::new(base, scaled(3, 4)),
            Self::Portrait3x4 => Resolution::new(scaled(3, 4), base),
            Self::Ultrawide21x9 => Resolution::new(base, scaled(9, 21)),
            Self::Tall9x21 => Resolution::new(scaled(9, 21), base),
        }
    }

    /// Option label shown in the aspect-ratio selector.
    pub fn label(token: &str) -> String {
        match token {
            "1:1" => "1:1 (Square)".to_string(),
            "16:9" => "16:9 (Landscape)".to_string(),
            "9:16" => "9:16 (Portrait)".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for AspectRatio {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.token() == s.trim())
            .ok_or_else(|| ClientError::InvalidParameter(format!("Unknown aspect ratio: {s}")))
    }
}

/// Base resolution of existing dimensions (the longer side).
pub fn base_resolution(current: Resolution) -> u32 {
    current.width.max(current.height)
}

/// Dimensions for an aspect-ratio token; unknown tokens yield a square.
pub fn dimensions_from_ratio(token: &str, base: u32) -> Resolution {
    token
        .parse::<AspectRatio>()
        .map(|ratio| ratio.dimensions(base))
        .unwrap_or_else(|_| Resolution::square(base))
}
