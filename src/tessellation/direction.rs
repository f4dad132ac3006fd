use serde::{Deserialize, Serialize};

use crate::geom::UvPoint;

/// The parametric axis treated as primary by a pattern.
///
/// Rows of a grid run along the primary axis; each row is divided again along
/// the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceDirection {
    #[default]
    U,
    V,
}

impl SurfaceDirection {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::U => Self::V,
            Self::V => Self::U,
        }
    }

    /// Axis index as used by [`UvPoint::axis`]: `U` is 0, `V` is 1.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::U => 0,
            Self::V => 1,
        }
    }

    #[must_use]
    pub const fn varies_u(self) -> bool {
        matches!(self, Self::U)
    }

    /// Places `primary` on this axis and `secondary` on the other one.
    #[must_use]
    pub const fn compose(self, primary: f64, secondary: f64) -> UvPoint {
        match self {
            Self::U => UvPoint::new(primary, secondary),
            Self::V => UvPoint::new(secondary, primary),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::U => "u",
            Self::V => "v",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "u" | "0" => Some(Self::U),
            "v" | "1" => Some(Self::V),
            _ => None,
        }
    }
}
