use serde::{Deserialize, Serialize};

use super::error::TessellationError;
use crate::geom::Tolerance;

/// Limits applied to every pattern build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Upper bound on the estimated cell count of a single pattern call.
    pub max_cells: usize,
    /// Collapse threshold for the length and area triangulations.
    pub tolerance: Tolerance,
}

impl GridOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_cells: 1_000_000,
            tolerance: Tolerance::LOOSE,
        }
    }

    #[must_use]
    pub const fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Tolerances for the curve-building render modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub interpolation_tolerance: f64,
    pub geodesic_tolerance: f64,
}

impl RenderOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interpolation_tolerance: 0.1,
            geodesic_tolerance: 1.0,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Which cells of a diamond or hexagon pattern are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeFilter {
    #[default]
    All,
    InteriorOnly,
    EdgesOnly,
}

impl EdgeFilter {
    #[must_use]
    pub const fn interior(self) -> bool {
        matches!(self, Self::All | Self::InteriorOnly)
    }

    #[must_use]
    pub const fn edges(self) -> bool {
        matches!(self, Self::All | Self::EdgesOnly)
    }
}

/// How each quad of a basic grid picks its diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangulationStyle {
    /// Same diagonal everywhere.
    #[default]
    Basic,
    /// Diagonal alternates per row.
    Wave,
    /// Checkerboard alternation.
    Cross,
    /// Alternates per column on odd rows only.
    Ring,
    /// Cuts the shorter diagonal on the surface.
    Length,
    /// Picks the split with the smaller summed triangle area.
    Area,
}

/// Hexagon to triangle split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexTriStrategy {
    /// Four triangles sharing corner 2.
    #[default]
    Side,
    /// Six triangles fanned around the midpoint of corners 2 and 5.
    Center,
}

/// Closed interval that random increments are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomDomain {
    pub min: f64,
    pub max: f64,
}

impl RandomDomain {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub(crate) fn validate(self, operation: &'static str) -> Result<Self, TessellationError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TessellationError::parameter(
                operation,
                "domain",
                "bounds must be finite",
            ));
        }
        if self.min >= self.max {
            return Err(TessellationError::parameter(
                operation,
                "domain",
                format!("min {} must be below max {}", self.min, self.max),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }
}

impl Default for RandomDomain {
    fn default() -> Self {
        Self::new(0.25, 0.75)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_filter_maps_to_interior_and_edges() {
        assert!(EdgeFilter::All.interior() && EdgeFilter::All.edges());
        assert!(EdgeFilter::InteriorOnly.interior() && !EdgeFilter::InteriorOnly.edges());
        assert!(!EdgeFilter::EdgesOnly.interior() && EdgeFilter::EdgesOnly.edges());
    }

    #[test]
    fn random_domain_rejects_empty_and_non_finite() {
        assert!(RandomDomain::new(0.5, 0.5).validate("test").is_err());
        assert!(RandomDomain::new(f64::NAN, 1.0).validate("test").is_err());
        assert!(RandomDomain::new(0.2, 0.4).validate("test").is_ok());
        assert_eq!(RandomDomain::new(0.2, 0.4).clamp(0.9), 0.4);
    }

    #[test]
    fn defaults_match_documented_values() {
        let grid = GridOptions::default();
        assert_eq!(grid.max_cells, 1_000_000);
        let render = RenderOptions::default();
        assert_eq!(render.interpolation_tolerance, 0.1);
        assert_eq!(render.geodesic_tolerance, 1.0);
    }
}
