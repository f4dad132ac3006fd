//! Serializable pattern descriptions and their dispatch onto [`Grid`].

use serde::{Deserialize, Serialize};

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::grid::Grid;
use super::options::{EdgeFilter, HexTriStrategy, RandomDomain, TriangulationStyle};

/// Primary axis and division counts shared by every pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub direction: SurfaceDirection,
    pub count_u: usize,
    pub count_v: usize,
}

impl Layout {
    #[must_use]
    pub const fn new(direction: SurfaceDirection, count_u: usize, count_v: usize) -> Self {
        Self {
            direction,
            count_u,
            count_v,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(SurfaceDirection::U, 4, 4)
    }
}

const fn default_shear() -> f64 {
    0.5
}

const fn default_hex_t() -> f64 {
    0.333
}

const fn default_seed() -> u64 {
    1
}

const fn default_increments() -> usize {
    3
}

fn default_shifts() -> Vec<f64> {
    vec![0.0, 0.5]
}

/// One tessellation algorithm and its parameters.
///
/// Serialized with a `kind` tag; omitted fields take the defaults of
/// [`Pattern::from_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    BasicQuads {
        #[serde(flatten)]
        layout: Layout,
    },
    StaggeredQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_shifts")]
        shifts: Vec<f64>,
    },
    AlternatingQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_shear")]
        shift: f64,
        #[serde(default)]
        flip: bool,
    },
    ShearQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_shear")]
        t: f64,
        #[serde(default)]
        flip: bool,
    },
    ShearQuadsAlt {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_shear")]
        t: f64,
        #[serde(default)]
        flip: bool,
    },
    CairoQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_shear")]
        t: f64,
        #[serde(default)]
        flip: bool,
    },
    RandomQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default)]
        domain: RandomDomain,
    },
    RandomSubQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default)]
        domain: RandomDomain,
        #[serde(default = "default_increments")]
        increment: usize,
    },
    RandomFixedQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default)]
        domain: RandomDomain,
        #[serde(default = "default_increments")]
        increments: usize,
    },
    Triangles {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default)]
        style: TriangulationStyle,
        #[serde(default)]
        flip: bool,
    },
    DenseTriangles {
        #[serde(flatten)]
        layout: Layout,
    },
    StaggeredTriangles {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default)]
        flip: bool,
    },
    DiamondQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
    },
    DiamondTriangles {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
    },
    Hexagons {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_hex_t")]
        t: f64,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
    },
    HexQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_hex_t")]
        t: f64,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
        #[serde(default)]
        shift: usize,
    },
    HexRadialQuads {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_hex_t")]
        t: f64,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
        #[serde(default)]
        shift: usize,
    },
    HexTriangles {
        #[serde(flatten)]
        layout: Layout,
        #[serde(default = "default_hex_t")]
        t: f64,
        #[serde(default)]
        flip: bool,
        #[serde(default)]
        filter: EdgeFilter,
        #[serde(default)]
        strategy: HexTriStrategy,
    },
}

pub const PATTERN_NAMES: [&str; 18] = [
    "basic_quads",
    "staggered_quads",
    "alternating_quads",
    "shear_quads",
    "shear_quads_alt",
    "cairo_quads",
    "random_quads",
    "random_sub_quads",
    "random_fixed_quads",
    "triangles",
    "dense_triangles",
    "staggered_triangles",
    "diamond_quads",
    "diamond_triangles",
    "hexagons",
    "hex_quads",
    "hex_radial_quads",
    "hex_triangles",
];

impl Pattern {
    /// The pattern called `name` with default parameters on a 4 x 4 layout.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let layout = Layout::default();
        let domain = RandomDomain::default();
        let (t, hex_t, seed) = (default_shear(), default_hex_t(), default_seed());
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Some(match normalized.as_str() {
            "basic_quads" => Self::BasicQuads { layout },
            "staggered_quads" => Self::StaggeredQuads {
                layout,
                shifts: default_shifts(),
            },
            "alternating_quads" => Self::AlternatingQuads {
                layout,
                shift: t,
                flip: false,
            },
            "shear_quads" => Self::ShearQuads { layout, t, flip: false },
            "shear_quads_alt" => Self::ShearQuadsAlt { layout, t, flip: false },
            "cairo_quads" => Self::CairoQuads { layout, t, flip: false },
            "random_quads" => Self::RandomQuads { layout, seed, domain },
            "random_sub_quads" => Self::RandomSubQuads {
                layout,
                seed,
                domain,
                increment: default_increments(),
            },
            "random_fixed_quads" => Self::RandomFixedQuads {
                layout,
                seed,
                domain,
                increments: default_increments(),
            },
            "triangles" => Self::Triangles {
                layout,
                style: TriangulationStyle::Basic,
                flip: false,
            },
            "dense_triangles" => Self::DenseTriangles { layout },
            "staggered_triangles" => Self::StaggeredTriangles { layout, flip: false },
            "diamond_quads" => Self::DiamondQuads {
                layout,
                flip: false,
                filter: EdgeFilter::All,
            },
            "diamond_triangles" => Self::DiamondTriangles {
                layout,
                flip: false,
                filter: EdgeFilter::All,
            },
            "hexagons" => Self::Hexagons {
                layout,
                t: hex_t,
                flip: false,
                filter: EdgeFilter::All,
            },
            "hex_quads" => Self::HexQuads {
                layout,
                t: hex_t,
                flip: false,
                filter: EdgeFilter::All,
                shift: 0,
            },
            "hex_radial_quads" => Self::HexRadialQuads {
                layout,
                t: hex_t,
                flip: false,
                filter: EdgeFilter::All,
                shift: 0,
            },
            "hex_triangles" => Self::HexTriangles {
                layout,
                t: hex_t,
                flip: false,
                filter: EdgeFilter::All,
                strategy: HexTriStrategy::Side,
            },
            _ => return None,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BasicQuads { .. } => "basic_quads",
            Self::StaggeredQuads { .. } => "staggered_quads",
            Self::AlternatingQuads { .. } => "alternating_quads",
            Self::ShearQuads { .. } => "shear_quads",
            Self::ShearQuadsAlt { .. } => "shear_quads_alt",
            Self::CairoQuads { .. } => "cairo_quads",
            Self::RandomQuads { .. } => "random_quads",
            Self::RandomSubQuads { .. } => "random_sub_quads",
            Self::RandomFixedQuads { .. } => "random_fixed_quads",
            Self::Triangles { .. } => "triangles",
            Self::DenseTriangles { .. } => "dense_triangles",
            Self::StaggeredTriangles { .. } => "staggered_triangles",
            Self::DiamondQuads { .. } => "diamond_quads",
            Self::DiamondTriangles { .. } => "diamond_triangles",
            Self::Hexagons { .. } => "hexagons",
            Self::HexQuads { .. } => "hex_quads",
            Self::HexRadialQuads { .. } => "hex_radial_quads",
            Self::HexTriangles { .. } => "hex_triangles",
        }
    }

    #[must_use]
    pub const fn layout(&self) -> Layout {
        match self {
            Self::BasicQuads { layout }
            | Self::StaggeredQuads { layout, .. }
            | Self::AlternatingQuads { layout, .. }
            | Self::ShearQuads { layout, .. }
            | Self::ShearQuadsAlt { layout, .. }
            | Self::CairoQuads { layout, .. }
            | Self::RandomQuads { layout, .. }
            | Self::RandomSubQuads { layout, .. }
            | Self::RandomFixedQuads { layout, .. }
            | Self::Triangles { layout, .. }
            | Self::DenseTriangles { layout }
            | Self::StaggeredTriangles { layout, .. }
            | Self::DiamondQuads { layout, .. }
            | Self::DiamondTriangles { layout, .. }
            | Self::Hexagons { layout, .. }
            | Self::HexQuads { layout, .. }
            | Self::HexRadialQuads { layout, .. }
            | Self::HexTriangles { layout, .. } => *layout,
        }
    }

    /// Same pattern on another layout.
    #[must_use]
    pub fn with_layout(mut self, next: Layout) -> Self {
        match &mut self {
            Self::BasicQuads { layout }
            | Self::StaggeredQuads { layout, .. }
            | Self::AlternatingQuads { layout, .. }
            | Self::ShearQuads { layout, .. }
            | Self::ShearQuadsAlt { layout, .. }
            | Self::CairoQuads { layout, .. }
            | Self::RandomQuads { layout, .. }
            | Self::RandomSubQuads { layout, .. }
            | Self::RandomFixedQuads { layout, .. }
            | Self::Triangles { layout, .. }
            | Self::DenseTriangles { layout }
            | Self::StaggeredTriangles { layout, .. }
            | Self::DiamondQuads { layout, .. }
            | Self::DiamondTriangles { layout, .. }
            | Self::Hexagons { layout, .. }
            | Self::HexQuads { layout, .. }
            | Self::HexRadialQuads { layout, .. }
            | Self::HexTriangles { layout, .. } => *layout = next,
        }
        self
    }

    /// Upper estimate of the number of cells the pattern produces.
    #[must_use]
    pub fn estimated_cells(&self) -> usize {
        let Layout {
            count_u, count_v, ..
        } = self.layout();
        let per_cell = match self {
            Self::BasicQuads { .. } | Self::RandomQuads { .. } => 1,
            Self::StaggeredQuads { .. }
            | Self::AlternatingQuads { .. }
            | Self::ShearQuads { .. }
            | Self::ShearQuadsAlt { .. }
            | Self::Triangles { .. }
            | Self::DiamondQuads { .. }
            | Self::DiamondTriangles { .. }
            | Self::Hexagons { .. } => 2,
            Self::StaggeredTriangles { .. } => 3,
            Self::CairoQuads { .. } | Self::DenseTriangles { .. } | Self::HexQuads { .. } => 4,
            Self::HexRadialQuads { .. } | Self::HexTriangles { .. } => 6,
            Self::RandomSubQuads { increment, .. } => (*increment).max(1),
            Self::RandomFixedQuads { increments, .. } => increments + 1,
        };
        count_u.saturating_mul(count_v).saturating_mul(per_cell)
    }
}

impl<E: SurfaceEvaluator> Grid<E> {
    /// Rebuilds the grid with `pattern`.
    pub fn apply(&mut self, pattern: &Pattern) -> Result<(), TessellationError> {
        let estimated = pattern.estimated_cells();
        let limit = self.options().max_cells;
        if estimated > limit {
            return Err(TessellationError::TooManyCells {
                operation: pattern.name(),
                estimated,
                limit,
            });
        }
        log::debug!("apply {} ({estimated} cells estimated)", pattern.name());

        let Layout {
            direction: d,
            count_u: u,
            count_v: v,
        } = pattern.layout();
        match pattern {
            Pattern::BasicQuads { .. } => self.set_basic_quads(d, u, v),
            Pattern::StaggeredQuads { shifts, .. } => self.set_staggered_quads(d, u, v, shifts),
            Pattern::AlternatingQuads { shift, flip, .. } => {
                self.set_alternating_quads(d, u, v, *shift, *flip)
            }
            Pattern::ShearQuads { t, flip, .. } => self.set_shear_quads(d, u, v, *t, *flip),
            Pattern::ShearQuadsAlt { t, flip, .. } => self.set_shear_quads_alt(d, u, v, *t, *flip),
            Pattern::CairoQuads { t, flip, .. } => self.set_cairo_quads(d, u, v, *t, *flip),
            Pattern::RandomQuads { seed, domain, .. } => {
                self.set_random_quads(d, u, v, *seed, *domain)
            }
            Pattern::RandomSubQuads {
                seed,
                domain,
                increment,
                ..
            } => self.set_random_sub_quads(d, u, v, *seed, *domain, *increment),
            Pattern::RandomFixedQuads {
                seed,
                domain,
                increments,
                ..
            } => self.set_random_fixed_quads(d, u, v, *seed, *domain, *increments),
            Pattern::Triangles { style, flip, .. } => self.set_triangles(d, u, v, *style, *flip),
            Pattern::DenseTriangles { .. } => self.set_dense_triangles(d, u, v),
            Pattern::StaggeredTriangles { flip, .. } => {
                self.set_staggered_triangles(d, u, v, *flip)
            }
            Pattern::DiamondQuads { flip, filter, .. } => {
                self.set_diamond_quads(d, u, v, *flip, *filter)
            }
            Pattern::DiamondTriangles { flip, filter, .. } => {
                self.set_diamond_triangles(d, u, v, *flip, *filter)
            }
            Pattern::Hexagons { t, flip, filter, .. } => {
                self.set_hexagons(d, u, v, *t, *flip, *filter)
            }
            Pattern::HexQuads {
                t,
                flip,
                filter,
                shift,
                ..
            } => self.set_hex_quads(d, u, v, *t, *flip, *filter, *shift),
            Pattern::HexRadialQuads {
                t,
                flip,
                filter,
                shift,
                ..
            } => self.set_hex_radial_quads(d, u, v, *t, *flip, *filter, *shift),
            Pattern::HexTriangles {
                t,
                flip,
                filter,
                strategy,
                ..
            } => self.set_hex_triangles(d, u, v, *t, *flip, *filter, *strategy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_builds_a_pattern_with_that_name() {
        for name in PATTERN_NAMES {
            let pattern = Pattern::from_name(name).unwrap();
            assert_eq!(pattern.name(), name);
            assert_eq!(pattern.layout(), Layout::default());
        }
        assert!(Pattern::from_name("voronoi").is_none());
        assert_eq!(
            Pattern::from_name(" Hex-Quads ").map(|p| p.name()),
            Some("hex_quads")
        );
    }

    #[test]
    fn estimates_scale_with_layout() {
        let pattern = Pattern::from_name("cairo_quads")
            .unwrap()
            .with_layout(Layout::new(SurfaceDirection::V, 3, 5));
        assert_eq!(pattern.estimated_cells(), 60);
        assert_eq!(pattern.layout().direction, SurfaceDirection::V);
    }
}
