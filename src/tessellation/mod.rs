//! Parameter-space tessellation of surfaces.
//!
//! A [`Grid`] lays out cells ([`IsoFace`]) in the unit parameter square of a
//! surface and renders them to curves or patches through a
//! [`SurfaceEvaluator`]. Pattern construction never touches 3D geometry
//! beyond iso-curve divisions.

mod diamonds;
mod direction;
mod error;
mod evaluator;
mod grid;
mod hexagons;
mod iso_face;
mod kernel;
mod options;
mod pattern;
mod quads;
mod random;
mod triangles;

pub use direction::SurfaceDirection;
pub use error::TessellationError;
pub use evaluator::SurfaceEvaluator;
pub use grid::{FaceMap, Grid, RenderMode, RenderOutput};
pub use iso_face::IsoFace;
pub use kernel::{KernelOptions, KernelPatch, SurfaceKernel};
pub use options::{
    EdgeFilter, GridOptions, HexTriStrategy, RandomDomain, RenderOptions, TriangulationStyle,
};
pub use pattern::{Layout, PATTERN_NAMES, Pattern};
pub use random::{random_list, random_steps, repeat_cyclic, seeded_rng};

#[cfg(test)]
mod tests;
