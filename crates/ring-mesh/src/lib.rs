//! # ring-mesh
//!
//! Procedural rounded-rectangle ring meshes for UI decoration.
//!
//! This crate builds the geometry only: a closed quad strip around a rounded
//! rectangle with U mapped along the perimeter, optionally fanned into the
//! center. Rendering is handled by separate backend crates like
//! `ring-mesh-wgpu`.

mod color;
mod mesh;
mod outline;
mod primitives;
mod tessellate;

pub use color::*;
pub use mesh::*;
pub use outline::*;
pub use primitives::*;
pub use tessellate::*;
