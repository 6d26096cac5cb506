//! Shared geometry primitives for the seascape LOD core.
//!
//! Axis-aligned boxes, planes and view frusta. The quadtree builder culls
//! against these; nothing here knows about nodes or patches.

mod aabb;
mod frustum;

pub use aabb::Aabb;
pub use frustum::{Frustum, Intersection, Plane};

pub fn crate_info() -> &'static str {
    "seascape-common v0.1.0"
}
