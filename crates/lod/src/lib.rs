//! Quadtree LOD: view-dependent subdivision of a square ocean/terrain domain.
//!
//! # Invariants
//! - The node list is rebuilt wholesale every frame; nodes refer to each
//!   other only by index into it.
//! - Children are stored before their parent, so the last node is the root.
//! - Every stored node is visible, and is either a leaf or has a child.
//! - Leaf LOD stays within `[0, lod_count - 2]`.
//!
//! # Frame flow
//! The host calls [`QuadTree::rebuild`] with the current camera, then walks
//! the leaves with [`QuadTree::traverse`] and asks
//! [`QuadTree::find_subset_pattern`] which stitched index buffer
//! ([`PatchLibrary`]) each leaf should be drawn with.

mod config;
mod coverage;
mod node;
mod patch;
mod quadtree;
mod stats;
mod stitch;

pub use config::{ConfigError, QuadTreeConfig};
pub use coverage::{COVERAGE_SAMPLES, calculate_coverage};
pub use node::{Node, NodeIndex};
pub use patch::{PatchIndices, PatchLibrary};
pub use quadtree::QuadTree;
pub use stats::BuildStats;
pub use stitch::{Edge, StitchPattern};

pub fn crate_info() -> &'static str {
    "seascape-lod v0.1.0"
}
