//! Rendering Adapter: renderer-agnostic patch drawing over the LOD quadtree.
//!
//! # Invariants
//! - Renderers read the tree; they never rebuild or mutate it.
//! - Every draw carries the stitch pattern of its leaf, resolved against
//!   the same tree it was collected from.
//!
//! # Frame flow
//! Build matrices from a [`RenderView`], rebuild the tree, then hand the
//! tree to a [`Renderer`]. [`collect_draws`] is the shared leaf walk.

mod renderer;
mod view;

pub use renderer::{DebugTextRenderer, PatchDraw, Renderer, collect_draws};
pub use view::RenderView;

pub fn crate_info() -> &'static str {
    "seascape-render v0.1.0"
}
