use glam::Vec2;
use seascape_lod::{PatchLibrary, QuadTree, StitchPattern};

use crate::RenderView;

/// One patch to draw: a leaf footprint, its LOD and its stitched edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchDraw {
    pub start: Vec2,
    pub length: f32,
    pub lod: u32,
    pub pattern: StitchPattern,
}

/// Walk the leaves of `tree` and resolve the stitch pattern of each.
pub fn collect_draws(tree: &QuadTree) -> Vec<PatchDraw> {
    let _span = tracing::debug_span!("collect_draws").entered();
    let mut draws = Vec::with_capacity(tree.stats().leaf_count);
    tree.traverse(|leaf| {
        draws.push(PatchDraw {
            start: leaf.start,
            length: leaf.length,
            lod: leaf.lod,
            pattern: tree.find_subset_pattern(leaf),
        });
    });
    tracing::trace!(draws = draws.len(), "collected patch draws");
    draws
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a built tree and the view it was built for, then
/// produces output. It never rebuilds the tree.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of patches.
    fn render(&self, tree: &QuadTree, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the patches a GPU backend would
/// draw, with the index count of the stitched variant each one selects.
#[derive(Debug, Clone)]
pub struct DebugTextRenderer {
    library: PatchLibrary,
}

impl DebugTextRenderer {
    pub fn new(tree: &QuadTree) -> Self {
        let config = tree.config();
        Self {
            library: PatchLibrary::new(config.mesh_resolution, config.lod_count),
        }
    }

    pub fn library(&self) -> &PatchLibrary {
        &self.library
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, tree: &QuadTree, view: &RenderView) -> String {
        let draws = collect_draws(tree);
        let mut out = String::new();

        out.push_str(&format!("=== Quadtree ({}) ===\n", tree.stats()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        out.push_str(&format!("Patches: {}\n", draws.len()));

        let mut total_indices = 0;
        for draw in &draws {
            let index_count = self
                .library
                .indices(draw.lod, draw.pattern)
                .map_or(0, <[u32]>::len);
            total_indices += index_count;
            out.push_str(&format!(
                "  start=({:.1}, {:.1}) length={:.1} lod={} stitch=[{}] indices={}\n",
                draw.start.x, draw.start.y, draw.length, draw.lod, draw.pattern, index_count
            ));
        }
        out.push_str(&format!("Triangles: {}\n", total_indices / 3));

        out
    }
}
