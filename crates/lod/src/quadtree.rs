use std::time::Instant;

use glam::{Mat4, Vec2, Vec3};
use seascape_common::Frustum;

use crate::coverage::calculate_coverage;
use crate::node::{Node, NodeIndex};
use crate::{BuildStats, QuadTreeConfig};

/// View parameters shared by every step of one rebuild.
struct BuildContext {
    frustum: Frustum,
    proj: Mat4,
    eye: Vec3,
}

/// View-dependent quadtree over a square domain.
///
/// The root is a fixed template derived from the configuration. Each
/// [`rebuild`](Self::rebuild) discards the previous node list and grows a new
/// one from that template: children are appended before their parent, so the
/// last node is always the root's representation.
#[derive(Debug, Clone)]
pub struct QuadTree {
    config: QuadTreeConfig,
    root: Node,
    nodes: Vec<Node>,
    stats: BuildStats,
}

impl QuadTree {
    /// Create a tree for the given configuration. Nothing is built until
    /// the first [`rebuild`](Self::rebuild).
    pub fn new(config: QuadTreeConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid quadtree configuration");
        let root = Node::new(config.origin(), config.size);
        Self {
            stats: BuildStats::new(config.lod_count),
            config,
            root,
            nodes: Vec::new(),
        }
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// The root template every rebuild starts from.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The flattened node list of the last rebuild.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Index of the built root, if anything survived culling.
    pub fn root_index(&self) -> Option<NodeIndex> {
        self.nodes.len().checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Statistics from the last rebuild.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Rebuild the node list for a new view.
    ///
    /// `view_proj` is the combined view-projection matrix used for culling;
    /// `proj` supplies the perspective scale terms for coverage.
    pub fn rebuild(&mut self, view_proj: &Mat4, proj: &Mat4, eye: Vec3) {
        let _span = tracing::info_span!("quadtree_rebuild").entered();
        let frame_start = Instant::now();

        // clear() keeps the previous frame's allocation
        self.nodes.clear();

        let ctx = BuildContext {
            frustum: Frustum::from_view_projection(view_proj),
            proj: *proj,
            eye,
        };
        let mut stats = BuildStats::new(self.config.lod_count);
        let root = self.root;
        let root_index = self.build_tree(root, 0, &ctx, &mut stats);

        stats.node_count = self.nodes.len();
        stats.build_time = frame_start.elapsed();

        tracing::debug!(
            root = ?root_index,
            nodes = stats.node_count,
            leaves = stats.leaf_count,
            "quadtree rebuilt"
        );
        tracing::trace!(
            culled = stats.culled_count,
            discarded = stats.discarded_count,
            depth = stats.max_depth,
            lods = ?stats.lod_histogram,
            time = ?stats.build_time,
            "quadtree rebuild stats"
        );

        self.stats = stats;
    }

    fn build_tree(
        &mut self,
        mut node: Node,
        depth: usize,
        ctx: &BuildContext,
        stats: &mut BuildStats,
    ) -> Option<NodeIndex> {
        if !self.is_visible(&node, &ctx.frustum) {
            stats.culled_count += 1;
            return None;
        }

        let coverage = calculate_coverage(&node, &self.config, &ctx.proj, ctx.eye);
        let mut visible = true;

        if coverage > self.config.max_coverage && node.length > self.config.min_patch_length {
            for (slot, quadrant) in node.quadrants().into_iter().enumerate() {
                node.subnodes[slot] = self.build_tree(quadrant, depth + 1, ctx, stats);
            }

            // Split, but every child was culled.
            visible = !node.is_leaf();
        }

        if !visible {
            stats.discarded_count += 1;
            return None;
        }

        node.lod = self.select_lod(coverage);
        if node.is_leaf() {
            stats.record_leaf(node.lod);
        }
        stats.max_depth = stats.max_depth.max(depth);

        let index = self.nodes.len();
        self.nodes.push(node);
        Some(index)
    }

    fn is_visible(&self, node: &Node, frustum: &Frustum) -> bool {
        let bounds = node.bounds(self.config.horizontal_margin, self.config.vertical_margin);
        frustum.intersects_aabb(&bounds)
    }

    /// Each coarser level shows roughly a quarter of the cells, so keep
    /// quadrupling the coverage until it crosses the threshold.
    fn select_lod(&self, mut coverage: f32) -> u32 {
        let mut lod = 0;
        while lod < self.config.lod_count - 1 && coverage <= self.config.max_coverage {
            coverage *= 4.0;
            lod += 1;
        }
        lod.min(self.config.lod_count - 2)
    }

    /// Find the leaf whose footprint contains `point` (edges inclusive).
    ///
    /// Returns `None` on an empty tree, outside the built root, or where
    /// the containing quadrant was culled.
    pub fn find_leaf(&self, point: Vec2) -> Option<NodeIndex> {
        let mut index = self.root_index()?;
        let mut node = &self.nodes[index];

        if !node.contains(point) {
            return None;
        }

        while !node.is_leaf() {
            let (child_index, child) = node
                .subnodes
                .iter()
                .flatten()
                .map(|&i| (i, &self.nodes[i]))
                .find(|(_, child)| child.contains(point))?;
            index = child_index;
            node = child;
        }

        Some(index)
    }

    /// Visit every leaf depth-first, quadrants in order 0..3.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Node),
    {
        self.walk_leaves(|_, node| callback(node));
    }

    /// Leaf indices in traversal order.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        let mut leaves = Vec::with_capacity(self.stats.leaf_count);
        self.walk_leaves(|index, _| leaves.push(index));
        leaves
    }

    fn walk_leaves<F>(&self, mut visit: F)
    where
        F: FnMut(NodeIndex, &Node),
    {
        if let Some(root) = self.root_index() {
            self.walk_node(root, &mut visit);
        }
    }

    fn walk_node<F>(&self, index: NodeIndex, visit: &mut F)
    where
        F: FnMut(NodeIndex, &Node),
    {
        let node = &self.nodes[index];
        if node.is_leaf() {
            visit(index, node);
            return;
        }
        for &child in node.subnodes.iter().flatten() {
            self.walk_node(child, visit);
        }
    }

    /// Build a tree around a hand-made node list (children before parents).
    #[cfg(test)]
    pub(crate) fn with_nodes(config: QuadTreeConfig, nodes: Vec<Node>) -> Self {
        let mut tree = Self::new(config);
        tree.nodes = nodes;
        tree
    }
}
