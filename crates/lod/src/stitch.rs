use glam::Vec2;

use crate::QuadTree;
use crate::node::Node;

/// Patch edges, in the order patterns and probes use them.
///
/// Bottom is `+Z`, top is `-Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];
}

/// Per-edge stitching degrees of a patch.
///
/// Degree `d` means every `2^d` border vertices along that edge collapse
/// onto one, matching a coarser neighbor. 0 leaves the edge untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StitchPattern {
    pub left: u8,
    pub right: u8,
    pub bottom: u8,
    pub top: u8,
}

impl StitchPattern {
    /// Highest degree produced by the resolver.
    pub const MAX_DEGREE: u8 = 2;
    /// Number of distinct patterns (three degrees on four edges).
    pub const COUNT: usize = 81;

    pub fn degree(&self, edge: Edge) -> u8 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Top => self.top,
        }
    }

    pub fn set_degree(&mut self, edge: Edge, degree: u8) {
        let slot = match edge {
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Top => &mut self.top,
        };
        *slot = degree.min(Self::MAX_DEGREE);
    }

    /// Position of this pattern among the [`Self::COUNT`] index buffer variants.
    pub fn subset_index(&self) -> usize {
        Edge::ALL
            .iter()
            .rev()
            .fold(0, |acc, &edge| acc * 3 + self.degree(edge) as usize)
    }

    /// Inverse of [`Self::subset_index`].
    pub fn from_subset_index(mut index: usize) -> Self {
        let mut pattern = Self::default();
        for edge in Edge::ALL {
            pattern.set_degree(edge, (index % 3) as u8);
            index /= 3;
        }
        pattern
    }

    pub fn is_uniform(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for StitchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "L{} R{} B{} T{}",
            self.left, self.right, self.bottom, self.top
        )
    }
}

impl QuadTree {
    /// Work out how far each edge of `node` must be coarsened to meet its
    /// neighbors without cracks.
    ///
    /// Each neighbor is found by probing half a patch beyond the middle of
    /// the edge. Only neighbors at least as large as `node` count; finer
    /// neighbors stitch against this one instead.
    pub fn find_subset_pattern(&self, node: &Node) -> StitchPattern {
        let mut pattern = StitchPattern::default();
        let mesh = self.config().mesh_resolution;

        for edge in Edge::ALL {
            let Some(neighbor) = self
                .find_leaf(self.probe_point(node, edge))
                .and_then(|index| self.node(index))
            else {
                continue;
            };

            if neighbor.length <= node.length * 0.999 {
                continue;
            }

            let ratio = (neighbor.length / node.length) * (mesh >> node.lod) as f32
                / (mesh >> neighbor.lod) as f32;

            let degree = if ratio > 3.999 {
                2
            } else if ratio > 1.999 {
                1
            } else {
                0
            };
            pattern.set_degree(edge, degree);
        }

        pattern
    }

    fn probe_point(&self, node: &Node, edge: Edge) -> Vec2 {
        let offset = 0.5 * self.config().min_patch_length;
        let half = 0.5 * node.length;
        let s = node.start;
        match edge {
            Edge::Left => Vec2::new(s.x - offset, s.y + half),
            Edge::Right => Vec2::new(s.x + node.length + offset, s.y + half),
            Edge::Bottom => Vec2::new(s.x + half, s.y + node.length + offset),
            Edge::Top => Vec2::new(s.x + half, s.y - offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuadTreeConfig;
    use glam::{Mat4, Vec3};

    fn config() -> QuadTreeConfig {
        QuadTreeConfig {
            origin: [0.0, 0.0],
            size: 16.0,
            lod_count: 4,
            mesh_resolution: 32,
            min_patch_length: 4.0,
            max_coverage: 1.0,
            screen_area: 1.0,
            ..QuadTreeConfig::default()
        }
    }

    fn leaf(x: f32, z: f32, length: f32, lod: u32) -> Node {
        let mut node = Node::new(Vec2::new(x, z), length);
        node.lod = lod;
        node
    }

    /// 16x16 root: quadrant 1 split into four 4x4 leaves, the rest 8x8 leaves.
    ///
    /// Indices: 0..=3 the small leaves, 4 quadrant 1, 5/6/7 quadrants 0/2/3, 8 root.
    fn mixed_tree(small_lod: u32, large_lod: u32) -> QuadTree {
        let mut q1 = Node::new(Vec2::new(8.0, 0.0), 8.0);
        q1.subnodes = [Some(0), Some(1), Some(2), Some(3)];
        let mut root = Node::new(Vec2::ZERO, 16.0);
        root.subnodes = [Some(5), Some(4), Some(6), Some(7)];

        let nodes = vec![
            leaf(8.0, 0.0, 4.0, small_lod),
            leaf(12.0, 0.0, 4.0, small_lod),
            leaf(12.0, 4.0, 4.0, small_lod),
            leaf(8.0, 4.0, 4.0, small_lod),
            q1,
            leaf(0.0, 0.0, 8.0, large_lod),
            leaf(8.0, 8.0, 8.0, large_lod),
            leaf(0.0, 8.0, 8.0, large_lod),
            root,
        ];
        QuadTree::with_nodes(config(), nodes)
    }

    #[test]
    fn finer_leaf_stitches_against_coarser_neighbor() {
        let tree = mixed_tree(0, 0);
        let small = tree.nodes()[0];

        let pattern = tree.find_subset_pattern(&small);
        assert_eq!(pattern.left, 1);
        assert_eq!(pattern.right, 0);
        assert_eq!(pattern.top, 0);
    }

    #[test]
    fn coarser_leaf_needs_no_adjustment() {
        let tree = mixed_tree(0, 0);
        let large = tree.nodes()[5];

        let pattern = tree.find_subset_pattern(&large);
        assert_eq!(pattern.right, 0);
        assert!(pattern.is_uniform());
    }

    #[test]
    fn lod_difference_raises_degree() {
        // Ratio 2 in size times 2 in resolution.
        let tree = mixed_tree(0, 1);
        let small = tree.nodes()[3];

        let pattern = tree.find_subset_pattern(&small);
        assert_eq!(pattern.left, 2);
        assert_eq!(pattern.bottom, 2);
        assert_eq!(pattern.right, 0);
        assert_eq!(pattern.top, 0);
    }

    #[test]
    fn large_ratio_stays_at_degree_two() {
        // Ratio 2 in size times 4 in resolution.
        let tree = mixed_tree(0, 2);
        let small = tree.nodes()[0];
        assert_eq!(tree.find_subset_pattern(&small).left, 2);
    }

    #[test]
    fn equal_size_coarser_lod_neighbor_stitches() {
        let q0 = leaf(0.0, 0.0, 8.0, 0);
        let q1 = leaf(8.0, 0.0, 8.0, 1);
        let mut root = Node::new(Vec2::ZERO, 16.0);
        root.subnodes = [Some(0), Some(1), None, None];
        let tree = QuadTree::with_nodes(config(), vec![q0, q1, root]);

        assert_eq!(tree.find_subset_pattern(&q0).right, 1);
        assert_eq!(tree.find_subset_pattern(&q1).left, 0);
    }

    #[test]
    fn domain_border_has_no_neighbor() {
        let tree = mixed_tree(0, 1);
        let corner = tree.nodes()[5];
        let pattern = tree.find_subset_pattern(&corner);
        assert_eq!(pattern.left, 0);
        assert_eq!(pattern.top, 0);
    }

    #[test]
    fn probes_sit_half_a_patch_outside_each_edge() {
        let tree = mixed_tree(0, 0);
        let node = leaf(8.0, 0.0, 4.0, 0);
        assert_eq!(tree.probe_point(&node, Edge::Left), Vec2::new(6.0, 2.0));
        assert_eq!(tree.probe_point(&node, Edge::Right), Vec2::new(14.0, 2.0));
        assert_eq!(tree.probe_point(&node, Edge::Bottom), Vec2::new(10.0, 6.0));
        assert_eq!(tree.probe_point(&node, Edge::Top), Vec2::new(10.0, -2.0));
    }

    #[test]
    fn built_tree_patterns_stay_in_range() {
        let mut tree = QuadTree::new(QuadTreeConfig::default());
        let eye = Vec3::new(0.0, 30.0, 0.0);
        let view = Mat4::look_at_rh(eye, Vec3::new(200.0, 0.0, 0.0), Vec3::Y);
        let proj = Mat4::perspective_rh(60.0_f32.to_radians(), 16.0 / 9.0, 0.1, 2000.0);
        tree.rebuild(&(proj * view), &proj, eye);

        let mut stitched = 0;
        tree.traverse(|leaf| {
            let pattern = tree.find_subset_pattern(leaf);
            for edge in Edge::ALL {
                assert!(pattern.degree(edge) <= StitchPattern::MAX_DEGREE);
            }
            assert!(pattern.subset_index() < StitchPattern::COUNT);
            if !pattern.is_uniform() {
                stitched += 1;
            }
        });
        assert!(stitched > 0, "a perspective view should need some stitching");
    }

    #[test]
    fn subset_index_covers_all_patterns() {
        for index in 0..StitchPattern::COUNT {
            let pattern = StitchPattern::from_subset_index(index);
            assert_eq!(pattern.subset_index(), index);
        }
        assert_eq!(StitchPattern::default().subset_index(), 0);
        assert_eq!(
            StitchPattern {
                left: 1,
                right: 0,
                bottom: 0,
                top: 0
            }
            .subset_index(),
            1
        );
        assert_eq!(
            StitchPattern {
                left: 0,
                right: 0,
                bottom: 0,
                top: 2
            }
            .subset_index(),
            54
        );
    }

    #[test]
    fn set_degree_clamps() {
        let mut pattern = StitchPattern::default();
        pattern.set_degree(Edge::Bottom, 7);
        assert_eq!(pattern.bottom, 2);
        assert_eq!(pattern.to_string(), "L0 R0 B2 T0");
    }
}
