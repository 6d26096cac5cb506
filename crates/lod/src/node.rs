use glam::{Vec2, Vec3};
use seascape_common::Aabb;

/// Index of a node in [`crate::QuadTree::nodes`].
pub type NodeIndex = usize;

/// A square region of the domain.
///
/// `start` is the lower corner on the XZ plane (`start.x` is world X,
/// `start.y` is world Z). Children are referenced by index into the tree's
/// flattened node list; `None` means the quadrant has no node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub start: Vec2,
    pub length: f32,
    pub lod: u32,
    pub subnodes: [Option<NodeIndex>; 4],
}

impl Node {
    pub fn new(start: Vec2, length: f32) -> Self {
        Self {
            start,
            length,
            lod: 0,
            subnodes: [None; 4],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.subnodes.iter().all(Option::is_none)
    }

    /// Upper corner of the footprint.
    pub fn end(&self) -> Vec2 {
        self.start + Vec2::splat(self.length)
    }

    pub fn center(&self) -> Vec2 {
        self.start + Vec2::splat(0.5 * self.length)
    }

    /// Point containment, inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        let end = self.end();
        point.x >= self.start.x && point.x <= end.x && point.y >= self.start.y && point.y <= end.y
    }

    /// The four half-size children, in quadrant order:
    /// `(x, z)`, `(x + h, z)`, `(x + h, z + h)`, `(x, z + h)`.
    pub fn quadrants(&self) -> [Node; 4] {
        let h = 0.5 * self.length;
        let s = self.start;
        [
            Node::new(s, h),
            Node::new(Vec2::new(s.x + h, s.y), h),
            Node::new(Vec2::new(s.x + h, s.y + h), h),
            Node::new(Vec2::new(s.x, s.y + h), h),
        ]
    }

    /// Culling volume: the footprint grown by `horizontal` on every side,
    /// spanning `[-vertical, vertical]` in height.
    pub fn bounds(&self, horizontal: f32, vertical: f32) -> Aabb {
        let mut aabb = Aabb::empty();
        aabb.add_point(Vec3::new(
            self.start.x - horizontal,
            -vertical,
            self.start.y - horizontal,
        ));
        aabb.add_point(Vec3::new(
            self.start.x + self.length + horizontal,
            vertical,
            self.start.y + self.length + horizontal,
        ));
        aabb
    }
}
