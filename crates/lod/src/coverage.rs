use glam::{Mat4, Vec3};

use crate::QuadTreeConfig;
use crate::node::Node;

/// Normalized sample positions over a node footprint.
///
/// Corners first, then a jittered set that catches grazing views better
/// than a single center sample.
pub const COVERAGE_SAMPLES: [[f32; 2]; 16] = [
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.5, 0.333],
    [0.25, 0.667],
    [0.75, 0.111],
    [0.125, 0.444],
    [0.625, 0.778],
    [0.375, 0.222],
    [0.875, 0.556],
    [0.0625, 0.889],
    [0.5625, 0.037],
    [0.3125, 0.37],
    [0.8125, 0.704],
    [0.1875, 0.148],
];

/// Estimate how much of the screen one grid cell of `node`'s patch covers.
///
/// Uses the pinhole relation `area * proj[0] * proj[5] / distance^2` at each
/// sample and keeps the largest. The result is a monotonic proxy scaled by
/// `screen_area`, not a pixel count.
pub fn calculate_coverage(node: &Node, config: &QuadTreeConfig, proj: &Mat4, eye: Vec3) -> f32 {
    let margin = config.horizontal_margin;
    let extent = node.length + 2.0 * margin;
    let cell_length = node.length / config.mesh_resolution as f32;
    let world_area = cell_length * cell_length;
    let scale = proj.x_axis.x * proj.y_axis.y;

    let max_projected = COVERAGE_SAMPLES
        .iter()
        .map(|[u, v]| {
            let sample = Vec3::new(
                (node.start.x - margin) + extent * u,
                0.0,
                (node.start.y - margin) + extent * v,
            );
            let dist_sq = sample.distance_squared(eye);
            world_area * scale / dist_sq
        })
        .fold(0.0_f32, f32::max);

    max_projected * config.screen_area * 0.25
}
