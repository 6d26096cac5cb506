//! Index buffers for stitched patches.
//!
//! A patch is a `(resolution + 1)^2` vertex grid, row-major with rows along
//! `+Z`. Stitching an edge with degree `d` snaps each border vertex on that
//! edge to the nearest multiple of `2^d` (ties go to the lower one). The
//! triangles touching a snapped vertex collapse and are dropped, leaving only
//! the vertices a coarser neighbor also has on that edge.

use crate::stitch::{Edge, StitchPattern};

/// Generator for a single patch index buffer.
pub struct PatchIndices;

impl PatchIndices {
    pub fn vertex_count(resolution: u32) -> usize {
        let row = resolution as usize + 1;
        row * row
    }

    /// Triangle list for a `resolution`-cell patch stitched by `pattern`.
    ///
    /// Triangles face `+Y` (counter-clockwise seen from above).
    pub fn generate(resolution: u32, pattern: StitchPattern) -> Vec<u32> {
        let n = resolution;
        let row = n + 1;
        let vertex = |x: u32, z: u32| {
            let (x, z) = snap(n, pattern, x, z);
            z * row + x
        };

        let mut indices = Vec::with_capacity(6 * (n as usize) * (n as usize));
        for z in 0..n {
            for x in 0..n {
                let v00 = vertex(x, z);
                let v10 = vertex(x + 1, z);
                let v01 = vertex(x, z + 1);
                let v11 = vertex(x + 1, z + 1);

                for tri in [[v00, v01, v10], [v10, v01, v11]] {
                    if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                        indices.extend_from_slice(&tri);
                    }
                }
            }
        }
        indices
    }
}

/// Move a border vertex onto the grid of its stitched edge.
fn snap(n: u32, pattern: StitchPattern, x: u32, z: u32) -> (u32, u32) {
    let align = |edge: Edge, i: u32| {
        let step = 1u32 << effective_degree(n, pattern.degree(edge));
        (i + (step - 1) / 2) / step * step
    };

    if x == 0 {
        (x, align(Edge::Left, z))
    } else if x == n {
        (x, align(Edge::Right, z))
    } else if z == 0 {
        (align(Edge::Top, x), z)
    } else if z == n {
        (align(Edge::Bottom, x), z)
    } else {
        (x, z)
    }
}

/// A patch too coarse for the requested degree keeps its corners.
fn effective_degree(n: u32, degree: u8) -> u32 {
    let mut degree = u32::from(degree);
    while degree > 0 && (1u32 << degree) > n {
        degree -= 1;
    }
    degree
}

/// Every stitched index buffer for every LOD level, built once up front.
#[derive(Debug, Clone)]
pub struct PatchLibrary {
    mesh_resolution: u32,
    /// `[lod][subset_index]`
    levels: Vec<Vec<Vec<u32>>>,
}

impl PatchLibrary {
    pub fn new(mesh_resolution: u32, lod_count: u32) -> Self {
        let levels: Vec<Vec<Vec<u32>>> = (0..lod_count)
            .map(|lod| {
                let resolution = level_resolution(mesh_resolution, lod);
                (0..StitchPattern::COUNT)
                    .map(|subset| {
                        PatchIndices::generate(resolution, StitchPattern::from_subset_index(subset))
                    })
                    .collect()
            })
            .collect();

        let total: usize = levels.iter().flatten().map(Vec::len).sum();
        tracing::debug!(mesh_resolution, lod_count, total_indices = total, "patch library built");

        Self {
            mesh_resolution,
            levels,
        }
    }

    pub fn lod_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Grid cells along a patch edge at `lod`.
    pub fn resolution(&self, lod: u32) -> u32 {
        level_resolution(self.mesh_resolution, lod)
    }

    pub fn vertex_count(&self, lod: u32) -> usize {
        PatchIndices::vertex_count(self.resolution(lod))
    }

    /// Index buffer for a patch at `lod` stitched by `pattern`.
    pub fn indices(&self, lod: u32, pattern: StitchPattern) -> Option<&[u32]> {
        self.levels
            .get(lod as usize)
            .and_then(|level| level.get(pattern.subset_index()))
            .map(Vec::as_slice)
    }
}

fn level_resolution(mesh_resolution: u32, lod: u32) -> u32 {
    mesh_resolution.checked_shr(lod).unwrap_or(0).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(resolution: u32, index: u32) -> (i64, i64) {
        let row = resolution + 1;
        ((index % row) as i64, (index / row) as i64)
    }

    /// Twice the signed area of each triangle; positive means `+Y` facing.
    fn doubled_areas(resolution: u32, indices: &[u32]) -> Vec<i64> {
        indices
            .chunks(3)
            .map(|tri| {
                let (ax, az) = coords(resolution, tri[0]);
                let (bx, bz) = coords(resolution, tri[1]);
                let (cx, cz) = coords(resolution, tri[2]);
                (bz - az) * (cx - ax) - (bx - ax) * (cz - az)
            })
            .collect()
    }

    fn pattern(left: u8, right: u8, bottom: u8, top: u8) -> StitchPattern {
        StitchPattern {
            left,
            right,
            bottom,
            top,
        }
    }

    #[test]
    fn uniform_patch_is_full_grid() {
        let indices = PatchIndices::generate(4, StitchPattern::default());
        assert_eq!(indices.len(), 6 * 16);
        assert!(indices.iter().all(|&i| (i as usize) < PatchIndices::vertex_count(4)));
    }

    #[test]
    fn stitched_edge_drops_collapsed_triangles() {
        // Degree d on one edge removes n - n / 2^d triangles.
        let n = 8;
        assert_eq!(PatchIndices::generate(n, pattern(1, 0, 0, 0)).len(), 3 * (128 - 4));
        assert_eq!(PatchIndices::generate(n, pattern(0, 2, 0, 0)).len(), 3 * (128 - 6));
        assert_eq!(PatchIndices::generate(n, pattern(1, 1, 2, 2)).len(), 3 * (128 - 4 - 4 - 6 - 6));
    }

    #[test]
    fn stitched_edges_only_use_coarse_vertices() {
        let n = 16;
        let p = pattern(1, 2, 1, 2);
        let indices = PatchIndices::generate(n, p);

        for &index in &indices {
            let (x, z) = coords(n, index);
            if x == 0 {
                assert_eq!(z % 2, 0, "left edge vertex z={z}");
            } else if x == n as i64 {
                assert_eq!(z % 4, 0, "right edge vertex z={z}");
            } else if z == n as i64 {
                assert_eq!(x % 2, 0, "bottom edge vertex x={x}");
            } else if z == 0 {
                assert_eq!(x % 4, 0, "top edge vertex x={x}");
            }
        }
    }

    #[test]
    fn triangles_face_up_and_cover_the_patch() {
        let n = 8;
        for subset in 0..StitchPattern::COUNT {
            let p = StitchPattern::from_subset_index(subset);
            let areas = doubled_areas(n, &PatchIndices::generate(n, p));
            assert!(areas.iter().all(|&a| a >= 0), "pattern {p} has a flipped triangle");
            assert_eq!(areas.iter().sum::<i64>(), 2 * (n as i64) * (n as i64), "pattern {p}");
        }
    }

    #[test]
    fn coarse_patch_keeps_corners() {
        // One cell cannot be stitched at all.
        let indices = PatchIndices::generate(1, pattern(2, 2, 2, 2));
        assert_eq!(indices.len(), 6);
        assert_eq!(effective_degree(2, 2), 1);
        assert_eq!(effective_degree(8, 2), 2);
    }

    #[test]
    fn library_halves_resolution_per_lod() {
        let library = PatchLibrary::new(32, 4);
        assert_eq!(library.lod_count(), 4);
        assert_eq!(library.resolution(0), 32);
        assert_eq!(library.resolution(3), 4);
        assert_eq!(library.vertex_count(1), 17 * 17);

        let full = library.indices(2, StitchPattern::default()).unwrap();
        assert_eq!(full.len(), 6 * 8 * 8);

        let stitched = library.indices(2, pattern(1, 0, 0, 0)).unwrap();
        assert!(stitched.len() < full.len());
        assert!(library.indices(4, StitchPattern::default()).is_none());
    }
}
