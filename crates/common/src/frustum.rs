use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// A plane `normal . p + distance = 0`, normal pointing to the inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Build a normalized plane from raw `(a, b, c, d)` coefficients.
    ///
    /// A zero-length normal produces a degenerate plane that rejects nothing.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length > 0.0 {
            Self {
                normal: normal / length,
                distance: coefficients.w / length,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Positive on the inside of the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Result of a frustum/box test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    Outside,
    Intersecting,
    Inside,
}

/// View frustum as six inward-facing planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the planes of a combined view-projection matrix.
    ///
    /// Assumes zero-to-one clip depth, as produced by `Mat4::perspective_rh`.
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Classify a box against the frustum.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Intersection {
        let mut result = Intersection::Inside;

        for plane in &self.planes {
            // Corner furthest along the normal, and the one opposite to it.
            let positive = Vec3::select(plane.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            let negative = Vec3::select(plane.normal.cmpge(Vec3::ZERO), aabb.min, aabb.max);

            if plane.signed_distance(positive) < 0.0 {
                return Intersection::Outside;
            }
            if plane.signed_distance(negative) < 0.0 {
                result = Intersection::Intersecting;
            }
        }

        result
    }

    /// True unless the box lies completely outside one of the planes.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersect_aabb(aabb) != Intersection::Outside
    }
}
