// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane coordinate frames
//!
//! A [`PlaneFrame`] embeds a 2D coordinate system in a 3D plane. The plane's
//! normal is the frame's forward axis, `origin` is local (0, 0), `up` is the
//! local Y axis and `right = normalize(cross(up, normal))` is the local X axis.
//!
//! `up` is kept exactly as supplied so the local Y axis follows the tracked
//! input. When `up` is not orthogonal to the normal, [`PlaneFrame::transform_to_world`]
//! leaves the plane and is only an exact inverse of [`PlaneFrame::world_to_local`]
//! for points whose local Y is zero.

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};

/// Axis lengths at or below this are treated as zero
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// 2D coordinate frame embedded in a 3D plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    normal: Vector3<f64>,
    origin: Point3<f64>,
    up: Vector3<f64>,
    right: Vector3<f64>,
}

impl PlaneFrame {
    /// Create a frame from three points on the plane and an up hint.
    ///
    /// `pt1` becomes the origin. The normal follows the winding
    /// `cross(pt2 - pt1, pt3 - pt1)`.
    ///
    /// # Errors
    /// [`Error::DegeneratePlane`] when the points are collinear or `up` is
    /// parallel to the resulting normal.
    pub fn from_points(
        pt1: Point3<f64>,
        pt2: Point3<f64>,
        pt3: Point3<f64>,
        up: Vector3<f64>,
    ) -> Result<Self> {
        let normal = (pt2 - pt1).cross(&(pt3 - pt1));
        Self::new(normal, pt1, up)
    }

    /// Create a frame from a normal, an origin on the plane and an up hint.
    ///
    /// The normal does not need to be unit length.
    pub fn new(normal: Vector3<f64>, origin: Point3<f64>, up: Vector3<f64>) -> Result<Self> {
        let normal_len = normal.norm();
        // Negated comparison so NaN input is rejected too
        if !(normal_len > DEGENERATE_EPSILON) {
            return Err(Error::DegeneratePlane("normal has zero length"));
        }
        let normal = normal / normal_len;

        let right = up.cross(&normal);
        let right_len = right.norm();
        if !(right_len > DEGENERATE_EPSILON) {
            return Err(Error::DegeneratePlane("up is parallel to the plane normal"));
        }

        Ok(Self {
            normal,
            origin,
            up,
            right: right / right_len,
        })
    }

    /// Create a frame with world +Y as the up hint
    pub fn with_default_up(normal: Vector3<f64>, origin: Point3<f64>) -> Result<Self> {
        Self::new(normal, origin, Vector3::y())
    }

    /// Create a frame through the world origin with world +Y as the up hint
    pub fn through_origin(normal: Vector3<f64>) -> Result<Self> {
        Self::new(normal, Point3::origin(), Vector3::y())
    }

    /// Unit plane normal (the frame's forward axis)
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.normal
    }

    #[inline]
    pub fn backward(&self) -> Vector3<f64> {
        -self.normal
    }

    /// World position of local (0, 0)
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Local Y axis exactly as supplied at construction
    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.up
    }

    #[inline]
    pub fn down(&self) -> Vector3<f64> {
        -self.up
    }

    /// Unit local X axis
    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.right
    }

    #[inline]
    pub fn left(&self) -> Vector3<f64> {
        -self.right
    }

    /// Plane equation coefficients `(a, b, c, d)` with `a*x + b*y + c*z + d = 0`
    pub fn coefficients(&self) -> (f64, f64, f64, f64) {
        let n = self.normal;
        (n.x, n.y, n.z, -n.dot(&self.origin.coords))
    }

    /// Rotation taking +Z to the plane normal and +Y towards `up`
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::face_towards(&self.normal, &self.up)
    }

    /// Signed distance from a point to the plane.
    /// Positive = in front (along the normal), negative = behind.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Orthogonal projection of a point onto the plane
    #[inline]
    pub fn closest_point(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }

    /// Map a plane-local point to world space: `origin + x * right + y * up`
    #[inline]
    pub fn transform_to_world(&self, local: &Point2<f64>) -> Point3<f64> {
        self.origin + self.right * local.x + self.up * local.y
    }

    /// Map a world point to plane-local coordinates.
    ///
    /// The point is first projected onto the plane, then
    /// `relative = u * right + v * up` is solved in the least-squares sense
    /// over all three coordinates.
    pub fn world_to_local(&self, world: &Point3<f64>) -> Point2<f64> {
        let relative = self.closest_point(world) - self.origin;

        // Normal equations of the 3x2 system [right up] * (u, v) = relative.
        // The Gram determinant is positive: right is unit and orthogonal to
        // the non-zero up vector.
        let rr = self.right.dot(&self.right);
        let ru = self.right.dot(&self.up);
        let uu = self.up.dot(&self.up);
        let br = self.right.dot(&relative);
        let bu = self.up.dot(&relative);

        let det = rr * uu - ru * ru;
        let u = (br * uu - bu * ru) / det;
        let v = (rr * bu - ru * br) / det;

        Point2::new(u, v)
    }

    /// Map several plane-local points to world space
    pub fn transform_points(&self, points: &[Point2<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.transform_to_world(p)).collect()
    }

    /// Map several world points to plane-local coordinates
    pub fn world_to_local_points(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.world_to_local(p)).collect()
    }

    /// Closed outline of the local square spanning (-1, -1)..(1, 1).
    ///
    /// The first point is repeated at the end so the result can be fed
    /// straight to a line strip renderer.
    pub fn outline(&self) -> [Point3<f64>; 5] {
        [
            self.transform_to_world(&Point2::new(1.0, 1.0)),
            self.transform_to_world(&Point2::new(1.0, -1.0)),
            self.transform_to_world(&Point2::new(-1.0, -1.0)),
            self.transform_to_world(&Point2::new(-1.0, 1.0)),
            self.transform_to_world(&Point2::new(1.0, 1.0)),
        ]
    }
}
