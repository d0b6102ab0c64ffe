// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane-aligned selection rectangles

use crate::plane::PlaneFrame;
use nalgebra::{Point2, Point3, Vector3};

/// Four world-space corners, ordered top-left, top-right, bottom-right,
/// bottom-left in the local space of the frame that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    corners: [Point3<f64>; 4],
}

impl Rectangle {
    pub const TOP_LEFT: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const BOTTOM_RIGHT: usize = 2;
    pub const BOTTOM_LEFT: usize = 3;

    /// Wrap four corners that are already in top-left, top-right,
    /// bottom-right, bottom-left order
    pub fn new(corners: [Point3<f64>; 4]) -> Self {
        Self { corners }
    }

    /// Build the rectangle spanned by two opposite corners.
    ///
    /// Both points are projected into the frame. `first` becomes the top-left
    /// corner and `second` the bottom-right corner; the other two corners are
    /// completed so the edges run along the frame's local axes.
    pub fn from_corners(frame: &PlaneFrame, first: &Point3<f64>, second: &Point3<f64>) -> Self {
        let tl = frame.world_to_local(first);
        let br = frame.world_to_local(second);
        let tr = Point2::new(br.x, tl.y);
        let bl = Point2::new(tl.x, br.y);

        Self {
            corners: [
                frame.transform_to_world(&tl),
                frame.transform_to_world(&tr),
                frame.transform_to_world(&br),
                frame.transform_to_world(&bl),
            ],
        }
    }

    #[inline]
    pub fn corners(&self) -> &[Point3<f64>; 4] {
        &self.corners
    }

    #[inline]
    pub fn corner(&self, index: usize) -> Point3<f64> {
        self.corners[index]
    }

    /// Average of the four corners
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .corners
            .iter()
            .fold(Vector3::zeros(), |acc, c| acc + c.coords);
        Point3::from(sum / 4.0)
    }

    /// Area normal by Newell's method; its length is twice the area
    fn area_vector(&self) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for i in 0..4 {
            let curr = self.corners[i];
            let next = self.corners[(i + 1) % 4];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        normal
    }

    pub fn area(&self) -> f64 {
        self.area_vector().norm() * 0.5
    }

    /// Unit normal following the corner winding, `None` for a zero-area rectangle
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.area_vector();
        let len = n.norm();
        if len < 1e-15 {
            return None;
        }
        Some(n / len)
    }

    /// True when the rectangle has collapsed to a line or a point
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() <= epsilon
    }

    /// Corners as a closed loop (first corner repeated) for line rendering
    pub fn outline(&self) -> [Point3<f64>; 5] {
        let c = &self.corners;
        [c[0], c[1], c[2], c[3], c[0]]
    }
}
