// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swept selection volumes
//!
//! A [`SweptVolume`] closes the gap between the rectangle captured when a
//! gesture starts and the one captured when it ends. The eight corners keep
//! their index correspondence (start corner `i` connects to end corner `i`)
//! and are stitched with a fixed triangulation:
//!
//! ```text
//! front cap   (1, 3, 2) (0, 3, 1)
//! side i      (i, i+4, p+4) (i, p+4, p)    with p = (i + 3) % 4
//! back cap    (4, 5, 6) (4, 6, 7)
//! ```
//!
//! Every edge of the result is shared by exactly two triangles, so the
//! volume is closed whenever both rectangles are non-degenerate.

use crate::containment::{
    point_in_concave_volume, point_in_convex_mesh, point_in_convex_poly, ContainmentStrategy,
};
use crate::containment::SURFACE_EPSILON;
use crate::error::Result;
use crate::mesh::TriMesh;
use crate::rect::Rectangle;
use nalgebra::Point3;

const FRONT_CAP: [[u32; 3]; 2] = [[1, 3, 2], [0, 3, 1]];
const BACK_CAP: [[u32; 3]; 2] = [[4, 5, 6], [4, 6, 7]];

/// Closed 8-vertex, 12-triangle solid between two rectangles
#[derive(Debug, Clone)]
pub struct SweptVolume {
    start: Rectangle,
    end: Rectangle,
    mesh: TriMesh,
}

impl SweptVolume {
    /// Stitch the start and end rectangles into a closed volume.
    ///
    /// Face normals are made to point out of the solid. The triangle winding
    /// itself is fixed and depends only on the rectangles' corner order.
    pub fn build(start: &Rectangle, end: &Rectangle) -> Self {
        let mut mesh = TriMesh::with_capacity(8, 12);
        for corner in start.corners().iter().chain(end.corners().iter()) {
            mesh.add_vertex(*corner);
        }

        for [a, b, c] in FRONT_CAP {
            mesh.add_triangle(a, b, c);
        }
        for i in 0..4u32 {
            let p = (i + 3) % 4;
            mesh.add_triangle(i, i + 4, p + 4);
            mesh.add_triangle(i, p + 4, p);
        }
        for [a, b, c] in BACK_CAP {
            mesh.add_triangle(a, b, c);
        }

        // The winding is consistent across all 12 faces, so one sign test
        // decides whether the whole set faces inwards.
        if mesh.signed_volume() < 0.0 {
            mesh.flip_normals();
        }
        close_collapsed_sides(&mut mesh, start, end);

        Self {
            start: *start,
            end: *end,
            mesh,
        }
    }

    #[inline]
    pub fn start(&self) -> &Rectangle {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &Rectangle {
        &self.end
    }

    /// The 8 vertices: start corners then end corners
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.mesh.vertices
    }

    #[inline]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// Enclosed volume (zero for a sweep that never left its plane)
    pub fn volume(&self) -> f64 {
        self.mesh.signed_volume().abs()
    }

    /// Test one point with the given strategy
    pub fn contains(&self, strategy: ContainmentStrategy, point: &Point3<f64>) -> Result<bool> {
        match strategy {
            ContainmentStrategy::ConvexPolygon => point_in_convex_poly(point, self.vertices()),
            ContainmentStrategy::ConvexMesh => Ok(point_in_convex_mesh(point, &self.mesh)),
            ContainmentStrategy::ConcaveVolume => Ok(point_in_concave_volume(point, &self.mesh)),
        }
    }

    /// True when every point is inside.
    ///
    /// An empty point set is never contained: there is nothing to show the
    /// object lies in the region.
    pub fn contains_all(
        &self,
        strategy: ContainmentStrategy,
        points: &[Point3<f64>],
    ) -> Result<bool> {
        if points.is_empty() {
            return Ok(false);
        }
        for point in points {
            if !self.contains(strategy, point)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Give collapsed side triangles a usable face normal.
///
/// When both rectangles share a plane the side triangles have no area and no
/// normal, which would leave the convex mesh test bounded by the caps alone.
/// Such a side gets the outward in-plane normal of its start edge instead.
fn close_collapsed_sides(mesh: &mut TriMesh, start: &Rectangle, end: &Rectangle) {
    let Some(cap_normal) = start.normal().or_else(|| end.normal()) else {
        return;
    };
    let corners = start.corners();
    let centroid = start.centroid();

    for i in 0..4 {
        let p = (i + 3) % 4;
        let edge = corners[i] - corners[p];
        let Some(mut outward) = edge.cross(&cap_normal).try_normalize(f64::EPSILON) else {
            continue;
        };
        let midpoint = corners[p] + edge * 0.5;
        if (midpoint - centroid).dot(&outward) < 0.0 {
            outward = -outward;
        }

        let first = FRONT_CAP.len() + 2 * i;
        for face in first..first + 2 {
            if mesh.triangle(face).area() <= SURFACE_EPSILON * SURFACE_EPSILON {
                mesh.face_normals[face] = outward;
            }
        }
    }
}
