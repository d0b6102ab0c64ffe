// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point containment predicates
//!
//! Three independent tests, each tied to a region representation:
//!
//! - [`point_in_convex_poly`]: half-space test against pseudo-normals running
//!   from a point set's centroid through each vertex. Cheap, approximate for
//!   irregular shapes.
//! - [`point_in_convex_mesh`]: half-space test against every face normal of a
//!   triangle mesh. Exact for convex meshes only.
//! - [`point_in_concave_volume`]: casts two-sided rays along the 26 directions
//!   of the 3x3x3 neighbour lattice and requires a boundary hit in each one.
//!   Works for any closed mesh at the cost of 26 ray casts per point.
//!
//! Points on the boundary count as inside for all three: rejection uses a
//! strict `> 0`.

use crate::error::{Error, Result};
use crate::mesh::{Triangle, TriMesh};
use nalgebra::{Point3, Vector3};

/// Tolerance for rays grazing triangle edges and for points lying on the surface
pub const SURFACE_EPSILON: f64 = 1e-9;

/// Which predicate a selection region is tested with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainmentStrategy {
    /// Centroid pseudo-normal test over the region's vertices. Does not bound
    /// a flat region along its normal.
    ConvexPolygon,
    /// Face-normal half-space test over the region's triangles
    ConvexMesh,
    /// 26-direction ray test over the region's closed boundary
    #[default]
    ConcaveVolume,
}

impl ContainmentStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ContainmentStrategy::ConvexPolygon => "convex-polygon",
            ContainmentStrategy::ConvexMesh => "convex-mesh",
            ContainmentStrategy::ConcaveVolume => "concave-volume",
        }
    }
}

impl std::fmt::Display for ContainmentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convex polygon half-space test.
///
/// Each vertex gets an outward pseudo-normal `normalize(vertex - centroid)`;
/// the point is outside as soon as it lies in front of any of them. A vertex
/// sitting on the centroid has no direction and is skipped.
///
/// When every vertex lies in one plane (a zero-depth sweep) all pseudo-normals
/// lie in that plane too, so points offset along the plane normal are not
/// rejected. Use [`point_in_convex_mesh`] or [`point_in_concave_volume`] for
/// flat regions.
///
/// # Errors
/// [`Error::InsufficientPoints`] for fewer than three vertices.
pub fn point_in_convex_poly(point: &Point3<f64>, poly: &[Point3<f64>]) -> Result<bool> {
    if poly.len() < 3 {
        return Err(Error::InsufficientPoints { count: poly.len() });
    }

    let sum = poly.iter().fold(Vector3::zeros(), |acc, v| acc + v.coords);
    let centroid = Point3::from(sum / poly.len() as f64);

    for vert in poly {
        let Some(normal) = (vert - centroid).try_normalize(f64::EPSILON) else {
            continue;
        };
        if (point - vert).dot(&normal) > 0.0 {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Convex mesh half-space test using the mesh's precomputed face normals.
///
/// Not sound for concave meshes, use [`point_in_concave_volume`] there.
pub fn point_in_convex_mesh(point: &Point3<f64>, mesh: &TriMesh) -> bool {
    mesh.faces()
        .all(|(tri, normal)| (point - tri.v0).dot(&normal) <= 0.0)
}

/// The 26 unit directions of the 3x3x3 lattice around a point (zero excluded)
pub fn lattice_directions() -> Vec<Vector3<f64>> {
    let mut dirs = Vec::with_capacity(26);
    for x in -1i32..=1 {
        for y in -1i32..=1 {
            for z in -1i32..=1 {
                if x == 0 && y == 0 && z == 0 {
                    continue;
                }
                dirs.push(Vector3::new(x as f64, y as f64, z as f64).normalize());
            }
        }
    }
    dirs
}

/// Omnidirectional raycast test for closed (possibly concave) meshes.
///
/// The point is inside when a ray towards each of the 26 lattice directions
/// hits the boundary at least once; back faces count. A point lying on the
/// boundary surface is inside without casting, which keeps zero-thickness
/// regions selectable on their own plane.
///
/// Near edges and corners some rays can slip between triangles, so points
/// very close to the boundary may be rejected.
pub fn point_in_concave_volume(point: &Point3<f64>, mesh: &TriMesh) -> bool {
    let Some((min, max)) = mesh.bounds() else {
        return false;
    };

    // Outside the bounds the axis ray pointing away from the box always misses
    let outside_bounds = (0..3).any(|axis| {
        point[axis] < min[axis] - SURFACE_EPSILON || point[axis] > max[axis] + SURFACE_EPSILON
    });
    if outside_bounds {
        return false;
    }

    let triangles: Vec<Triangle> = (0..mesh.triangle_count())
        .map(|i| mesh.triangle(i))
        .filter(|t| t.area() > SURFACE_EPSILON * SURFACE_EPSILON)
        .collect();

    if triangles
        .iter()
        .any(|t| distance_to_triangle(point, t) <= SURFACE_EPSILON)
    {
        return true;
    }

    lattice_directions().iter().all(|dir| {
        triangles
            .iter()
            .any(|t| ray_hits_triangle(point, dir, t))
    })
}

/// Two-sided Möller–Trumbore ray-triangle intersection test.
///
/// Casts a ray from `origin` along `dir`; hits exactly on an edge or at the
/// origin itself (t = 0) count.
fn ray_hits_triangle(origin: &Point3<f64>, dir: &Vector3<f64>, tri: &Triangle) -> bool {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < 1e-12 {
        return false; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);

    if u < -SURFACE_EPSILON || u > 1.0 + SURFACE_EPSILON {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);

    if v < -SURFACE_EPSILON || u + v > 1.0 + SURFACE_EPSILON {
        return false;
    }

    let t = f * edge2.dot(&q);
    t >= -SURFACE_EPSILON
}

/// Distance from a point to the closest point of a non-degenerate triangle
fn distance_to_triangle(p: &Point3<f64>, tri: &Triangle) -> f64 {
    (p - closest_point_on_triangle(p, tri)).norm()
}

/// Closest point on a triangle by Voronoi region classification
fn closest_point_on_triangle(p: &Point3<f64>, tri: &Triangle) -> Point3<f64> {
    let (a, b, c) = (tri.v0, tri.v1, tri.v2);
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
