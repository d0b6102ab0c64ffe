// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal following the winding, zero for a degenerate triangle
    pub fn normal(&self) -> Vector3<f64> {
        let n = (self.v1 - self.v0).cross(&(self.v2 - self.v0));
        let len = n.norm();
        if len < 1e-15 {
            return Vector3::zeros();
        }
        n / len
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).norm() * 0.5
    }
}

/// Indexed triangle mesh with one precomputed normal per face
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions
    pub vertices: Vec<Point3<f64>>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// One unit normal per triangle
    pub face_normals: Vec<Vector3<f64>>,
}

impl TriMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count * 3),
            face_normals: Vec::with_capacity(triangle_count),
        }
    }

    /// Build a mesh from positions and a flat index buffer, computing face normals.
    ///
    /// # Errors
    /// [`Error::InvalidMesh`] when the index count is not a multiple of three
    /// or an index points past the vertex list.
    pub fn from_indexed(vertices: Vec<Point3<f64>>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }

        let mut mesh = Self {
            vertices,
            indices: Vec::with_capacity(indices.len()),
            face_normals: Vec::with_capacity(indices.len() / 3),
        };
        for tri in indices.chunks_exact(3) {
            mesh.add_triangle(tri[0], tri[1], tri[2]);
        }
        Ok(mesh)
    }

    /// Add a vertex and return its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Add a triangle over existing vertices; its face normal is computed here.
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
        let tri = Triangle::new(
            self.vertices[i0 as usize],
            self.vertices[i1 as usize],
            self.vertices[i2 as usize],
        );
        self.face_normals.push(tri.normal());
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Triangle `index` as world-space positions
    #[inline]
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        Triangle::new(
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        )
    }

    /// Iterate triangles together with their face normals
    pub fn faces(&self) -> impl Iterator<Item = (Triangle, Vector3<f64>)> + '_ {
        (0..self.triangle_count()).map(move |i| (self.triangle(i), self.face_normals[i]))
    }

    /// Calculate bounds (min, max), `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let bounds = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some(bounds)
    }

    /// Average of all vertex positions
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Signed enclosed volume (signed tetrahedron method).
    ///
    /// Positive when faces wind counter-clockwise seen from outside; only
    /// meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        let volume: f64 = (0..self.triangle_count())
            .map(|i| {
                let t = self.triangle(i);
                t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords))
            })
            .sum();
        volume / 6.0
    }

    /// Reverse every face normal
    pub fn flip_normals(&mut self) {
        for n in &mut self.face_normals {
            *n = -*n;
        }
    }

    /// Number of undirected edges used by exactly one triangle.
    ///
    /// Degenerate triangles (repeated indices) still contribute their edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_valence().values().filter(|&&count| count == 1).count()
    }

    /// True when every undirected edge is shared by exactly two triangles
    pub fn is_watertight(&self) -> bool {
        !self.is_empty() && self.edge_valence().values().all(|&count| count == 2)
    }

    fn edge_valence(&self) -> FxHashMap<(u32, u32), usize> {
        let mut edges: FxHashMap<(u32, u32), usize> = FxHashMap::default();
        for tri in self.indices.chunks_exact(3) {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                *edges.entry(key).or_insert(0) += 1;
            }
        }
        edges
    }
}
