// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sweep Select Geometry
//!
//! Plane coordinate frames, swept selection volumes and point containment
//! tests, built on nalgebra.

pub mod containment;
pub mod error;
pub mod mesh;
pub mod plane;
pub mod rect;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, UnitQuaternion, Vector2, Vector3};

pub use containment::{
    lattice_directions, point_in_concave_volume, point_in_convex_mesh, point_in_convex_poly,
    ContainmentStrategy,
};
pub use error::{Error, Result};
pub use mesh::{TriMesh, Triangle};
pub use plane::PlaneFrame;
pub use rect::Rectangle;
pub use volume::SweptVolume;
