// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracked hand poses and the rectangle they span.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use sweep_select_geometry::{PlaneFrame, Rectangle, Result};

/// World position and orientation of one tracked hand or controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Pose with identity orientation (up = +Y)
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// The pose's local +Y axis in world space
    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// The pose's local +Z axis in world space
    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }
}

/// Both hands sampled at the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPoses {
    pub first: Pose,
    pub second: Pose,
}

impl HandPoses {
    pub fn new(first: Pose, second: Pose) -> Self {
        Self { first, second }
    }

    /// Plane through both hands, containing their averaged up direction.
    ///
    /// The first hand is the origin; the averaged up is the local Y axis.
    pub fn frame(&self) -> Result<PlaneFrame> {
        let up = (self.first.up() + self.second.up()) / 2.0;
        let origin = self.first.position;
        PlaneFrame::from_points(origin, self.second.position, origin + up, up)
    }

    /// Rectangle with the first hand at the top-left corner and the second
    /// at the bottom-right.
    ///
    /// # Errors
    /// [`sweep_select_geometry::Error::DegeneratePlane`] when the hands
    /// coincide, are lined up along the averaged up direction, or point
    /// their up axes in opposite directions.
    pub fn rectangle(&self) -> Result<Rectangle> {
        let frame = self.frame()?;
        Ok(Rectangle::from_corners(
            &frame,
            &self.first.position,
            &self.second.position,
        ))
    }
}

/// Live source of hand poses, sampled on start, every tick and on stop
pub trait PoseSource {
    fn sample(&mut self) -> HandPoses;
}

impl<F> PoseSource for F
where
    F: FnMut() -> HandPoses,
{
    fn sample(&mut self) -> HandPoses {
        self()
    }
}
