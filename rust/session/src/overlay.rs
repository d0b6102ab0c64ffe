// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live selection feedback for renderers.
//!
//! The overlay never feeds back into classification; a headless session can
//! run without a sink.

use nalgebra::Point3;
use sweep_select_geometry::Rectangle;

/// Wireframe of the box swept so far: the rectangle captured at start and
/// the most recent one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOverlay {
    pub start: Rectangle,
    pub current: Rectangle,
}

impl SweepOverlay {
    /// Number of points in [`SweepOverlay::line_strip`]
    pub const STRIP_LEN: usize = 16;

    pub fn new(start: Rectangle, current: Rectangle) -> Self {
        Self { start, current }
    }

    /// A single line strip that traces all 12 box edges.
    ///
    /// Walks the start rectangle, jumps to the current rectangle, walks it,
    /// then zig-zags between the two to draw the remaining connecting edges.
    pub fn line_strip(&self) -> [Point3<f64>; Self::STRIP_LEN] {
        let s = self.start.corners();
        let c = self.current.corners();
        [
            s[0], s[1], s[2], s[3], s[0], //
            c[0], c[1], c[2], c[3], c[0], //
            c[1], s[1], s[2], c[2], c[3], s[3],
        ]
    }
}

/// Receives overlay updates on start and on every tick
pub trait OverlaySink {
    fn show(&mut self, overlay: &SweepOverlay);

    /// Called once the selection finishes
    fn clear(&mut self) {}
}

impl<F> OverlaySink for F
where
    F: FnMut(&SweepOverlay),
{
    fn show(&mut self, overlay: &SweepOverlay) {
        self(overlay)
    }
}
