// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for loading and replaying recordings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Gesture recording has no frames")]
    EmptyGesture,

    #[error("Frame {frame}: rotation quaternion has zero length")]
    ZeroRotation { frame: usize },

    #[error("Unknown containment strategy '{0}' (expected convex-polygon, convex-mesh or concave-volume)")]
    UnknownStrategy(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Selection failed: {0}")]
    Session(#[from] sweep_select_session::SessionError),
}
