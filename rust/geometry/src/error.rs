// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for selection geometry.

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building frames, volumes or running containment tests
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The plane frame has no usable right axis: the normal is zero or `up`
    /// is parallel to it.
    #[error("degenerate plane frame: {0}")]
    DegeneratePlane(&'static str),

    /// A polygon containment test needs at least three vertices.
    #[error("polygon needs at least 3 points, got {count}")]
    InsufficientPoints { count: usize },

    /// Index buffer is ragged or references a missing vertex.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
