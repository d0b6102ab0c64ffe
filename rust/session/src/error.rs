// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for selection sessions.

use crate::session::SessionState;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by [`crate::SelectionSession`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An operation was invoked out of sequence (e.g. `tick` while idle).
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The live poses did not produce usable geometry.
    #[error("selection geometry error: {0}")]
    Geometry(#[from] sweep_select_geometry::Error),
}
