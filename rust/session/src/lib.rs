// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sweep Select Session
//!
//! Turns a two-handed gesture into a selection: the hands span a rectangle,
//! the rectangle is swept from where the gesture starts to where it stops,
//! and every candidate whose sample points all fall inside the swept volume
//! is selected.
//!
//! ```no_run
//! use sweep_select_session::{HandPoses, Pose, SelectionConfig, SelectionSession};
//! use sweep_select_geometry::Point3;
//!
//! let poses = || {
//!     HandPoses::new(
//!         Pose::at(Point3::new(-1.0, 1.0, 0.0)),
//!         Pose::at(Point3::new(1.0, -1.0, 0.0)),
//!     )
//! };
//! let config = SelectionConfig::new().with_candidates(|| vec![Point3::new(0.0, 0.0, 0.0)]);
//! let mut session = SelectionSession::new(config, poses);
//! session.start()?;
//! session.tick()?;
//! let selected = session.stop()?;
//! # Ok::<(), sweep_select_session::SessionError>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod overlay;
pub mod pose;
pub mod session;

pub use classify::select_contained;
pub use config::{
    default_sample_points, CandidateSource, PointExtractor, Selectable, SelectionConfig,
    SelectionKind, DEFAULT_PARALLEL_THRESHOLD,
};
pub use error::{Result, SessionError};
pub use overlay::{OverlaySink, SweepOverlay};
pub use pose::{HandPoses, Pose, PoseSource};
pub use session::{SelectionSession, SessionState};

// The strategy enum is part of the session configuration surface
pub use sweep_select_geometry::ContainmentStrategy;
