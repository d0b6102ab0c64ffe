// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration and the candidate object contract.

use nalgebra::Point3;
use sweep_select_geometry::ContainmentStrategy;

/// Returns the objects currently eligible for selection
pub type CandidateSource<O> = Box<dyn Fn() -> Vec<O> + Send + Sync>;

/// Maps a candidate to the world points that must all be inside the region
pub type PointExtractor<O> = Box<dyn Fn(&O) -> Vec<Point3<f64>> + Send + Sync>;

/// Default number of candidates at which classification moves to the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Scene object that can be selected.
///
/// The default sample points are the full world vertex set when the object
/// has geometry, otherwise its single position.
pub trait Selectable {
    fn position(&self) -> Point3<f64>;

    fn world_vertices(&self) -> Option<Vec<Point3<f64>>> {
        None
    }
}

impl Selectable for Point3<f64> {
    fn position(&self) -> Point3<f64> {
        *self
    }
}

/// Default sample-point policy, see [`Selectable`]
pub fn default_sample_points<O: Selectable>(object: &O) -> Vec<Point3<f64>> {
    object
        .world_vertices()
        .unwrap_or_else(|| vec![object.position()])
}

/// Gesture used to shape the selection region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    /// Rectangle spanned between the two hands, swept from where the gesture
    /// starts to where it stops
    #[default]
    Rectangle,
}

/// Everything a [`crate::SelectionSession`] needs besides live poses
pub struct SelectionConfig<O> {
    pub kind: SelectionKind,
    pub strategy: ContainmentStrategy,
    /// `None` selects nothing and logs a warning on every stop
    pub candidates: Option<CandidateSource<O>>,
    /// `None` uses [`default_sample_points`]
    pub sample_points: Option<PointExtractor<O>>,
    pub parallel_threshold: usize,
}

impl<O> Default for SelectionConfig<O> {
    fn default() -> Self {
        Self {
            kind: SelectionKind::default(),
            strategy: ContainmentStrategy::default(),
            candidates: None,
            sample_points: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl<O> SelectionConfig<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: SelectionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_strategy(mut self, strategy: ContainmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_candidates<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Vec<O> + Send + Sync + 'static,
    {
        self.candidates = Some(Box::new(source));
        self
    }

    pub fn with_sample_points<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&O) -> Vec<Point3<f64>> + Send + Sync + 'static,
    {
        self.sample_points = Some(Box::new(extractor));
        self
    }

    /// Candidate count at which classification runs in parallel.
    /// `usize::MAX` keeps it on the calling thread.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl<O> std::fmt::Debug for SelectionConfig<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionConfig")
            .field("kind", &self.kind)
            .field("strategy", &self.strategy)
            .field("candidates", &self.candidates.is_some())
            .field("sample_points", &self.sample_points.is_some())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}
