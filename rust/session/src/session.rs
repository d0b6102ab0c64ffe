// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The selection gesture state machine.
//!
//! A session runs `start`, any number of `tick`s, then `stop`, all on the
//! calling thread. Only the final classification may fan out to rayon.

use std::fmt;

use sweep_select_geometry::{Rectangle, SweptVolume};

use crate::classify::select_contained;
use crate::config::{default_sample_points, Selectable, SelectionConfig, SelectionKind};
use crate::error::{Result, SessionError};
use crate::overlay::{OverlaySink, SweepOverlay};
use crate::pose::PoseSource;

/// Externally visible session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Active => f.write_str("active"),
        }
    }
}

/// Transient state of the rectangle gesture
#[derive(Debug, Clone, Copy)]
struct RectangleSweep {
    first: Rectangle,
    latest: Rectangle,
}

/// Per-kind state while a gesture is running
#[derive(Debug, Clone, Copy)]
enum ActiveMode {
    Rectangle(RectangleSweep),
}

impl ActiveMode {
    fn begin(kind: SelectionKind, rect: Rectangle) -> Self {
        match kind {
            SelectionKind::Rectangle => ActiveMode::Rectangle(RectangleSweep {
                first: rect,
                latest: rect,
            }),
        }
    }

    fn overlay(&self) -> SweepOverlay {
        match self {
            ActiveMode::Rectangle(sweep) => SweepOverlay::new(sweep.first, sweep.latest),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active(ActiveMode),
}

type Subscriber<O> = Box<dyn FnMut(&[O]) + Send>;

/// Drives one selection gesture at a time from live hand poses to the list of
/// fully contained candidates.
///
/// Sessions are reusable: after `stop` the session is idle again and a new
/// gesture may start.
pub struct SelectionSession<O, P> {
    config: SelectionConfig<O>,
    poses: P,
    phase: Phase,
    overlay: Option<Box<dyn OverlaySink + Send>>,
    subscribers: Vec<Subscriber<O>>,
}

impl<O, P> SelectionSession<O, P>
where
    O: Selectable + Send,
    P: PoseSource,
{
    pub fn new(config: SelectionConfig<O>, poses: P) -> Self {
        Self {
            config,
            poses,
            phase: Phase::Idle,
            overlay: None,
            subscribers: Vec::new(),
        }
    }

    /// Attach a renderer for live feedback
    pub fn with_overlay<S>(mut self, sink: S) -> Self
    where
        S: OverlaySink + Send + 'static,
    {
        self.overlay = Some(Box::new(sink));
        self
    }

    /// Register a listener that receives every result `stop` produces,
    /// including empty ones.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[O]) + Send + 'static,
    {
        self.subscribers.push(Box::new(listener));
    }

    pub fn config(&self) -> &SelectionConfig<O> {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Active(_) => SessionState::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    /// Box swept so far, `None` while idle
    pub fn current_overlay(&self) -> Option<SweepOverlay> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Active(mode) => Some(mode.overlay()),
        }
    }

    /// Begin a gesture by capturing the first rectangle.
    ///
    /// Does nothing when a gesture is already running.
    ///
    /// # Errors
    /// [`SessionError::Geometry`] when the hands do not span a plane. The
    /// session stays idle.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            tracing::debug!("Selection already active, ignoring start");
            return Ok(());
        }

        let rect = self.poses.sample().rectangle()?;
        let mode = ActiveMode::begin(self.config.kind, rect);
        if let Some(sink) = self.overlay.as_mut() {
            sink.show(&mode.overlay());
        }
        self.phase = Phase::Active(mode);

        tracing::debug!(
            kind = ?self.config.kind,
            strategy = %self.config.strategy,
            "Selection started"
        );
        Ok(())
    }

    /// Resample the hands and refresh the overlay.
    ///
    /// A degenerate sample keeps the previous rectangle.
    pub fn tick(&mut self) -> Result<()> {
        let Phase::Active(mode) = &mut self.phase else {
            return Err(SessionError::InvalidState {
                operation: "tick",
                state: SessionState::Idle,
            });
        };

        let hands = self.poses.sample();
        match mode {
            ActiveMode::Rectangle(sweep) => match hands.rectangle() {
                Ok(rect) => sweep.latest = rect,
                Err(err) => tracing::trace!(error = %err, "Skipping degenerate hand sample"),
            },
        }

        if let Some(sink) = self.overlay.as_mut() {
            sink.show(&mode.overlay());
        }
        Ok(())
    }

    /// Finish the gesture and return the candidates fully inside the swept
    /// region.
    ///
    /// Subscribers are notified with the same list. If the final hand sample
    /// is degenerate the selection is abandoned and the result is empty.
    pub fn stop(&mut self) -> Result<Vec<O>> {
        let Phase::Active(mode) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return Err(SessionError::InvalidState {
                operation: "stop",
                state: SessionState::Idle,
            });
        };

        if let Some(sink) = self.overlay.as_mut() {
            sink.clear();
        }

        let selected = match self.finish(mode) {
            Ok(selected) => selected,
            Err(err) => {
                tracing::warn!(error = %err, "Selection aborted");
                Vec::new()
            }
        };

        for subscriber in &mut self.subscribers {
            subscriber(&selected);
        }
        Ok(selected)
    }

    fn finish(&mut self, mode: ActiveMode) -> sweep_select_geometry::Result<Vec<O>> {
        let hands = self.poses.sample();
        let volume = match mode {
            ActiveMode::Rectangle(sweep) => {
                let last = hands.rectangle()?;
                SweptVolume::build(&sweep.first, &last)
            }
        };

        let Some(source) = self.config.candidates.as_ref() else {
            tracing::warn!("No candidate source configured, selection is empty");
            return Ok(Vec::new());
        };
        let candidates = source();
        if candidates.is_empty() {
            tracing::debug!("Candidate source returned no objects");
            return Ok(Vec::new());
        }

        let candidate_count = candidates.len();
        let extractor = self.config.sample_points.as_deref();
        let sample_points = |object: &O| match extractor {
            Some(extract) => extract(object),
            None => default_sample_points(object),
        };

        let selected = select_contained(
            &volume,
            self.config.strategy,
            candidates,
            sample_points,
            self.config.parallel_threshold,
        )?;

        tracing::info!(
            candidates = candidate_count,
            selected = selected.len(),
            volume = volume.volume(),
            strategy = %self.config.strategy,
            "Selection finished"
        );
        Ok(selected)
    }
}

impl<O, P> fmt::Debug for SelectionSession<O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionSession")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("overlay", &self.overlay.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{HandPoses, Pose};
    use nalgebra::Point3;
    use std::sync::{Arc, Mutex};
    use sweep_select_geometry::ContainmentStrategy;

    fn hands_at(z: f64) -> HandPoses {
        HandPoses::new(
            Pose::at(Point3::new(-1.0, 1.0, z)),
            Pose::at(Point3::new(1.0, -1.0, z)),
        )
    }

    /// Replays the frames in order and then holds the last one
    struct Script {
        frames: Vec<HandPoses>,
        next: usize,
    }

    impl PoseSource for Script {
        fn sample(&mut self) -> HandPoses {
            let index = self.next.min(self.frames.len() - 1);
            self.next += 1;
            self.frames[index]
        }
    }

    fn sweep(frames: Vec<HandPoses>) -> Script {
        Script { frames, next: 0 }
    }

    fn markers() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 1.5),
            Point3::new(0.5, -0.5, 2.5),
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(2.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn tick_and_stop_require_an_active_session() {
        let mut session =
            SelectionSession::new(SelectionConfig::<Point3<f64>>::new(), sweep(vec![hands_at(0.0)]));
        assert!(matches!(
            session.tick(),
            Err(SessionError::InvalidState { operation: "tick", state: SessionState::Idle })
        ));
        assert!(matches!(
            session.stop(),
            Err(SessionError::InvalidState { operation: "stop", .. })
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn second_start_keeps_the_first_rectangle() {
        let mut session = SelectionSession::new(
            SelectionConfig::<Point3<f64>>::new(),
            sweep(vec![hands_at(0.0), hands_at(5.0)]),
        );
        session.start().unwrap();
        session.start().unwrap();
        assert!(session.is_active());

        let overlay = session.current_overlay().unwrap();
        assert_eq!(overlay.start.corner(0).z, 0.0);
        // The ignored start did not sample the poses
        session.tick().unwrap();
        assert_eq!(session.current_overlay().unwrap().current.corner(0).z, 5.0);
    }

    #[test]
    fn stop_selects_fully_contained_markers() {
        let config = SelectionConfig::new()
            .with_candidates(markers)
            .with_parallel_threshold(usize::MAX);
        let mut session =
            SelectionSession::new(config, sweep(vec![hands_at(0.0), hands_at(1.0), hands_at(3.0)]));

        session.start().unwrap();
        session.tick().unwrap();
        let selected = session.stop().unwrap();

        assert_eq!(
            selected,
            vec![Point3::new(0.0, 0.0, 1.5), Point3::new(0.5, -0.5, 2.5)]
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.current_overlay().is_none());
    }

    #[test]
    fn every_strategy_agrees_on_a_box_sweep() {
        for strategy in [
            ContainmentStrategy::ConvexPolygon,
            ContainmentStrategy::ConvexMesh,
            ContainmentStrategy::ConcaveVolume,
        ] {
            let config = SelectionConfig::new()
                .with_strategy(strategy)
                .with_candidates(|| vec![Point3::new(0.2, 0.1, 1.0), Point3::new(0.0, 0.0, -5.0)]);
            let mut session =
                SelectionSession::new(config, sweep(vec![hands_at(0.0), hands_at(2.0)]));
            assert_eq!(session.config().strategy, strategy);
            session.start().unwrap();
            let selected = session.stop().unwrap();
            assert_eq!(selected, vec![Point3::new(0.2, 0.1, 1.0)], "{strategy}");
        }
    }

    #[test]
    fn missing_candidate_source_selects_nothing() {
        let mut session = SelectionSession::new(
            SelectionConfig::<Point3<f64>>::new(),
            sweep(vec![hands_at(0.0), hands_at(2.0)]),
        );
        session.start().unwrap();
        assert!(session.stop().unwrap().is_empty());
    }

    #[test]
    fn degenerate_start_leaves_session_idle() {
        let stacked = HandPoses::new(
            Pose::at(Point3::new(0.0, 0.0, 0.0)),
            Pose::at(Point3::new(0.0, 2.0, 0.0)),
        );
        let mut session =
            SelectionSession::new(SelectionConfig::<Point3<f64>>::new(), sweep(vec![stacked]));
        assert!(matches!(session.start(), Err(SessionError::Geometry(_))));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn degenerate_tick_keeps_last_rectangle() {
        let coincident = HandPoses::new(Pose::at(Point3::origin()), Pose::at(Point3::origin()));
        let mut session = SelectionSession::new(
            SelectionConfig::<Point3<f64>>::new(),
            sweep(vec![hands_at(0.0), hands_at(1.0), coincident]),
        );
        session.start().unwrap();
        session.tick().unwrap();
        session.tick().unwrap();
        let overlay = session.current_overlay().unwrap();
        assert_eq!(overlay.current.corner(0), Point3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn degenerate_stop_aborts_with_empty_result() {
        let coincident = HandPoses::new(Pose::at(Point3::origin()), Pose::at(Point3::origin()));
        let notified = Arc::new(Mutex::new(Vec::new()));

        let config = SelectionConfig::new().with_candidates(markers);
        let mut session =
            SelectionSession::new(config, sweep(vec![hands_at(0.0), coincident]));
        let sink = Arc::clone(&notified);
        session.subscribe(move |selected: &[Point3<f64>]| {
            sink.lock().unwrap().push(selected.len());
        });

        session.start().unwrap();
        assert!(session.stop().unwrap().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(*notified.lock().unwrap(), vec![0]);
    }

    #[test]
    fn session_can_run_again_after_stop() {
        let config = SelectionConfig::new().with_candidates(markers);
        let mut session = SelectionSession::new(
            config,
            sweep(vec![hands_at(0.0), hands_at(3.0), hands_at(3.0), hands_at(5.0)]),
        );
        session.start().unwrap();
        assert_eq!(session.stop().unwrap().len(), 2);

        session.start().unwrap();
        // 3..5 contains only the marker at z = 4
        assert_eq!(session.stop().unwrap(), vec![Point3::new(0.0, 0.0, 4.0)]);
    }

    #[test]
    fn display_names_states() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        let err = SessionError::InvalidState {
            operation: "tick",
            state: SessionState::Idle,
        };
        assert_eq!(err.to_string(), "cannot tick while the session is idle");
    }
}
