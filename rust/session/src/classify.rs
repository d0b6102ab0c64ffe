// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate classification against a finished swept volume.

use nalgebra::Point3;
use rayon::prelude::*;
use sweep_select_geometry::{ContainmentStrategy, Result, SweptVolume};

/// Keep the candidates whose sample points all lie inside `volume`.
///
/// Candidates without sample points are dropped. Order is preserved. At
/// `parallel_threshold` candidates or more the work is spread over the rayon
/// pool; the volume is only read.
pub fn select_contained<O, F>(
    volume: &SweptVolume,
    strategy: ContainmentStrategy,
    candidates: Vec<O>,
    sample_points: F,
    parallel_threshold: usize,
) -> Result<Vec<O>>
where
    O: Send,
    F: Fn(&O) -> Vec<Point3<f64>> + Sync,
{
    let keep = |candidate: O| -> Result<Option<O>> {
        let points = sample_points(&candidate);
        let inside = volume.contains_all(strategy, &points)?;
        Ok(inside.then_some(candidate))
    };

    let kept: Vec<Option<O>> = if candidates.len() >= parallel_threshold {
        candidates
            .into_par_iter()
            .map(keep)
            .collect::<Result<Vec<_>>>()?
    } else {
        candidates
            .into_iter()
            .map(keep)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(kept.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_select_geometry::{PlaneFrame, Rectangle, Vector3};

    fn cube_volume() -> SweptVolume {
        let rect = |z: f64| {
            let frame =
                PlaneFrame::new(Vector3::z(), Point3::new(0.0, 0.0, z), Vector3::y()).unwrap();
            Rectangle::from_corners(&frame, &Point3::new(0.0, 0.0, z), &Point3::new(1.0, 1.0, z))
        };
        SweptVolume::build(&rect(0.0), &rect(1.0))
    }

    /// (id, sample points)
    fn grid_candidates() -> Vec<(usize, Vec<Point3<f64>>)> {
        (0..200)
            .map(|i| {
                let x = (i % 20) as f64 * 0.1 - 0.45;
                let y = (i / 20) as f64 * 0.1 + 0.05;
                (i, vec![Point3::new(x, y, 0.5)])
            })
            .collect()
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let volume = cube_volume();
        let strategy = ContainmentStrategy::ConcaveVolume;
        let points = |c: &(usize, Vec<Point3<f64>>)| c.1.clone();

        let sequential =
            select_contained(&volume, strategy, grid_candidates(), points, usize::MAX).unwrap();
        let parallel = select_contained(&volume, strategy, grid_candidates(), points, 1).unwrap();

        let ids = |v: &[(usize, Vec<Point3<f64>>)]| v.iter().map(|c| c.0).collect::<Vec<_>>();
        assert!(!sequential.is_empty());
        assert_eq!(ids(&sequential), ids(&parallel));
        // Order follows the input
        assert!(ids(&parallel).windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_and_partial_candidates_are_dropped() {
        let volume = cube_volume();
        let candidates = vec![
            ("empty", vec![]),
            ("partial", vec![Point3::new(0.5, 0.5, 0.5), Point3::new(0.5, 0.5, 1.5)]),
            ("inside", vec![Point3::new(0.5, 0.5, 0.5), Point3::new(0.2, 0.8, 0.3)]),
        ];
        let kept = select_contained(
            &volume,
            ContainmentStrategy::ConcaveVolume,
            candidates,
            |c: &(&str, Vec<Point3<f64>>)| c.1.clone(),
            usize::MAX,
        )
        .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, "inside");
    }
}
