// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use sweep_select_geometry::{
    ContainmentStrategy, PlaneFrame, Point2, Point3, Rectangle, SweptVolume, UnitQuaternion,
    Vector3,
};

/// Rectangle a pair of hands would produce: frame through both hands and
/// `first + up`, corners at the hands.
fn hand_rect(first: Point3<f64>, second: Point3<f64>, up: Vector3<f64>) -> Rectangle {
    let frame = PlaneFrame::from_points(first, second, first + up, up).unwrap();
    Rectangle::from_corners(&frame, &first, &second)
}

#[test]
fn tilted_gesture_volume_is_closed_and_selects_interior() {
    let tilt = UnitQuaternion::from_euler_angles(0.2, 0.4, -0.3);
    let up = tilt * Vector3::y();

    let start = hand_rect(
        Point3::new(-1.0, 1.5, 0.0),
        Point3::new(1.0, 0.5, 0.0),
        up,
    );
    let end = hand_rect(
        Point3::new(-1.0, 1.5, 3.0),
        Point3::new(1.0, 0.5, 3.0),
        up,
    );
    let volume = SweptVolume::build(&start, &end);

    assert_eq!(volume.mesh().triangle_count(), 12);
    assert!(volume.mesh().is_watertight());
    assert!(volume.volume() > 0.0);

    let mid = Point3::from((start.centroid().coords + end.centroid().coords) * 0.5);
    for strategy in [
        ContainmentStrategy::ConvexPolygon,
        ContainmentStrategy::ConvexMesh,
        ContainmentStrategy::ConcaveVolume,
    ] {
        assert!(volume.contains(strategy, &mid).unwrap(), "{strategy}");
    }

    let far = mid + Vector3::new(0.0, 0.0, 50.0);
    assert!(!volume
        .contains(ContainmentStrategy::ConcaveVolume, &far)
        .unwrap());
    assert!(!volume.contains(ContainmentStrategy::ConvexMesh, &far).unwrap());
}

#[test]
fn rotated_sweep_stays_closed() {
    // End rectangle turned a quarter around the sweep direction: side faces
    // twist but every edge is still shared twice.
    let start = hand_rect(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, -1.0, 0.0),
        Vector3::y(),
    );
    let end = hand_rect(
        Point3::new(0.0, 0.0, 4.0),
        Point3::new(1.0, -2.0, 4.0),
        Vector3::new(1.0, 0.0, 0.0),
    );
    let volume = SweptVolume::build(&start, &end);
    assert!(volume.mesh().is_watertight());
    assert_eq!(volume.mesh().boundary_edge_count(), 0);
}

#[test]
fn frame_through_hands_maps_unit_square() {
    let frame = PlaneFrame::from_points(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Vector3::y(),
    )
    .unwrap();
    let world = frame.transform_to_world(&Point2::new(1.0, 1.0));
    assert_relative_eq!(world, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
}

#[test]
fn convex_mesh_result_flips_once_along_outward_ray() {
    let start = hand_rect(
        Point3::new(0.0, 2.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Vector3::y(),
    );
    let end = hand_rect(
        Point3::new(0.0, 2.0, 2.0),
        Point3::new(2.0, 0.0, 2.0),
        Vector3::y(),
    );
    let volume = SweptVolume::build(&start, &end);
    let center = volume.mesh().centroid().unwrap();

    for dir in sweep_select_geometry::lattice_directions() {
        let mut previous = true;
        for step in 0..300 {
            let p = center + dir * (step as f64 * 0.01);
            let inside = volume.contains(ContainmentStrategy::ConvexMesh, &p).unwrap();
            assert!(previous || !inside, "re-entered along {dir:?}");
            previous = inside;
        }
        assert!(!previous, "never left along {dir:?}");
    }
}
