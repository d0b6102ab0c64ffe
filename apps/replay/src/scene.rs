// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene and gesture recordings.
//!
//! Vectors are `[x, y, z]` arrays; rotations are `[x, y, z, w]` quaternions.

use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};
use sweep_select_geometry::Point3;
use sweep_select_session::{HandPoses, Pose, PoseSource, Selectable};

use crate::error::ReplayError;

/// One object in the replayed scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Object type, the fallback filter when no tag is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub position: [f64; 3],
    /// World-space vertices when the object has geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<[f64; 3]>>,
}

impl SceneObject {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_kind_of(&self, kinds: &[String]) -> bool {
        self.kind
            .as_ref()
            .is_some_and(|kind| kinds.iter().any(|k| k == kind))
    }
}

impl Selectable for SceneObject {
    fn position(&self) -> Point3<f64> {
        Point3::from(self.position)
    }

    fn world_vertices(&self) -> Option<Vec<Point3<f64>>> {
        self.vertices
            .as_ref()
            .map(|vertices| vertices.iter().copied().map(Point3::from).collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Objects carrying `tag`, in scene order
    pub fn tagged(&self, tag: &str) -> Vec<SceneObject> {
        self.objects
            .iter()
            .filter(|object| object.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Objects whose kind is one of `kinds`, in scene order
    pub fn of_kinds(&self, kinds: &[String]) -> Vec<SceneObject> {
        self.objects
            .iter()
            .filter(|object| object.is_kind_of(kinds))
            .cloned()
            .collect()
    }

    /// Candidates by tag when one is given, otherwise by kind.
    ///
    /// `None` when neither filter is configured.
    pub fn candidates(&self, tag: Option<&str>, kinds: &[String]) -> Option<Vec<SceneObject>> {
        match tag {
            Some(tag) => Some(self.tagged(tag)),
            None if !kinds.is_empty() => Some(self.of_kinds(kinds)),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandSample {
    pub position: [f64; 3],
    /// Identity when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 4]>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GestureFrame {
    pub hand1: HandSample,
    pub hand2: HandSample,
}

/// Recorded gesture: the first frame starts the selection, the last one
/// stops it and every frame in between is a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gesture {
    pub frames: Vec<GestureFrame>,
}

impl Gesture {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let gesture: Self = serde_json::from_str(json)?;
        if gesture.frames.is_empty() {
            return Err(ReplayError::EmptyGesture);
        }
        Ok(gesture)
    }

    /// Convert every frame into hand poses up front so playback cannot fail
    pub fn playback(&self) -> Result<Playback, ReplayError> {
        let frames = self
            .frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                Ok(HandPoses::new(
                    to_pose(&frame.hand1, index)?,
                    to_pose(&frame.hand2, index)?,
                ))
            })
            .collect::<Result<Vec<_>, ReplayError>>()?;
        if frames.is_empty() {
            return Err(ReplayError::EmptyGesture);
        }
        Ok(Playback { frames, next: 0 })
    }
}

fn to_pose(sample: &HandSample, frame: usize) -> Result<Pose, ReplayError> {
    let position = Point3::from(sample.position);
    let Some([x, y, z, w]) = sample.rotation else {
        return Ok(Pose::at(position));
    };
    let quaternion = Quaternion::new(w, x, y, z);
    if !(quaternion.norm() > f64::EPSILON) {
        return Err(ReplayError::ZeroRotation { frame });
    }
    Ok(Pose::new(position, UnitQuaternion::from_quaternion(quaternion)))
}

/// Pose source that steps through a recording and holds the last frame
#[derive(Debug, Clone)]
pub struct Playback {
    frames: Vec<HandPoses>,
    next: usize,
}

impl Playback {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl PoseSource for Playback {
    fn sample(&mut self) -> HandPoses {
        let index = self.next.min(self.frames.len() - 1);
        self.next += 1;
        self.frames[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "objects": [
            { "name": "lamp", "tags": ["Selectable"], "position": [0.0, 0.0, 1.0] },
            { "name": "wall", "kind": "Structure", "position": [0.0, 0.0, 1.0] },
            {
                "name": "box",
                "tags": ["Selectable", "Prop"],
                "kind": "Furniture",
                "position": [0.0, 0.0, 1.0],
                "vertices": [[0.1, 0.1, 0.9], [-0.1, -0.1, 1.1]]
            }
        ]
    }"#;

    #[test]
    fn scene_filters_by_tag() {
        let scene = Scene::from_json(SCENE).unwrap();
        let names: Vec<_> = scene.tagged("Selectable").into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["lamp", "box"]);
        assert!(scene.tagged("Missing").is_empty());
    }

    #[test]
    fn kinds_filter_only_without_a_tag() {
        let scene = Scene::from_json(SCENE).unwrap();
        let kinds = vec!["Structure".to_string(), "Furniture".to_string()];
        let names = |objects: Vec<SceneObject>| -> Vec<String> {
            objects.into_iter().map(|o| o.name).collect()
        };

        assert_eq!(names(scene.of_kinds(&kinds)), vec!["wall", "box"]);
        assert_eq!(
            names(scene.candidates(Some("Prop"), &kinds).unwrap()),
            vec!["box"]
        );
        assert_eq!(
            names(scene.candidates(None, &kinds).unwrap()),
            vec!["wall", "box"]
        );
        assert!(scene.candidates(None, &[]).is_none());
    }

    #[test]
    fn sample_points_come_from_vertices_when_present() {
        let scene = Scene::from_json(SCENE).unwrap();
        let lamp = &scene.objects[0];
        let boxed = &scene.objects[2];
        assert!(lamp.world_vertices().is_none());
        assert_eq!(lamp.position(), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(boxed.world_vertices().unwrap().len(), 2);
    }

    #[test]
    fn gesture_needs_frames() {
        assert!(matches!(
            Gesture::from_json(r#"{ "frames": [] }"#),
            Err(ReplayError::EmptyGesture)
        ));
        assert!(matches!(
            Gesture::from_json("not json"),
            Err(ReplayError::Json(_))
        ));
    }

    #[test]
    fn zero_quaternion_is_rejected() {
        let gesture = Gesture::from_json(
            r#"{ "frames": [
                { "hand1": { "position": [0, 0, 0] }, "hand2": { "position": [1, 1, 0] } },
                { "hand1": { "position": [0, 0, 0], "rotation": [0, 0, 0, 0] },
                  "hand2": { "position": [1, 1, 0] } }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            gesture.playback(),
            Err(ReplayError::ZeroRotation { frame: 1 })
        ));
    }

    #[test]
    fn playback_holds_last_frame() {
        let gesture = Gesture::from_json(
            r#"{ "frames": [
                { "hand1": { "position": [0, 0, 0] }, "hand2": { "position": [1, 1, 0] } },
                { "hand1": { "position": [0, 0, 2] }, "hand2": { "position": [1, 1, 2] } }
            ] }"#,
        )
        .unwrap();
        let mut playback = gesture.playback().unwrap();
        assert_eq!(playback.frame_count(), 2);
        assert_eq!(playback.sample().first.position.z, 0.0);
        assert_eq!(playback.sample().first.position.z, 2.0);
        assert_eq!(playback.sample().first.position.z, 2.0);
    }
}
