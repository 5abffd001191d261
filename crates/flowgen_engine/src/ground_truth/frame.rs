//! Per-frame ground-truth record
//!
//! Three top-level blocks separated by `,\n`: background, camera, targets.
//! Each block is an object holding a list of single-entry objects:
//!
//! ```text
//! {"background": [
//!   {"location": [0.00, 30.00, 0.00]},
//!   ...
//! ]},
//! {"camera": [ ... ]},
//! {"targets": [
//!   {"target.BOX.10000001": [ ... ]}
//! ]}
//! ```
//!
//! Only absolute target rotations are written with `-90°` on X, which undoes
//! the base pitch every target receives on placement. Deltas, camera and
//! background are written as stored.

use super::format::{entry, euler, quoted, vector};
use crate::foundation::math::{constants, Vec3};
use crate::scene::Pose;

/// Background state at capture time
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSnapshot {
    /// Pose of the background plane
    pub pose: Pose,
    /// Image file the plane was created from
    pub file: String,
}

/// Target state at capture time
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot {
    /// Unique target name
    pub id: String,
    /// Pose of the target
    pub pose: Pose,
}

/// Everything one frame record is built from
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Camera pose
    pub camera: Pose,
    /// Background plane
    pub background: BackgroundSnapshot,
    /// Placed targets in placement order
    pub targets: Vec<TargetSnapshot>,
}

fn block(name: &str, entries: &[String], indent: usize) -> String {
    let pad = " ".repeat(indent + 2);
    let body = entries
        .iter()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{}{{{}: [\n{}\n{}]}}", " ".repeat(indent), quoted(name), body, " ".repeat(indent))
}

fn reference_entries(pose: &Pose) -> Vec<String> {
    vec![
        entry("location", &vector(&pose.location)),
        entry("location_delta", &vector(&pose.delta_location)),
        entry("rotation_euler", &euler(&pose.rotation.angles, pose.rotation.order)),
        entry("rotation_euler_delta", &euler(&pose.delta_rotation, pose.rotation.order)),
    ]
}

fn target_entries(target: &Pose, camera_location: &Vec3) -> Vec<String> {
    let compensated = target.rotation.angles - Vec3::new(constants::HALF_PI, 0.0, 0.0);
    vec![
        entry("location", &vector(&target.location)),
        entry("rotation_euler", &euler(&compensated, target.rotation.order)),
        entry("location_from_cam", &vector(&(target.location - camera_location))),
        entry("location_delta", &vector(&target.delta_location)),
        entry("rotation_euler_delta", &euler(&target.delta_rotation, target.rotation.order)),
        entry("location_from_cam_delta", &vector(&(target.moved_location() - camera_location))),
    ]
}

/// Render the frame record
pub fn serialize_frame(frame: &FrameSnapshot) -> String {
    let mut background = reference_entries(&frame.background.pose);
    background.push(entry("background_file", &quoted(&frame.background.file)));

    let targets: Vec<String> = frame
        .targets
        .iter()
        .map(|target| {
            let entries = target_entries(&target.pose, &frame.camera.location);
            block(&target.id, &entries, 2).trim_start().to_string()
        })
        .collect();

    let target_block = if targets.is_empty() {
        format!("{{{}: []}}", quoted("targets"))
    } else {
        block("targets", &targets, 0)
    };

    format!(
        "{},\n{},\n{}\n",
        block("background", &background, 0),
        block("camera", &reference_entries(&frame.camera), 0),
        target_block
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{EulerOrder, EulerRotation};
    use serde_json::Value;

    fn snapshot(targets: usize) -> FrameSnapshot {
        let camera = Pose::new(
            Vec3::new(1.0, -2.0, 0.5),
            EulerRotation::from_degrees(Vec3::new(90.0, 0.0, 0.0), EulerOrder::XYZ),
        )
        .with_delta(Vec3::new(0.25, 0.0, 0.0), Vec3::new(0.0, 0.01, 0.0));

        FrameSnapshot {
            camera,
            background: BackgroundSnapshot {
                pose: Pose::new(Vec3::new(0.3, 30.0, -0.2), camera.rotation),
                file: "backgrounds/sky \"blue\".png".to_string(),
            },
            targets: (0..targets)
                .map(|i| TargetSnapshot {
                    id: format!("target.BOX.{}", 10_000_001 + i),
                    pose: Pose::new(
                        Vec3::new(i as f32 - 1.234, 12.0 + i as f32, 0.456),
                        EulerRotation::from_degrees(Vec3::new(100.0, 5.0, -20.0), EulerOrder::XYZ),
                    )
                    .with_delta(Vec3::new(0.1, -0.2, 0.3), Vec3::new(0.05, 0.0, -0.05)),
                })
                .collect(),
        }
    }

    fn parse(text: &str) -> Vec<Value> {
        let value: Value = serde_json::from_str(&format!("[{text}]")).unwrap();
        value.as_array().unwrap().clone()
    }

    fn field<'a>(entries: &'a Value, name: &str) -> &'a Value {
        entries
            .as_array()
            .unwrap()
            .iter()
            .find_map(|item| item.get(name))
            .unwrap()
    }

    fn triple(value: &Value) -> [f64; 3] {
        let items = value.as_array().unwrap();
        [items[0].as_f64().unwrap(), items[1].as_f64().unwrap(), items[2].as_f64().unwrap()]
    }

    fn assert_two_decimals(actual: [f64; 3], expected: Vec3) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - f64::from(*e)).abs() <= 0.005 + 1e-6, "{a} vs {e}");
        }
    }

    #[test]
    fn test_record_reparses_with_expected_blocks() {
        let frame = snapshot(2);
        let blocks = parse(&serialize_frame(&frame));

        assert_eq!(blocks.len(), 3);
        let background = &blocks[0]["background"];
        assert_eq!(field(background, "background_file"), "backgrounds/sky \"blue\".png");
        assert_two_decimals(triple(field(background, "location")), frame.background.pose.location);

        let camera = &blocks[1]["camera"];
        assert_eq!(camera.as_array().unwrap().len(), 4);
        assert_two_decimals(triple(field(camera, "location_delta")), frame.camera.delta_location);
        // Camera rotation is never compensated
        assert_two_decimals(
            triple(&field(camera, "rotation_euler")["value"]),
            frame.camera.rotation.angles,
        );

        let targets = blocks[2]["targets"].as_array().unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_target_fields() {
        let frame = snapshot(1);
        let blocks = parse(&serialize_frame(&frame));
        let target = &frame.targets[0];
        let entries = &blocks[2]["targets"][0][target.id.as_str()];

        assert_eq!(entries.as_array().unwrap().len(), 6);
        assert_two_decimals(triple(field(entries, "location")), target.pose.location);
        assert_two_decimals(
            triple(field(entries, "location_from_cam")),
            target.pose.location - frame.camera.location,
        );
        assert_two_decimals(
            triple(field(entries, "location_from_cam_delta")),
            target.pose.location + target.pose.delta_location - frame.camera.location,
        );

        let rotation = field(entries, "rotation_euler");
        assert_eq!(rotation["order"], "XYZ");
        let compensated = target.pose.rotation.angles - Vec3::new(constants::HALF_PI, 0.0, 0.0);
        assert_two_decimals(triple(&rotation["value"]), compensated);
        // Deltas are differential and stay uncompensated
        assert_two_decimals(triple(&field(entries, "rotation_euler_delta")["value"]), target.pose.delta_rotation);
    }

    #[test]
    fn test_scene_without_targets_is_still_valid() {
        let blocks = parse(&serialize_frame(&snapshot(0)));
        assert_eq!(blocks[2]["targets"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_values_are_written_with_two_decimals() {
        let text = serialize_frame(&snapshot(1));
        assert!(text.contains("{\"location\": [-1.23, 12.00, 0.46]}"));
        assert!(!text.contains(",\n]"));
        assert!(text.ends_with("]}\n"));
    }
}
