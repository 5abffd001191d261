//! Per-scene configuration dump
//!
//! One flat object with every tunable of the run and the number of targets
//! the scene actually holds, written once per scene next to the frame
//! records.

use super::format::{fixed, quoted};
use crate::config::{AxisConstraints, GeneratorConfig, MotionProfile};
use std::path::Path;

enum Value {
    Text(String),
    Flag(bool),
    Count(u64),
    Real(f32),
    Missing,
}

impl Value {
    fn path(path: &Path) -> Self {
        Value::Text(path.to_string_lossy().into_owned())
    }

    fn render(&self) -> String {
        match self {
            Value::Text(text) => quoted(text),
            Value::Flag(flag) => flag.to_string(),
            Value::Count(count) => count.to_string(),
            Value::Real(real) => fixed(*real),
            Value::Missing => "null".to_string(),
        }
    }
}

fn constraint_fields(prefix: &str, constraints: &AxisConstraints, fields: &mut Vec<(String, Value)>) {
    for (axis, factor) in ["x", "y", "z"].iter().zip(constraints.as_array()) {
        fields.push((format!("{prefix}_{axis}"), Value::Real(factor)));
    }
}

fn motion_fields(class: &str, profile: &MotionProfile, fields: &mut Vec<(String, Value)>) {
    fields.push((format!("is_{class}_moving"), Value::Flag(profile.enabled)));
    fields.push((format!("{class}_move_coef"), Value::Real(profile.translation_coef)));
    fields.push((format!("{class}_rotation_coef"), Value::Real(profile.rotation_coef_degrees)));
    constraint_fields(&format!("{class}_move_constrain"), &profile.constraints, fields);
}

fn fields(config: &GeneratorConfig, placed_targets: u32) -> Vec<(String, Value)> {
    let paths = &config.paths;
    let assets = &config.assets;
    let placement = &config.placement;
    let initial = &config.motion.initial_orientation;

    let mut fields: Vec<(String, Value)> = vec![
        ("data_path_out".into(), Value::path(&config.output_dir())),
        ("data_path_objs".into(), Value::path(&paths.models)),
        ("data_path_bounds".into(), Value::path(&paths.bounds)),
        ("data_path_imgs".into(), Value::path(&paths.backgrounds)),
        ("filename_model_tag".into(), Value::Text(assets.model_name_tag.clone())),
        ("filename_background_tag".into(), Value::Text(assets.background_name_tag.clone())),
        ("is_format_obj".into(), Value::Flag(assets.format_obj)),
        ("is_format_stl".into(), Value::Flag(assets.format_stl)),
        ("is_format_ply".into(), Value::Flag(assets.format_ply)),
        ("is_format_3ds".into(), Value::Flag(assets.format_3ds)),
        ("is_shape_box".into(), Value::Flag(assets.shape_box)),
        ("is_shape_sphere".into(), Value::Flag(assets.shape_sphere)),
        ("is_random_number_of_models".into(), Value::Flag(placement.random_number_of_models)),
        ("is_randomize_the_use_of_models".into(), Value::Flag(assets.randomize_models)),
        ("is_randomize_the_use_of_images".into(), Value::Flag(assets.randomize_backgrounds)),
        ("numOfModels".into(), Value::Count(u64::from(placed_targets))),
        ("max_number_of_models".into(), Value::Count(u64::from(placement.max_number_of_models))),
        ("min_distance_from_camera".into(), Value::Real(placement.min_distance)),
        ("max_distance_from_camera".into(), Value::Real(placement.max_distance)),
        ("field_of_view_coef".into(), Value::Real(placement.fov_coef)),
        ("proximity_coef".into(), Value::Real(placement.proximity_coef)),
        ("is_init_target_moving".into(), Value::Flag(initial.enabled)),
        ("init_target_rotation_coef".into(), Value::Real(initial.rotation_coef_degrees)),
    ];
    constraint_fields("init_target_rot_constrain", &initial.constraints, &mut fields);
    motion_fields("target", &config.motion.target, &mut fields);
    motion_fields("background", &config.motion.background, &mut fields);
    motion_fields("camera", &config.motion.camera, &mut fields);

    fields.push(("run_iterations".into(), Value::Count(u64::from(config.run.iterations))));
    fields.push(("seed".into(), config.run.seed.map_or(Value::Missing, Value::Count)));
    fields
}

/// Render the configuration record of one scene
pub fn serialize_scene_config(config: &GeneratorConfig, placed_targets: u32) -> String {
    let body = fields(config, placed_targets)
        .iter()
        .map(|(name, value)| format!("  {}: {}", quoted(name), value.render()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n}}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as Json;

    fn parse(config: &GeneratorConfig, placed: u32) -> serde_json::Map<String, Json> {
        let value: Json = serde_json::from_str(&serialize_scene_config(config, placed)).unwrap();
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_every_tunable_is_present() {
        let object = parse(&GeneratorConfig::default(), 3);
        assert_eq!(object.len(), 46);
        assert_eq!(object["numOfModels"], 3);
        assert_eq!(object["max_number_of_models"], 5);
        assert_eq!(object["is_format_obj"], true);
        assert_eq!(object["is_background_moving"], false);
        assert_eq!(object["seed"], Json::Null);
        assert_eq!(object["data_path_out"], "output/data");
    }

    #[test]
    fn test_values_are_fixed_precision_text() {
        let config = GeneratorConfig::default().with_seed(42);
        let text = serialize_scene_config(&config, 0);

        assert!(text.starts_with("{\n  \"data_path_out\": "));
        assert!(text.contains("\"numOfModels\": 0,\n"));
        assert!(text.contains("\"field_of_view_coef\": 0.20,\n"));
        assert!(text.contains("\"init_target_rot_constrain_z\": 1.00,\n"));
        assert!(text.contains("\"target_rotation_coef\": 9.00,\n"));
        assert!(text.ends_with("\"seed\": 42\n}\n"));
    }

    #[test]
    fn test_key_order_is_stable() {
        let text = serialize_scene_config(&GeneratorConfig::default(), 1);
        let order = [
            "\"data_path_out\"",
            "\"is_shape_sphere\"",
            "\"numOfModels\"",
            "\"proximity_coef\"",
            "\"init_target_rot_constrain_x\"",
            "\"target_move_constrain_z\"",
            "\"background_move_coef\"",
            "\"camera_move_constrain_z\"",
            "\"run_iterations\"",
        ];
        let positions: Vec<usize> = order.iter().map(|key| text.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
