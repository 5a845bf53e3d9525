// Class definition files: loading, validation, persistence and per point cloud overrides
mod test_helpers;

use cloudlabel::{ClassRegistry, Color, LabelError, LabelingMode, ValidationError};
use proptest::prelude::*;
use serde_json::Value;
use std::path::Path;
use test_helpers::*;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_missing_file_falls_back_to_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("_classes.json");

    let registry = ClassRegistry::load(&path).unwrap();
    assert_eq!(registry.class_names(), vec!["cart".to_string()]);
    assert_eq!(registry.default_id(), 0);
    assert_eq!(registry.default_class_name(), "cart");
    assert_eq!(registry.class_color("cart"), Color::RED);
    assert_eq!(registry.labeling_mode(), LabelingMode::ObjectDetection);
    assert_eq!(registry.label_format(), "centroid_rel");
    assert_eq!(registry.source(), Some(path.as_path()));
}

#[test]
fn test_save_keeps_optional_and_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("_classes.json");
    write_file(
        &source,
        r##"{
            "classes": [
                {"name": "cup", "id": 3, "color": "#00ff00", "vertex_mask": [1, 2]},
                {"name": "hand", "id": 7, "color": "#0000ff",
                 "top_level_object": "person", "acted_on_object": "cup"}
            ],
            "default": 7,
            "type": "object_detection",
            "format": "vertices"
        }"##,
    );

    let registry = ClassRegistry::load(&source).unwrap();
    assert_eq!(registry.default_class_name(), "hand");
    assert_eq!(registry.vertex_mask(), Some(vec![1, 2]));
    let target = dir.path().join("out").join("classes.json");
    registry.save_to(&target).unwrap();

    let written = read_json(&target);
    let original = read_json(&source);
    assert_eq!(written["classes"], original["classes"]);
    assert_eq!(written["default"], 7);
    assert_eq!(written["type"], "object_detection");
    assert_eq!(written["format"], "vertices");
    assert!(written["classes"][0].get("top_level_object").is_none());
    assert!(written["classes"][0].get("new_top_level_label").is_none());
    assert_eq!(written["created_with"]["name"], "cloudlabel");

    // The written file loads back to the same registry.
    let reloaded = ClassRegistry::load(&target).unwrap();
    assert_eq!(reloaded.classes(), registry.classes());
}

#[test]
fn test_invalid_file_keeps_previous_registry() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    let duplicate = dir.path().join("duplicate.json");
    let no_default = dir.path().join("no_default.json");
    let empty = dir.path().join("empty.json");
    write_file(&good, &class_file(&[("car", 0), ("bus", 1)], 1));
    write_file(&duplicate, &class_file(&[("car", 0), ("bus", 0)], 0));
    write_file(&no_default, &class_file(&[("car", 0)], 4));
    write_file(&empty, &class_file(&[], 0));

    let mut registry = ClassRegistry::load(&good).unwrap();

    let err = registry.reload(&duplicate).unwrap_err();
    assert!(matches!(err, LabelError::Validation(ValidationError::DuplicateIds)));
    let err = registry.reload(&no_default).unwrap_err();
    assert!(matches!(err, LabelError::Validation(ValidationError::DefaultIdMissing(4))));
    let err = registry.reload(&empty).unwrap_err();
    assert!(matches!(err, LabelError::Validation(ValidationError::NoClasses)));

    assert_eq!(registry.class_names(), vec!["car".to_string(), "bus".to_string()]);
    assert_eq!(registry.default_class_name(), "bus");
    assert_eq!(registry.source(), Some(good.as_path()));
}

#[test]
fn test_malformed_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    write_file(&path, "{ \"classes\": [");
    assert!(matches!(ClassRegistry::load(&path), Err(LabelError::Json(_))));
}

#[test]
fn test_default_and_color_changes_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("_classes.json");
    write_file(&path, &class_file(&[("car", 0), ("bus", 1)], 0));

    let mut registry = ClassRegistry::load(&path).unwrap();
    registry.set_default("bus").unwrap();
    registry.set_color("car", Color::from_rgb_u8(0x12, 0x34, 0xab)).unwrap();

    let written = read_json(&path);
    assert_eq!(written["default"], 1);
    assert_eq!(written["classes"][0]["color"], "#1234ab");

    assert!(matches!(registry.set_default("tram"), Err(LabelError::UnknownClass(_))));
    assert_eq!(read_json(&path)["default"], 1);
}

#[test]
fn test_pointcloud_override_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    let labels = dir.path().join("labels");
    let default_path = labels.join("_classes.json");
    write_file(&default_path, &class_file(&[("car", 0)], 0));
    write_file(&labels.join("kitchen_classes_01.json"), &class_file(&[("cup", 5), ("plate", 6)], 6));

    let pcd = dir.path().join("pointclouds").join("kitchen_laser_scan_01.ply");
    let (registry, overridden) = ClassRegistry::load_for_pointcloud(&default_path, &labels, &pcd).unwrap();
    assert!(overridden);
    assert_eq!(registry.default_class_name(), "plate");

    let other = dir.path().join("pointclouds").join("garage.ply");
    let (registry, overridden) = ClassRegistry::load_for_pointcloud(&default_path, &labels, &other).unwrap();
    assert!(!overridden);
    assert_eq!(registry.class_names(), vec!["car".to_string()]);
}

#[test]
fn test_relative_walks_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("_classes.json");
    write_file(&path, &class_file(&[("a", 2), ("b", 3), ("c", 9)], 2));
    let registry = ClassRegistry::load(&path).unwrap();

    assert_eq!(registry.relative("a", 1).unwrap().name, "b");
    assert_eq!(registry.relative("b", 1).unwrap().name, "a");
    assert_eq!(registry.relative("a", -1).unwrap().name, "c");
    assert_eq!(registry.relative("c", 0).unwrap().name, "c");
    assert!(registry.relative("z", 1).is_err());
}

proptest! {
    #[test]
    fn prop_order_lookup_matches_positions(ids in prop::collection::btree_set(0u32..64, 1..12), reverse in any::<bool>()) {
        let mut ids: Vec<u32> = ids.into_iter().collect();
        if reverse {
            ids.reverse();
        }
        let classes = ids
            .iter()
            .map(|id| cloudlabel::ClassDefinition::new(format!("class_{id}"), *id, Color::RED))
            .collect();
        let registry = ClassRegistry::new(classes, ids[0], LabelingMode::ObjectDetection, "vertices").unwrap();

        let lookup = registry.order_lookup();
        for (position, class) in registry.classes().iter().enumerate() {
            prop_assert_eq!(lookup[class.id as usize], position as i32);
        }
        prop_assert_eq!(lookup.iter().filter(|&&p| p >= 0).count(), ids.len());
        prop_assert_eq!(registry.default_class_name(), format!("class_{}", ids[0]));
    }
}
