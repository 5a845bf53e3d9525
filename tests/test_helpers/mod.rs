// Test helper functions for creating test scenarios
#![allow(dead_code)]

use cloudlabel::{
    AppConfig, BBox, BoxController, ClassDefinition, ClassDisplay, ClassRegistry, Color, Display,
    LabelError, LabelResult, LabelStore, LabelingMode, StatusMode,
};
use glam::Vec3;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Display that remembers everything pushed to it.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub label_lists: Vec<(Vec<String>, Option<usize>)>,
    pub stats: Vec<Option<BBox>>,
    pub classes: Vec<ClassDisplay>,
    pub messages: Vec<(String, StatusMode)>,
}

impl RecordingDisplay {
    pub fn last_class(&self) -> &ClassDisplay {
        self.classes.last().expect("class display was never refreshed")
    }

    pub fn last_label_list(&self) -> &(Vec<String>, Option<usize>) {
        self.label_lists.last().expect("label list was never refreshed")
    }

    pub fn warnings(&self) -> usize {
        self.messages.iter().filter(|(_, mode)| *mode == StatusMode::Warning).count()
    }
}

impl Display for RecordingDisplay {
    fn refresh_label_list(&mut self, class_names: &[String], active: Option<usize>) {
        self.label_lists.push((class_names.to_vec(), active));
    }

    fn refresh_active_box_stats(&mut self, bbox: Option<&BBox>) {
        self.stats.push(bbox.cloned());
    }

    fn refresh_class_display(&mut self, class: &ClassDisplay) {
        self.classes.push(class.clone());
    }

    fn notify(&mut self, message: &str, mode: StatusMode) {
        self.messages.push((message.to_string(), mode));
    }
}

/// Label files kept in memory, keyed by point cloud path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub labels: HashMap<PathBuf, Vec<BBox>>,
    pub exported: HashMap<PathBuf, Vec<BBox>>,
    pub unreadable: Vec<PathBuf>,
}

impl LabelStore for MemoryStore {
    fn import_labels(&mut self, pcd_path: &Path) -> LabelResult<Vec<BBox>> {
        if self.unreadable.iter().any(|p| p == pcd_path) {
            return Err(LabelError::Io(std::io::Error::other("unreadable label file")));
        }
        Ok(self.labels.get(pcd_path).cloned().unwrap_or_default())
    }

    fn export_labels(&mut self, pcd_path: &Path, boxes: &[BBox]) -> LabelResult<()> {
        self.exported.insert(pcd_path.to_path_buf(), boxes.to_vec());
        Ok(())
    }
}

/// Route engine logs to the test output; safe to call from every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Registry with one class per name, ids counting up from 0, first is default.
pub fn registry(names: &[&str]) -> ClassRegistry {
    let classes = names
        .iter()
        .enumerate()
        .map(|(id, name)| ClassDefinition::new(*name, id as u32, Color::from_rgb_u8(0, 0, 255)))
        .collect();
    ClassRegistry::new(classes, 0, LabelingMode::ObjectDetection, "centroid_rel").unwrap()
}

pub fn controller(names: &[&str]) -> BoxController<RecordingDisplay> {
    BoxController::new(registry(names), &AppConfig::default(), RecordingDisplay::default())
}

pub fn create_box(x: f32, y: f32, z: f32) -> BBox {
    BBox::new(Vec3::new(x, y, z), 1.0, 1.0, 1.0)
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn class_file(classes: &[(&str, u32)], default: u32) -> String {
    let classes: Vec<String> = classes
        .iter()
        .map(|(name, id)| format!(r##"{{"name": "{name}", "id": {id}, "color": "#00ff00"}}"##))
        .collect();
    format!(
        r#"{{"classes": [{}], "default": {default}, "type": "object_detection", "format": "centroid_rel"}}"#,
        classes.join(", ")
    )
}
