//! Label class definitions: the set of semantic classes a box or point can carry.

use crate::error::{LabelError, LabelResult, ValidationError};
use crate::utils::Color;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Label formats a registry may be tagged with.
pub const OBJECT_DETECTION_FORMATS: [&str; 5] =
    ["centroid_rel", "centroid_abs", "vertices", "kitti", "kitti_untransformed"];
pub const SEMANTIC_SEGMENTATION_FORMATS: [&str; 1] = ["numpy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingMode {
    ObjectDetection,
    SemanticSegmentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub id: u32,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_top_level_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acted_on_object: Option<String>,
    // Per-class data owned by other tools (e.g. vertex masks); carried through saves.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, id: u32, color: Color) -> Self {
        Self {
            name: name.into(),
            id,
            color,
            top_level_object: None,
            new_top_level_label: None,
            acted_on_object: None,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreatedWith {
    name: String,
    version: String,
}

/// On-disk layout of a class definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassFile {
    classes: Vec<ClassDefinition>,
    default: u32,
    #[serde(rename = "type")]
    mode: LabelingMode,
    format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_with: Option<CreatedWith>,
}

/// The validated, ordered set of classes of the current scene.
///
/// A registry is only ever constructed through validation, so the default id
/// always resolves and class ids are unique. Reloading swaps in a new set only
/// after it validated.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: Vec<ClassDefinition>,
    default: u32,
    mode: LabelingMode,
    format: String,
    /// Where saves go; the file the registry was loaded from.
    source: Option<PathBuf>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self {
            classes: vec![ClassDefinition::new("cart", 0, Color::RED)],
            default: 0,
            mode: LabelingMode::ObjectDetection,
            format: "centroid_rel".to_string(),
            source: None,
        }
    }
}

impl ClassRegistry {
    pub fn new(
        classes: Vec<ClassDefinition>,
        default: u32,
        mode: LabelingMode,
        format: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let registry = Self {
            classes,
            default,
            mode,
            format: format.into(),
            source: None,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// Load class definitions from `path`. A missing file yields the built-in
    /// single-class registry, still bound to `path` for later saves.
    pub fn load(path: &Path) -> LabelResult<Self> {
        let mut registry = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let file: ClassFile = serde_json::from_str(&content)?;
            Self::new(file.classes, file.default, file.mode, file.format)?
        } else {
            tracing::info!(
                "No class definitions at {}; using the built-in default.",
                path.display()
            );
            Self::default()
        };
        registry.source = Some(path.to_path_buf());
        Ok(registry)
    }

    /// Load the class definitions for one point cloud, preferring its
    /// override file in `label_folder` over `default_path`.
    ///
    /// Returns the registry and whether the override was used.
    pub fn load_for_pointcloud(
        default_path: &Path,
        label_folder: &Path,
        pcd_path: &Path,
    ) -> LabelResult<(Self, bool)> {
        let override_path = override_path_for(label_folder, pcd_path);
        if override_path.exists() {
            Ok((Self::load(&override_path)?, true))
        } else {
            Ok((Self::load(default_path)?, false))
        }
    }

    /// Replace this registry with the one at `path`. On failure `self` is
    /// left untouched.
    pub fn reload(&mut self, path: &Path) -> LabelResult<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    pub fn reload_for_pointcloud(
        &mut self,
        default_path: &Path,
        label_folder: &Path,
        pcd_path: &Path,
    ) -> LabelResult<bool> {
        let (registry, overridden) = Self::load_for_pointcloud(default_path, label_folder, pcd_path)?;
        *self = registry;
        Ok(overridden)
    }

    /// Write the registry back to the file it was loaded from.
    pub fn save(&self) -> LabelResult<()> {
        match &self.source {
            Some(path) => self.save_to(path),
            None => {
                tracing::debug!("Class registry has no source file; skipping save.");
                Ok(())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> LabelResult<()> {
        self.validate()?;
        let data = ClassFile {
            classes: self.classes.clone(),
            default: self.default,
            mode: self.mode,
            format: self.format.clone(),
            created_with: Some(CreatedWith {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.classes.is_empty() {
            return Err(ValidationError::NoClasses);
        }
        if !self.classes.iter().any(|c| c.id == self.default) {
            return Err(ValidationError::DefaultIdMissing(self.default));
        }
        let ids: HashSet<u32> = self.classes.iter().map(|c| c.id).collect();
        if ids.len() != self.classes.len() {
            return Err(ValidationError::DuplicateIds);
        }
        if self.classes.iter().any(|c| c.name.is_empty()) {
            return Err(ValidationError::EmptyClassName);
        }
        Ok(())
    }

    // GETTERS

    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name.clone()).collect()
    }

    pub fn labeling_mode(&self) -> LabelingMode {
        self.mode
    }

    pub fn label_format(&self) -> &str {
        &self.format
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn default_id(&self) -> u32 {
        self.default
    }

    pub fn get(&self, name: &str) -> LabelResult<&ClassDefinition> {
        self.classes
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| LabelError::UnknownClass(name.to_string()))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    pub fn default_class_name(&self) -> &str {
        // Validation guarantees the default id is present.
        self.classes
            .iter()
            .find(|c| c.id == self.default)
            .map_or("", |c| c.name.as_str())
    }

    /// Color for display; unknown classes are drawn red.
    pub fn class_color(&self, name: &str) -> Color {
        match self.get(name) {
            Ok(class) => class.color,
            Err(_) => {
                tracing::warn!("No color defined for class '{name}'! Proceeding with red.");
                Color::RED
            }
        }
    }

    /// The class whose id is `step` away from `name`'s id. Stepping onto an
    /// unused id lands on the lowest id when moving up and on the highest id
    /// when moving down.
    pub fn relative(&self, name: &str, step: i64) -> LabelResult<&ClassDefinition> {
        let current = self.get(name)?;
        if step == 0 {
            return Ok(current);
        }
        let target = i64::from(current.id) + step;
        if let Some(found) = self.classes.iter().find(|c| i64::from(c.id) == target) {
            return Ok(found);
        }
        let corner = if step < 0 {
            self.classes.iter().max_by_key(|c| c.id)
        } else {
            self.classes.iter().min_by_key(|c| c.id)
        };
        Ok(corner.unwrap_or(current))
    }

    /// Point indices listed under `vertex_mask` in the first class, if any.
    pub fn vertex_mask(&self) -> Option<Vec<usize>> {
        let value = self.classes.first()?.extra.get("vertex_mask")?;
        match serde_json::from_value::<Vec<usize>>(value.clone()) {
            Ok(mask) if !mask.is_empty() => Some(mask),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Ignoring malformed vertex mask: {e}");
                None
            }
        }
    }

    /// Class colors in sequence order, as a renderer lookup table.
    pub fn color_map(&self) -> Vec<[f32; 3]> {
        self.classes.iter().map(|c| c.color.to_rgb_f32()).collect()
    }

    /// Lookup table from class id to position in the class sequence; unused
    /// ids map to -1.
    pub fn order_lookup(&self) -> Vec<i32> {
        let size = self.classes.iter().map(|c| c.id as usize + 1).max().unwrap_or(0);
        let mut lookup = vec![-1; size];
        for (order, class) in self.classes.iter().enumerate() {
            lookup[class.id as usize] = order as i32;
        }
        lookup
    }

    // SETTERS

    pub fn set_first_as_default(&mut self) {
        if let Some(first) = self.classes.first() {
            self.default = first.id;
        }
    }

    pub fn set_default(&mut self, name: &str) -> LabelResult<()> {
        self.default = self.get(name)?.id;
        self.save()
    }

    pub fn set_color(&mut self, name: &str, color: Color) -> LabelResult<()> {
        let class = self
            .classes
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| LabelError::UnknownClass(name.to_string()))?;
        class.color = color;
        self.save()
    }

    pub fn set_label_format(&mut self, format: &str) -> LabelResult<()> {
        let known = OBJECT_DETECTION_FORMATS
            .iter()
            .chain(SEMANTIC_SEGMENTATION_FORMATS.iter())
            .any(|f| *f == format);
        if !known {
            return Err(LabelError::UnknownLabelFormat(format.to_string()));
        }
        self.format = format.to_string();
        Ok(())
    }
}

/// Location of the class override file for a point cloud: its stem with
/// `laser_scan` replaced by `classes`, inside the label folder.
pub fn override_path_for(label_folder: &Path, pcd_path: &Path) -> PathBuf {
    let stem = pcd_path
        .file_stem()
        .map(|s| s.to_string_lossy().replace("laser_scan", "classes"))
        .unwrap_or_default();
    label_folder.join(format!("{stem}.json"))
}
