use crate::error::LabelResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub label: LabelSettings,
    #[serde(default)]
    pub user_interface: UserInterfaceConfig,
    #[serde(default)]
    pub pointcloud: PointCloudConfig,
    #[serde(default)]
    pub file: FileConfig,
}

/// Default steps for box manipulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSettings {
    #[serde(default = "default_step")]
    pub std_translation: f32,
    #[serde(default = "default_rotation")]
    pub std_rotation: f32,
    #[serde(default = "default_step")]
    pub std_scaling: f32,
    /// Smallest accepted box length, width or height.
    #[serde(default = "default_min_dimension")]
    pub min_dimension: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInterfaceConfig {
    #[serde(default = "default_false")]
    pub z_rotation_only: bool,
    #[serde(default = "default_false")]
    pub delete_box_after_assign: bool,
    #[serde(default = "default_false")]
    pub keep_perspective: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloudConfig {
    /// Subtract the x/y mean from clouds opened through the session.
    #[serde(default = "default_true")]
    pub center_pointcloud: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_label_folder")]
    pub label_folder: String,
    #[serde(default = "default_class_definitions")]
    pub class_definitions: String,
}

// Default value functions
fn default_step() -> f32 {
    0.03
}

fn default_rotation() -> f32 {
    0.5
}

fn default_min_dimension() -> f32 {
    0.01
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_label_folder() -> String {
    "labels".to_string()
}

fn default_class_definitions() -> String {
    "labels/_classes.json".to_string()
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            std_translation: default_step(),
            std_rotation: default_rotation(),
            std_scaling: default_step(),
            min_dimension: default_min_dimension(),
        }
    }
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self {
            center_pointcloud: true,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            label_folder: default_label_folder(),
            class_definitions: default_class_definitions(),
        }
    }
}

impl FileConfig {
    pub fn label_folder(&self) -> PathBuf {
        expand(&self.label_folder)
    }

    pub fn class_definitions(&self) -> PathBuf {
        expand(&self.class_definitions)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cloudlabel")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from the user config file, or return default if it is
/// missing or broken
pub fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_config_or_default(&path),
        None => {
            tracing::warn!("Failed to determine config directory. Using defaults.");
            AppConfig::default()
        }
    }
}

/// Load configuration from `path`, falling back to defaults.
pub fn load_config_or_default(path: &Path) -> AppConfig {
    if !path.exists() {
        tracing::debug!("No config file at {}. Using defaults.", path.display());
        return AppConfig::default();
    }
    match load_config_from(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config file {}: {e}. Using defaults.", path.display());
            AppConfig::default()
        }
    }
}

/// Strict variant of [`load_config`] for an explicit file.
pub fn load_config_from(path: &Path) -> LabelResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> LabelResult<()> {
    // Create config directory if it doesn't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(config)?;
    std::fs::write(path, toml)?;
    Ok(())
}
