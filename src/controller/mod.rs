//! Bounding box management: adding, selecting, updating and deleting boxes,
//! and manipulating the active one (rotation, translation, scaling).
//!
//! Split by functionality:
//! - `selection` - the box collection and which box is active
//! - `manipulation` - operations on the active box
//! - `cycling` - the class cursor and the class indicator

mod cycling;
mod manipulation;
mod selection;

use crate::classes::ClassRegistry;
use crate::config::{AppConfig, LabelSettings, UserInterfaceConfig};
use crate::display::{Display, StatusMode};
use crate::error::{LabelError, LabelResult};
use crate::model::{BBox, Perspective};
use std::str::FromStr;

/// Owns the boxes of the current point cloud and the active selection.
///
/// The active index is `None` when no box is selected and is re-validated
/// after every insertion or removal, so it never points past the collection.
pub struct BoxController<D: Display> {
    boxes: Vec<BBox>,
    active: Option<usize>,
    /// Position in the registry of the class the next new box gets.
    class_cursor: usize,
    perspective: Perspective,
    registry: ClassRegistry,
    label: LabelSettings,
    interface: UserInterfaceConfig,
    display: D,
}

impl<D: Display> BoxController<D> {
    pub fn new(registry: ClassRegistry, config: &AppConfig, display: D) -> Self {
        Self {
            boxes: Vec::new(),
            active: None,
            class_cursor: 0,
            perspective: Perspective::default(),
            registry,
            label: config.label.clone(),
            interface: config.user_interface.clone(),
            display,
        }
    }

    // GETTERS

    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn has_active_box(&self) -> bool {
        self.active.is_some_and(|index| index < self.boxes.len())
    }

    pub fn active_box(&self) -> Option<&BBox> {
        self.active.and_then(|index| self.boxes.get(index))
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Mutable access for class edits (default class, colors). Call
    /// [`Self::update_all`] afterwards if the display should follow.
    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.perspective = perspective;
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    // GUARDS

    /// Index of the active box, or a warning and `None` if nothing is selected.
    fn require_active(&mut self) -> Option<usize> {
        match self.active.filter(|&index| index < self.boxes.len()) {
            Some(index) => Some(index),
            None => {
                self.warn("There is currently no active bounding box to manipulate.");
                None
            }
        }
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.display.notify(message, StatusMode::Warning);
    }

    // DISPLAY

    pub fn update_all(&mut self) {
        self.update_class_display();
        self.update_label_list();
        self.update_box_stats();
    }

    pub fn update_label_list(&mut self) {
        let names: Vec<String> = self.boxes.iter().map(|b| b.class_name().to_string()).collect();
        let active = self.active.filter(|&index| index < self.boxes.len());
        self.display.refresh_label_list(&names, active);
    }

    fn update_box_stats(&mut self) {
        let active = self.active.and_then(|index| self.boxes.get(index));
        self.display.refresh_active_box_stats(active);
    }
}

/// Step size for a manipulation: the explicit value or the configured
/// default, negated when `reversed`.
fn step(explicit: Option<f32>, default: f32, reversed: bool) -> f32 {
    let value = explicit.unwrap_or(default);
    if reversed { -value } else { value }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse a position field name: `pos_x`, `pos_y` or `pos_z`.
    pub fn from_position_name(name: &str) -> LabelResult<Self> {
        Self::from_prefixed(name, "pos_")
    }

    /// Parse a rotation field name: `rot_x`, `rot_y` or `rot_z`.
    pub fn from_rotation_name(name: &str) -> LabelResult<Self> {
        Self::from_prefixed(name, "rot_")
    }

    fn from_prefixed(name: &str, prefix: &str) -> LabelResult<Self> {
        name.strip_prefix(prefix)
            .and_then(|axis| axis.parse().ok())
            .ok_or_else(|| LabelError::InvalidAxis(name.to_string()))
    }
}

impl FromStr for Axis {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(LabelError::InvalidAxis(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Width,
    Height,
}

impl FromStr for Dimension {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" => Ok(Dimension::Length),
            "width" => Ok(Dimension::Width),
            "height" => Ok(Dimension::Height),
            _ => Err(LabelError::InvalidAxis(s.to_string())),
        }
    }
}
