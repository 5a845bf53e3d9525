//! The display surface the controller pushes its state to.
//!
//! Rendering lives outside this crate; a GUI implements [`Display`] and the
//! controller calls it synchronously whenever its state changes.

use crate::model::BBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
    Navigation,
    Correction,
    /// Transient text for a rejected operation.
    Warning,
}

/// What the class indicator shows: the active box's class, or the class the
/// next box will get.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDisplay {
    pub name: String,
    pub top_level_object: String,
    /// 1-based position in the class sequence, 0 if there are no classes.
    pub position: usize,
    pub total: usize,
    pub acted_on_object: String,
}

pub trait Display {
    fn refresh_label_list(&mut self, class_names: &[String], active: Option<usize>);
    fn refresh_active_box_stats(&mut self, bbox: Option<&BBox>);
    fn refresh_class_display(&mut self, class: &ClassDisplay);
    fn notify(&mut self, message: &str, mode: StatusMode);
}

/// Headless display that only logs.
#[derive(Debug, Default)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn refresh_label_list(&mut self, class_names: &[String], active: Option<usize>) {
        tracing::debug!(boxes = class_names.len(), ?active, "label list refreshed");
    }

    fn refresh_active_box_stats(&mut self, bbox: Option<&BBox>) {
        if let Some(bbox) = bbox {
            tracing::debug!(
                center = ?bbox.center,
                dimensions = ?bbox.dimensions(),
                rotations = ?bbox.rotations(),
                "active box"
            );
        }
    }

    fn refresh_class_display(&mut self, class: &ClassDisplay) {
        tracing::debug!(
            "current class '{}' ({}/{})",
            class.name,
            class.position,
            class.total
        );
    }

    fn notify(&mut self, message: &str, mode: StatusMode) {
        // Warnings were already logged where they were raised.
        if mode != StatusMode::Warning {
            tracing::info!(?mode, "{message}");
        }
    }
}
