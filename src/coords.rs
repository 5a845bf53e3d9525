//! Conversion of box centers between the original frame stored in label files
//! and the centered frame used while editing.
//!
//! Only x and y are offset; z is never touched.

use crate::model::BBox;
use glam::Vec3;

/// The x/y mean that was subtracted from a point cloud when it was centered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub fn to_centered(point: Vec3, offset: Offset) -> Vec3 {
    Vec3::new(point.x - offset.x, point.y - offset.y, point.z)
}

pub fn to_original(point: Vec3, offset: Offset) -> Vec3 {
    Vec3::new(point.x + offset.x, point.y + offset.y, point.z)
}

/// Applies the offset of the active point cloud on label import and export.
/// When centering is disabled both directions are the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateAdapter {
    pub offset: Offset,
    pub enabled: bool,
}

impl CoordinateAdapter {
    pub fn new(offset: Offset, enabled: bool) -> Self {
        Self { offset, enabled }
    }

    pub fn identity() -> Self {
        Self::new(Offset::ZERO, false)
    }

    pub fn to_centered(&self, point: Vec3) -> Vec3 {
        if self.enabled { to_centered(point, self.offset) } else { point }
    }

    pub fn to_original(&self, point: Vec3) -> Vec3 {
        if self.enabled { to_original(point, self.offset) } else { point }
    }

    /// Move freshly imported boxes into the centered frame.
    pub fn import_boxes(&self, boxes: &mut [BBox]) {
        if !self.enabled || boxes.is_empty() {
            return;
        }
        for bbox in boxes.iter_mut() {
            bbox.center = self.to_centered(bbox.center);
        }
        tracing::info!(
            "Transformed {} bounding boxes from original to centered coordinate space",
            boxes.len()
        );
    }

    /// Copies of `boxes` in the original frame, ready to be written out. The
    /// live boxes stay centered.
    pub fn export_boxes(&self, boxes: &[BBox]) -> Vec<BBox> {
        let exported: Vec<BBox> = boxes
            .iter()
            .map(|bbox| {
                let mut copy = bbox.clone();
                copy.center = self.to_original(bbox.center);
                copy
            })
            .collect();
        if self.enabled && !exported.is_empty() {
            tracing::info!(
                "Transformed {} bounding boxes back to original coordinate space for export",
                exported.len()
            );
        }
        exported
    }
}
