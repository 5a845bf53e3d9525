//! Manipulations of the active box. All of them warn and do nothing when no
//! box is active.

use super::{step, Axis, BoxController, Dimension};
use crate::display::Display;
use crate::error::LabelResult;
use crate::model::PointCloud;
use crate::utils::round_to;
use glam::Vec3;

impl<D: Display> BoxController<D> {
    // SETTERS

    pub fn set_center(&mut self, center: Vec3) {
        let Some(index) = self.require_active() else { return };
        self.boxes[index].center = center;
        self.update_box_stats();
    }

    /// Write one coordinate of the active box's center (`pos_x`, `pos_y`, `pos_z`).
    pub fn update_position(&mut self, axis: &str, value: f32) -> LabelResult<()> {
        let axis = Axis::from_position_name(axis)?;
        let Some(index) = self.require_active() else { return Ok(()) };
        let center = &mut self.boxes[index].center;
        match axis {
            Axis::X => center.x = value,
            Axis::Y => center.y = value,
            Axis::Z => center.z = value,
        }
        self.update_box_stats();
        Ok(())
    }

    /// Write one dimension of the active box (`length`, `width`, `height`).
    pub fn update_dimension(&mut self, dimension: &str, value: f32) -> LabelResult<()> {
        let dimension: Dimension = dimension.parse()?;
        let Some(index) = self.require_active() else { return Ok(()) };
        let (mut length, mut width, mut height) = self.boxes[index].dimensions();
        match dimension {
            Dimension::Length => length = value,
            Dimension::Width => width = value,
            Dimension::Height => height = value,
        }
        self.resize(index, length, width, height);
        Ok(())
    }

    /// Write one rotation of the active box (`rot_x`, `rot_y`, `rot_z`).
    pub fn update_rotation(&mut self, axis: &str, value: f32) -> LabelResult<()> {
        let axis = Axis::from_rotation_name(axis)?;
        let Some(index) = self.require_active() else { return Ok(()) };
        let bbox = &mut self.boxes[index];
        match axis {
            Axis::X => bbox.set_x_rotation(value),
            Axis::Y => bbox.set_y_rotation(value),
            Axis::Z => bbox.set_z_rotation(value),
        }
        self.update_box_stats();
        Ok(())
    }

    // ROTATION

    /// Tilt around x. Refused in z-rotation-only mode.
    pub fn rotate_x(&mut self, delta: Option<f32>, clockwise: bool) {
        if !self.tilt_allowed() {
            return;
        }
        let Some(index) = self.require_active() else { return };
        let delta = step(delta, self.label.std_rotation, clockwise);
        let bbox = &mut self.boxes[index];
        bbox.set_x_rotation(bbox.x_rotation() + delta);
        self.update_box_stats();
    }

    /// Tilt around y. Refused in z-rotation-only mode.
    pub fn rotate_y(&mut self, delta: Option<f32>, clockwise: bool) {
        if !self.tilt_allowed() {
            return;
        }
        let Some(index) = self.require_active() else { return };
        let delta = step(delta, self.label.std_rotation, clockwise);
        let bbox = &mut self.boxes[index];
        bbox.set_y_rotation(bbox.y_rotation() + delta);
        self.update_box_stats();
    }

    /// Rotate around z, or set the z rotation outright when `absolute`.
    pub fn rotate_z(&mut self, delta: Option<f32>, clockwise: bool, absolute: bool) {
        let Some(index) = self.require_active() else { return };
        let delta = step(delta, self.label.std_rotation, clockwise);
        let bbox = &mut self.boxes[index];
        if absolute {
            bbox.set_z_rotation(delta);
        } else {
            bbox.set_z_rotation(bbox.z_rotation() + delta);
        }
        self.update_all();
    }

    /// Map a mouse drag onto rotations. The vertical drag tilts around
    /// whichever box axis currently points across the screen, snapped to
    /// the dominant one. In z-rotation-only mode only the horizontal drag
    /// applies.
    pub fn rotate_with_mouse(&mut self, dx: f32, dy: f32) {
        let Some(index) = self.require_active() else { return };
        if !self.interface.z_rotation_only {
            let total_z =
                (f64::from(self.perspective.rot_z) + f64::from(self.boxes[index].z_rotation())).to_radians();
            let cosz = round_to(total_z.cos(), 0) as f32;
            let sinz = -round_to(total_z.sin(), 0) as f32;

            self.rotate_x(Some(dy * cosz), false);
            self.rotate_y(Some(dy * sinz), false);
        }
        self.rotate_z(Some(dx), false, false);
    }

    fn tilt_allowed(&mut self) -> bool {
        if self.interface.z_rotation_only {
            self.warn("Rotations around the x- or y-axis are not supported in this mode.");
            return false;
        }
        true
    }

    // TRANSLATION

    /// Move left/right as seen from the current camera.
    pub fn translate_x(&mut self, distance: Option<f32>, reversed: bool) {
        let Some(index) = self.require_active() else { return };
        let distance = step(distance, self.label.std_translation, reversed);
        let (cosz, sinz, _) = self.perspective.factors();
        let center = &mut self.boxes[index].center;
        center.x += distance * cosz;
        center.y += distance * sinz;
        self.update_box_stats();
    }

    /// Move forward/back as seen from the current camera.
    pub fn translate_y(&mut self, distance: Option<f32>, reversed: bool) {
        let Some(index) = self.require_active() else { return };
        let distance = step(distance, self.label.std_translation, reversed);
        let (cosz, sinz, bottom_up) = self.perspective.factors();
        let center = &mut self.boxes[index].center;
        center.x += distance * bottom_up * -sinz;
        center.y += distance * bottom_up * cosz;
        self.update_box_stats();
    }

    pub fn translate_z(&mut self, distance: Option<f32>, reversed: bool) {
        let Some(index) = self.require_active() else { return };
        let distance = step(distance, self.label.std_translation, reversed);
        self.boxes[index].center.z += distance;
        self.update_box_stats();
    }

    // SCALING

    /// Grow the length by `delta` and the width and height along with it,
    /// keeping their ratios to the length.
    pub fn scale(&mut self, delta: Option<f32>, reversed: bool) {
        let Some(index) = self.require_active() else { return };
        let delta = step(delta, self.label.std_scaling, reversed);
        let (length, width, height) = self.boxes[index].dimensions();
        let width_length_ratio = width / length;
        let height_length_ratio = height / length;

        let new_length = length + delta;
        self.resize(
            index,
            new_length,
            new_length * width_length_ratio,
            new_length * height_length_ratio,
        );
    }

    /// Grow a single dimension by `delta`.
    pub fn scale_axis(&mut self, dimension: Dimension, delta: Option<f32>, reversed: bool) {
        let Some(index) = self.require_active() else { return };
        let delta = step(delta, self.label.std_scaling, reversed);
        let (length, width, height) = self.boxes[index].dimensions();
        match dimension {
            Dimension::Length => self.resize(index, length + delta, width, height),
            Dimension::Width => self.resize(index, length, width + delta, height),
            Dimension::Height => self.resize(index, length, width, height + delta),
        }
    }

    fn resize(&mut self, index: usize, length: f32, width: f32, height: f32) {
        let min = self.label.min_dimension;
        if length < min || width < min || height < min {
            self.warn("The bounding box cannot be smaller than the minimum dimension.");
            return;
        }
        if self.boxes[index].set_dimensions(length, width, height) {
            self.update_box_stats();
        }
    }

    // POINT LABELS

    /// Give every point inside the active box the box's class id. Returns
    /// the number of relabeled points.
    pub fn assign_points_in_active_box(&mut self, pointcloud: &mut PointCloud) -> LabelResult<usize> {
        let Some(index) = self.require_active() else { return Ok(0) };
        if !pointcloud.has_label() {
            self.warn("The point cloud has no point labels to assign.");
            return Ok(0);
        }
        let bbox = &self.boxes[index];
        let class_id = self.registry.get(bbox.class_name())?.id;
        let count = pointcloud.assign_label_in_box(bbox, class_id);
        tracing::info!(
            "Labeled {count} points inside the current bounding box with label `{}`",
            bbox.class_name()
        );

        if self.interface.delete_box_after_assign {
            self.delete(index);
        }
        Ok(count)
    }
}
