//! The box collection and the active selection.

use super::BoxController;
use crate::display::{Display, StatusMode};
use crate::error::{LabelError, LabelResult};
use crate::model::BBox;
use crate::picking::{self, Ray};
use glam::Mat4;

impl<D: Display> BoxController<D> {
    /// Tag `bbox` with the cursor class, append it and select it.
    pub fn add(&mut self, mut bbox: BBox) {
        bbox.set_class_name(self.current_class_name());
        self.boxes.push(bbox);
        self.select(self.boxes.len() - 1);
        self.display
            .notify("Bounding Box added, it can now be corrected.", StatusMode::Correction);
    }

    /// Replace the box at `index`; out-of-range indices are ignored.
    pub fn update(&mut self, index: usize, bbox: BBox) {
        let Some(slot) = self.boxes.get_mut(index) else {
            tracing::debug!("No bounding box at index {index} to update.");
            return;
        };
        *slot = bbox;
        if self.active == Some(index) {
            self.update_all();
        } else {
            self.update_label_list();
        }
    }

    /// Remove the box at `index`.
    ///
    /// Removing the active box selects the new last box. Removing any other
    /// box keeps the active index's value; it is only cleared if it ran past
    /// the end of the collection.
    pub fn delete(&mut self, index: usize) {
        if index >= self.boxes.len() {
            tracing::debug!("No bounding box at index {index} to delete.");
            return;
        }
        self.boxes.remove(index);
        if self.active == Some(index) {
            match self.boxes.len().checked_sub(1) {
                Some(last) => self.select(last),
                None => self.deselect(),
            }
        } else if self.active.is_some_and(|active| active >= self.boxes.len()) {
            self.deselect();
        } else {
            self.update_label_list();
        }
    }

    pub fn delete_active(&mut self) {
        if let Some(index) = self.require_active() {
            self.delete(index);
        }
    }

    /// Make the box at `index` active. An out-of-range index deselects.
    pub fn select(&mut self, index: usize) {
        if index < self.boxes.len() {
            self.active = Some(index);
            self.update_all();
            self.display.notify(
                "Bounding Box selected, it can now be corrected.",
                StatusMode::Correction,
            );
        } else {
            tracing::debug!("Index {index} is out of range; deselecting.");
            self.deselect();
        }
    }

    pub fn deselect(&mut self) {
        self.active = None;
        self.update_all();
        self.display.notify("No bounding box selected.", StatusMode::Navigation);
    }

    /// Select the box `ray` hits first after transforming the boxes with
    /// `view`. The selection is unchanged if nothing is hit.
    pub fn select_by_ray(&mut self, ray: &Ray, view: &Mat4) -> Option<usize> {
        let (index, distance) = picking::intersected_box(ray, &self.boxes, view)?;
        self.select(index);
        tracing::info!("Selected bounding box {index} at distance {distance:.3}.");
        Some(index)
    }

    /// Replace the whole collection, e.g. after loading labels.
    pub fn set_boxes(&mut self, boxes: Vec<BBox>) {
        self.boxes = boxes;
        self.deselect();
    }

    pub fn reset(&mut self) {
        self.set_boxes(Vec::new());
    }

    /// Change the class of the active box.
    pub fn set_class(&mut self, name: &str) -> LabelResult<()> {
        if self.registry.position(name).is_none() {
            return Err(LabelError::UnknownClass(name.to_string()));
        }
        let Some(index) = self.require_active() else {
            return Ok(());
        };
        self.boxes[index].set_class_name(name);
        self.update_label_list();
        self.update_class_display();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::classes::ClassRegistry;
    use crate::config::AppConfig;
    use crate::controller::BoxController;
    use crate::display::LogDisplay;
    use crate::model::BBox;
    use glam::Vec3;

    fn controller_with(count: usize) -> BoxController<LogDisplay> {
        let mut controller =
            BoxController::new(ClassRegistry::default(), &AppConfig::default(), LogDisplay);
        for i in 0..count {
            controller.add(BBox::new(Vec3::new(i as f32, 0.0, 0.0), 1.0, 1.0, 1.0));
        }
        controller
    }

    #[test]
    fn add_selects_new_box() {
        let controller = controller_with(3);
        assert_eq!(controller.active_index(), Some(2));
        assert_eq!(controller.active_box().unwrap().class_name(), "cart");
    }

    #[test]
    fn deleting_active_last_moves_to_new_last() {
        let mut controller = controller_with(3);
        controller.delete(2);
        assert_eq!(controller.active_index(), Some(1));
        controller.delete_active();
        controller.delete_active();
        assert_eq!(controller.active_index(), None);
        assert!(controller.boxes().is_empty());
    }

    #[test]
    fn deleting_other_box_keeps_active_value() {
        let mut controller = controller_with(4);
        controller.select(1);
        controller.delete(0);
        assert_eq!(controller.active_index(), Some(1));
        assert_eq!(controller.active_box().unwrap().center.x, 2.0);
    }

    #[test]
    fn stale_active_index_is_cleared() {
        let mut controller = controller_with(3);
        // Active is 2; removing 0 would leave it past the end.
        controller.delete(0);
        assert_eq!(controller.active_index(), None);
        assert!(!controller.has_active_box());
    }

    #[test]
    fn out_of_range_select_deselects() {
        let mut controller = controller_with(2);
        controller.select(5);
        assert_eq!(controller.active_index(), None);
        controller.delete(7);
        assert_eq!(controller.boxes().len(), 2);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut controller = controller_with(2);
        let replacement = BBox::new(Vec3::splat(9.0), 2.0, 2.0, 2.0).with_class_name("cart");
        controller.update(0, replacement.clone());
        controller.update(4, replacement.clone());
        assert_eq!(controller.boxes()[0], replacement);
        assert_eq!(controller.boxes().len(), 2);
    }

    #[test]
    fn set_class_rejects_unknown_names() {
        let mut controller = controller_with(1);
        assert!(controller.set_class("truck").is_err());
        assert!(controller.set_class("cart").is_ok());
    }
}
