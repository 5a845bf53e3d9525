//! The class cursor: which class the next box gets, and what the class
//! indicator shows.

use super::BoxController;
use crate::classes::ClassRegistry;
use crate::display::{ClassDisplay, Display};
use crate::error::LabelResult;
use std::path::Path;

impl<D: Display> BoxController<D> {
    /// The class a newly added box will be tagged with.
    pub fn current_class_name(&self) -> String {
        let classes = self.registry.classes();
        classes
            .get(self.class_cursor)
            .or_else(|| classes.first())
            .map_or_else(
                || self.registry.default_class_name().to_string(),
                |class| class.name.clone(),
            )
    }

    pub fn class_cursor(&self) -> usize {
        self.class_cursor
    }

    pub fn reset_class_cursor(&mut self) {
        self.class_cursor = 0;
    }

    /// Move the cursor `direction` classes along, wrapping around.
    ///
    /// An active box is deselected first so it keeps the class it already has.
    pub fn cycle_class(&mut self, direction: isize) {
        let count = self.registry.len();
        if count == 0 {
            return;
        }
        if self.has_active_box() {
            self.deselect();
        }
        let next = (self.class_cursor as isize + direction).rem_euclid(count as isize);
        self.class_cursor = next as usize;
        self.update_class_display();
    }

    /// Push the class indicator: the active box's class if one is selected,
    /// otherwise the cursor class. Selecting a box moves the cursor to its
    /// class, or back to the first class if the registry does not know it.
    pub fn update_class_display(&mut self) {
        let classes = self.registry.classes();
        let shown = match self.active.and_then(|index| self.boxes.get(index)) {
            Some(bbox) => match self.registry.position(bbox.class_name()) {
                Some(position) => {
                    self.class_cursor = position;
                    classes.get(position)
                }
                None => {
                    self.class_cursor = 0;
                    classes.first()
                }
            },
            None => {
                if self.class_cursor >= classes.len() {
                    self.class_cursor = 0;
                }
                classes.get(self.class_cursor)
            }
        };

        let total = classes.len();
        let view = match shown {
            Some(class) => ClassDisplay {
                name: class.name.clone(),
                top_level_object: class.top_level_object.clone().unwrap_or_default(),
                position: self.class_cursor + 1,
                total,
                acted_on_object: class.acted_on_object.clone().unwrap_or_default(),
            },
            None => ClassDisplay::default(),
        };
        tracing::debug!(
            "class display: '{}' ({}/{})",
            view.name,
            view.position,
            view.total
        );
        self.display.refresh_class_display(&view);
    }

    /// Swap in a new registry and start the cursor over.
    pub fn set_registry(&mut self, registry: ClassRegistry) {
        self.registry = registry;
        self.class_cursor = 0;
        self.update_all();
    }

    /// Load class definitions from `path`. The current registry and cursor
    /// stay as they are if the file does not validate.
    pub fn load_classes(&mut self, path: &Path) -> LabelResult<()> {
        let registry = ClassRegistry::load(path)?;
        self.set_registry(registry);
        Ok(())
    }

    /// Load the class definitions for `pcd_path`, preferring its override in
    /// `label_folder`. Returns whether the override was used.
    pub fn load_classes_for_pointcloud(
        &mut self,
        default_path: &Path,
        label_folder: &Path,
        pcd_path: &Path,
    ) -> LabelResult<bool> {
        let (registry, overridden) =
            ClassRegistry::load_for_pointcloud(default_path, label_folder, pcd_path)?;
        self.set_registry(registry);
        Ok(overridden)
    }
}
