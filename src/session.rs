//! Ties the controller to the active point cloud: class definitions are
//! reloaded per point cloud and labels pass through the coordinate adapter on
//! their way in and out.

use crate::classes::ClassRegistry;
use crate::config::AppConfig;
use crate::controller::BoxController;
use crate::coords::CoordinateAdapter;
use crate::display::Display;
use crate::error::LabelResult;
use crate::model::{BBox, Perspective, PointCloud};
use glam::Vec3;
use std::path::{Path, PathBuf};

/// Reads and writes the label files of a point cloud. Boxes cross this
/// boundary in the original frame.
pub trait LabelStore {
    fn import_labels(&mut self, pcd_path: &Path) -> LabelResult<Vec<BBox>>;
    fn export_labels(&mut self, pcd_path: &Path, boxes: &[BBox]) -> LabelResult<()>;
}

pub struct LabelSession<D: Display, S: LabelStore> {
    controller: BoxController<D>,
    store: S,
    pointcloud: Option<PointCloud>,
    saved_perspective: Option<Perspective>,
    config: AppConfig,
}

impl<D: Display, S: LabelStore> LabelSession<D, S> {
    pub fn new(controller: BoxController<D>, store: S, config: AppConfig) -> Self {
        Self {
            controller,
            store,
            pointcloud: None,
            saved_perspective: None,
            config,
        }
    }

    pub fn controller(&self) -> &BoxController<D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BoxController<D> {
        &mut self.controller
    }

    pub fn pointcloud(&self) -> Option<&PointCloud> {
        self.pointcloud.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The adapter for the active point cloud. Labels are translated only if
    /// the cloud itself was centered.
    pub fn adapter(&self) -> CoordinateAdapter {
        match &self.pointcloud {
            Some(pcd) => CoordinateAdapter::new(pcd.offset(), pcd.is_centered()),
            None => CoordinateAdapter::identity(),
        }
    }

    /// Build a point cloud from raw points, centered if the configuration
    /// asks for it, and open it.
    pub fn open_points(
        &mut self,
        path: impl Into<PathBuf>,
        points: Vec<Vec3>,
        labels: Option<Vec<u32>>,
    ) -> LabelResult<()> {
        let pointcloud = PointCloud::new(path, points, labels, self.config.pointcloud.center_pointcloud);
        self.open_pointcloud(pointcloud)
    }

    /// Switch to `pointcloud`: load its class definitions, then its labels.
    ///
    /// Nothing changes unless both load: invalid class definitions or an
    /// unreadable label file leave the previous point cloud, registry and
    /// boxes active.
    pub fn open_pointcloud(&mut self, mut pointcloud: PointCloud) -> LabelResult<()> {
        tracing::info!("Loading point cloud {}...", pointcloud.path().display());
        let (registry, overridden) = ClassRegistry::load_for_pointcloud(
            &self.config.file.class_definitions(),
            &self.config.file.label_folder(),
            pointcloud.path(),
        )?;
        let mut boxes = self.store.import_labels(pointcloud.path())?;

        if overridden {
            tracing::info!("Loaded point cloud specific class definitions.");
            if let Some(mask) = registry.vertex_mask() {
                let kept = pointcloud.set_vertex_mask(mask);
                tracing::info!("Applied vertex mask with {kept} indices.");
            }
        } else {
            tracing::info!("Using default class definitions.");
        }
        self.controller.set_registry(registry);

        if self.config.user_interface.keep_perspective {
            if let Some(current) = &self.pointcloud {
                self.saved_perspective = Some(current.perspective());
                tracing::info!("Saved current perspective ({:?}).", current.perspective());
            }
            if let Some(saved) = self.saved_perspective {
                pointcloud.set_perspective(saved);
            }
        }

        self.pointcloud = Some(pointcloud);
        self.adapter().import_boxes(&mut boxes);
        tracing::info!("Loaded {} bboxes!", boxes.len());

        self.sync_perspective();
        self.controller.set_boxes(boxes);
        Ok(())
    }

    /// Write the current boxes for the active point cloud, in the original frame.
    pub fn save_labels(&mut self) -> LabelResult<()> {
        let Some(pcd) = &self.pointcloud else {
            tracing::warn!("No point clouds to save labels for!");
            return Ok(());
        };
        let exported = self.adapter().export_boxes(self.controller.boxes());
        self.store.export_labels(pcd.path(), &exported)
    }

    /// Move the camera; box translation follows the new orientation.
    pub fn set_camera_rotation(&mut self, rot_x: f32, rot_y: f32, rot_z: f32) {
        if let Some(pcd) = self.pointcloud.as_mut() {
            pcd.set_rotation(rot_x, rot_y, rot_z);
        }
        self.sync_perspective();
    }

    pub fn assign_points_in_active_box(&mut self) -> LabelResult<usize> {
        match self.pointcloud.as_mut() {
            Some(pcd) => self.controller.assign_points_in_active_box(pcd),
            None => {
                tracing::warn!("No point cloud loaded; cannot assign point labels.");
                Ok(0)
            }
        }
    }

    fn sync_perspective(&mut self) {
        if let Some(pcd) = &self.pointcloud {
            self.controller.set_perspective(pcd.perspective());
        }
    }
}
