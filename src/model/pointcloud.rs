use crate::coords::{self, Offset};
use crate::model::{BBox, Perspective};
use glam::Vec3;
use std::path::{Path, PathBuf};

/// A loaded point cloud as the annotation engine sees it.
#[derive(Debug, Clone)]
pub struct PointCloud {
    path: PathBuf,
    pub points: Vec<Vec3>,
    /// Per-point class ids, present in semantic segmentation mode.
    pub labels: Option<Vec<u32>>,
    original_mean: Offset,
    centered: bool,
    /// Indices of points singled out by the class definitions, e.g. for
    /// highlighting.
    vertex_mask: Vec<usize>,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
}

impl PointCloud {
    /// Build a point cloud, subtracting its x/y mean when `center` is set.
    /// Labels whose count does not match the points are dropped.
    pub fn new(
        path: impl Into<PathBuf>,
        mut points: Vec<Vec3>,
        labels: Option<Vec<u32>>,
        center: bool,
    ) -> Self {
        let path = path.into();
        let labels = labels.filter(|l| {
            let matches = l.len() == points.len();
            if !matches {
                tracing::warn!(
                    "Ignoring {} labels for {} points of {}.",
                    l.len(),
                    points.len(),
                    path.display()
                );
            }
            matches
        });

        let original_mean = if center && !points.is_empty() {
            let offset = mean_xy(&points);
            for point in points.iter_mut() {
                *point = coords::to_centered(*point, offset);
            }
            offset
        } else {
            Offset::ZERO
        };

        Self {
            path,
            points,
            labels,
            original_mean,
            centered: center,
            vertex_mask: Vec::new(),
            rot_x: 0.0,
            rot_y: 0.0,
            rot_z: 0.0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The x/y mean removed by centering; zero for uncentered clouds.
    pub fn offset(&self) -> Offset {
        self.original_mean
    }

    /// Whether the points were moved into the centered frame. Labels of a
    /// centered cloud are translated on import and export.
    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn vertex_mask(&self) -> &[usize] {
        &self.vertex_mask
    }

    /// Replace the vertex mask. Indices past the last point are dropped.
    /// Returns the number of indices kept.
    pub fn set_vertex_mask(&mut self, mut mask: Vec<usize>) -> usize {
        let count = self.points.len();
        let before = mask.len();
        mask.retain(|&index| index < count);
        if mask.len() < before {
            tracing::warn!(
                "Dropped {} vertex mask indices beyond the {count} points of {}.",
                before - mask.len(),
                self.path.display()
            );
        }
        self.vertex_mask = mask;
        self.vertex_mask.len()
    }

    pub fn has_label(&self) -> bool {
        self.labels.is_some()
    }

    pub fn perspective(&self) -> Perspective {
        Perspective::new(self.rot_x, self.rot_z)
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.set_rotation(perspective.rot_x, self.rot_y, perspective.rot_z);
    }

    pub fn set_rotation(&mut self, rot_x: f32, rot_y: f32, rot_z: f32) {
        self.rot_x = rot_x.rem_euclid(360.0);
        self.rot_y = rot_y.rem_euclid(360.0);
        self.rot_z = rot_z.rem_euclid(360.0);
    }

    /// Relabel every point inside `bbox` with `class_id`. Returns how many
    /// points were relabeled; clouds without labels are left alone.
    pub fn assign_label_in_box(&mut self, bbox: &BBox, class_id: u32) -> usize {
        let Some(labels) = self.labels.as_mut() else {
            return 0;
        };
        let inside = bbox.contains_points(&self.points);
        let mut count = 0;
        for (label, _) in labels.iter_mut().zip(inside).filter(|(_, inside)| *inside) {
            *label = class_id;
            count += 1;
        }
        count
    }
}

fn mean_xy(points: &[Vec3]) -> Offset {
    let (sx, sy) = points
        .iter()
        .fold((0.0f64, 0.0f64), |(sx, sy), p| (sx + f64::from(p.x), sy + f64::from(p.y)));
    let n = points.len() as f64;
    Offset::new((sx / n) as f32, (sy / n) as f32)
}
