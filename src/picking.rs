//! Ray picking against oriented boxes.
//!
//! Turning a mouse position into a ray is the renderer's job; this module
//! answers which box a given ray hits first.

use crate::model::{BBox, FACES};
use glam::{Mat4, Vec3};

const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// `None` if `direction` cannot be normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Ray through two points, e.g. the unprojected near and far plane hits.
    pub fn through(near: Vec3, far: Vec3) -> Option<Self> {
        Self::new(near, far - near)
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the triangle `(a, b, c)`, if hit in front of the origin.
    fn hit_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t > EPSILON).then_some(t)
    }
}

/// Distance along `ray` to the nearest face of `bbox` after moving the box
/// into the ray's space with `view`.
pub fn ray_box_distance(ray: &Ray, bbox: &BBox, view: &Mat4) -> Option<f32> {
    let vertices = bbox.vertices().map(|v| view.transform_point3(v));
    FACES
        .iter()
        .flat_map(|&[a, b, c, d]| {
            [
                ray.hit_triangle(vertices[a], vertices[b], vertices[c]),
                ray.hit_triangle(vertices[a], vertices[c], vertices[d]),
            ]
        })
        .flatten()
        .min_by(f32::total_cmp)
}

/// Index of the box `ray` hits first, with its distance.
pub fn intersected_box(ray: &Ray, boxes: &[BBox], view: &Mat4) -> Option<(usize, f32)> {
    boxes
        .iter()
        .enumerate()
        .filter_map(|(index, bbox)| ray_box_distance(ray, bbox, view).map(|d| (index, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn hits_top_face() {
        let bbox = BBox::new(Vec3::ZERO, 2.0, 2.0, 2.0);
        let d = ray_box_distance(&down_ray(0.3, -0.4), &bbox, &Mat4::IDENTITY).unwrap();
        assert!((d - 9.0).abs() < 1e-5);
        assert!(ray_box_distance(&down_ray(1.5, 0.0), &bbox, &Mat4::IDENTITY).is_none());
    }

    #[test]
    fn nearest_box_wins() {
        let boxes = vec![
            BBox::new(Vec3::new(0.0, 0.0, 0.0), 1.0, 1.0, 1.0),
            BBox::new(Vec3::new(0.0, 0.0, 4.0), 1.0, 1.0, 1.0),
            BBox::new(Vec3::new(5.0, 0.0, 8.0), 1.0, 1.0, 1.0),
        ];
        let (index, distance) = intersected_box(&down_ray(0.1, 0.2), &boxes, &Mat4::IDENTITY).unwrap();
        assert_eq!(index, 1);
        assert!((distance - 5.5).abs() < 1e-5);
    }

    #[test]
    fn view_transform_moves_boxes() {
        let boxes = vec![BBox::new(Vec3::ZERO, 1.0, 1.0, 1.0)];
        let view = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        assert!(intersected_box(&down_ray(0.0, 0.0), &boxes, &view).is_none());
        assert_eq!(intersected_box(&down_ray(3.1, 0.2), &boxes, &view).map(|h| h.0), Some(0));
    }

    #[test]
    fn boxes_behind_the_origin_are_ignored() {
        let boxes = vec![BBox::new(Vec3::new(0.0, 0.0, 20.0), 1.0, 1.0, 1.0)];
        assert!(intersected_box(&down_ray(0.0, 0.0), &boxes, &Mat4::IDENTITY).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }
}
