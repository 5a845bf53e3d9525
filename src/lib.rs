//! Geometric annotation engine for 3D point cloud labeling.
//!
//! The engine keeps a collection of oriented bounding boxes over a point
//! cloud and edits them relative to the camera:
//!
//! - [`classes`] - the validated set of label classes of a scene
//! - [`coords`] - moving box centers between the original and centered frame
//! - [`controller`] - the boxes, the active selection and all manipulations
//! - [`session`] - switching point clouds and importing/exporting labels
//!
//! Rendering, label file formats and picking-ray generation belong to the
//! host application; it plugs in through [`display::Display`] and
//! [`session::LabelStore`].

pub mod classes;
pub mod config;
pub mod controller;
pub mod coords;
pub mod display;
pub mod error;
pub mod model;
pub mod picking;
pub mod session;
pub mod utils;

pub use classes::{ClassDefinition, ClassRegistry, LabelingMode};
pub use config::AppConfig;
pub use controller::{Axis, BoxController, Dimension};
pub use coords::{CoordinateAdapter, Offset};
pub use display::{ClassDisplay, Display, LogDisplay, StatusMode};
pub use error::{LabelError, LabelResult, ValidationError};
pub use model::{BBox, Perspective, PointCloud};
pub use picking::Ray;
pub use session::{LabelSession, LabelStore};
pub use utils::Color;
