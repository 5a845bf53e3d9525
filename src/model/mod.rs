//! Geometry types the annotation engine works on.
//!
//! - `BBox` - oriented cuboid with a class name
//! - `Perspective` - camera rotation used for screen-relative movement
//! - `PointCloud` - points, optional per-point labels and the centering offset

mod bbox;
mod perspective;
mod pointcloud;

pub use bbox::*;
pub use perspective::*;
pub use pointcloud::*;
