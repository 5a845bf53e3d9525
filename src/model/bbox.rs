use glam::{EulerRot, Mat3, Vec3};

/// Dimensions handed to [`BBox::new`] are raised to at least this value.
pub const MIN_DIMENSION: f32 = 0.01;

/// Corner indices of the six faces, counter-clockwise around each face.
/// Corner `i` sits at `+x` if bit 0 is set, `+y` for bit 1, `+z` for bit 2.
pub const FACES: [[usize; 4]; 6] = [
    [0, 2, 6, 4],
    [1, 3, 7, 5],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 1, 3, 2],
    [4, 5, 7, 6],
];

/// An oriented bounding box.
///
/// Length runs along the local x axis, width along y and height along z.
/// Rotations are Euler angles in degrees, kept in `[0, 360)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    pub center: Vec3,
    length: f32,
    width: f32,
    height: f32,
    rotation: Vec3,
    class_name: String,
}

impl BBox {
    pub fn new(center: Vec3, length: f32, width: f32, height: f32) -> Self {
        Self {
            center,
            length: length.max(MIN_DIMENSION),
            width: width.max(MIN_DIMENSION),
            height: height.max(MIN_DIMENSION),
            rotation: Vec3::ZERO,
            class_name: String::new(),
        }
    }

    pub fn with_rotations(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_rotations(x, y, z);
        self
    }

    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    // GETTERS

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn dimensions(&self) -> (f32, f32, f32) {
        (self.length, self.width, self.height)
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Rotations around x, y and z in degrees.
    pub fn rotations(&self) -> Vec3 {
        self.rotation
    }

    pub fn x_rotation(&self) -> f32 {
        self.rotation.x
    }

    pub fn y_rotation(&self) -> f32 {
        self.rotation.y
    }

    pub fn z_rotation(&self) -> f32 {
        self.rotation.z
    }

    // SETTERS

    pub fn set_class_name(&mut self, name: impl Into<String>) {
        self.class_name = name.into();
    }

    pub fn set_length(&mut self, length: f32) -> bool {
        self.set_dimensions(length, self.width, self.height)
    }

    pub fn set_width(&mut self, width: f32) -> bool {
        self.set_dimensions(self.length, width, self.height)
    }

    pub fn set_height(&mut self, height: f32) -> bool {
        self.set_dimensions(self.length, self.width, height)
    }

    /// Returns `false` and leaves the box unchanged if any value is not
    /// strictly positive.
    pub fn set_dimensions(&mut self, length: f32, width: f32, height: f32) -> bool {
        let positive = |v: f32| v > 0.0 && v.is_finite();
        if !(positive(length) && positive(width) && positive(height)) {
            tracing::warn!("New dimensions ({length}, {width}, {height}) are too small.");
            return false;
        }
        self.length = length;
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_x_rotation(&mut self, angle: f32) {
        self.rotation.x = normalize_degrees(angle);
    }

    pub fn set_y_rotation(&mut self, angle: f32) {
        self.rotation.y = normalize_degrees(angle);
    }

    pub fn set_z_rotation(&mut self, angle: f32) {
        self.rotation.z = normalize_degrees(angle);
    }

    pub fn set_rotations(&mut self, x: f32, y: f32, z: f32) {
        self.set_x_rotation(x);
        self.set_y_rotation(y);
        self.set_z_rotation(z);
    }

    // GEOMETRY

    /// Static xyz rotation: x is applied first, then y, then z.
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_euler(
            EulerRot::ZYX,
            self.rotation.z.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
        )
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height) * 0.5
    }

    /// The eight corners in world coordinates, indexed as in [`FACES`].
    pub fn vertices(&self) -> [Vec3; 8] {
        let half = self.half_extents();
        let rotation = self.rotation_matrix();
        std::array::from_fn(|i| {
            let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
            let local = Vec3::new(half.x * sign(0b001), half.y * sign(0b010), half.z * sign(0b100));
            self.center + rotation * local
        })
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.contains_with(point, self.rotation_matrix().transpose(), self.half_extents())
    }

    /// Inside-mask for many points, sharing one inverse rotation.
    pub fn contains_points(&self, points: &[Vec3]) -> Vec<bool> {
        let inverse = self.rotation_matrix().transpose();
        let half = self.half_extents();
        points.iter().map(|p| self.contains_with(*p, inverse, half)).collect()
    }

    fn contains_with(&self, point: Vec3, inverse: Mat3, half: Vec3) -> bool {
        let local = inverse * (point - self.center);
        local.abs().cmple(half).all()
    }
}

fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // Tiny negative inputs round up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
