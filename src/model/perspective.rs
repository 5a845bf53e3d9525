use crate::utils::round_to;

/// Camera rotation in degrees, as far as box manipulation cares about it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Perspective {
    pub rot_x: f32,
    pub rot_z: f32,
}

impl Perspective {
    pub fn new(rot_x: f32, rot_z: f32) -> Self {
        Self { rot_x, rot_z }
    }

    /// `(cosz, sinz, bottom_up)` used to map box movement onto the screen.
    ///
    /// `cosz` and `sinz` are rounded to one decimal, `sinz` is negated, and
    /// `bottom_up` is -1 while the camera looks at the cloud from below.
    pub fn factors(&self) -> (f32, f32, f32) {
        let z = f64::from(self.rot_z).to_radians();
        let cosz = round_to(z.cos(), 1) as f32;
        let sinz = -round_to(z.sin(), 1) as f32;

        let rot_x = self.rot_x.rem_euclid(360.0);
        let bottom_up = if rot_x > 30.0 && rot_x < 210.0 { -1.0 } else { 1.0 };
        (cosz, sinz, bottom_up)
    }
}
