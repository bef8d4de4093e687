use glam::{Mat4, Vec3};

/// Vertical field of view of the perspective projection.
pub const FOV_Y_DEG: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Free-look camera: a position, a look direction and a fixed world up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Look direction. Not required to be unit length; normalized on use.
    pub front: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, front: Vec3) -> Self {
        Self {
            position,
            front,
            up: Vec3::Y,
        }
    }

    /// Unit look direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.front.normalize()
    }

    /// Right-handed view matrix looking along `front`.
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up)
    }

    /// Perspective projection with a [0, 1] depth range, as wgpu expects.
    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR)
    }

    /// Moves the camera by `delta` on the ground-parallel axes.
    pub fn pan(&mut self, dx: f32, dz: f32) {
        self.position.x += dx;
        self.position.z += dz;
    }
}
