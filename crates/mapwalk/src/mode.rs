//! Walking / Measuring state machine and the per-mode camera setup.

use crate::camera::Camera;
use glam::{Vec2, Vec3};

/// Camera the app starts with (Walking mode).
pub const WALK_CAMERA_START: Vec3 = Vec3::new(0.0, 2.0, 5.0);
/// Look direction while walking: ahead and slightly down.
pub const WALK_LOOK: Vec3 = Vec3::new(0.0, -0.5, -1.0);
/// Look direction while measuring: almost straight down.
pub const MEASURE_LOOK: Vec3 = Vec3::new(0.0, -0.99, -0.1);
/// Camera height used the first time Measuring mode is entered.
pub const MEASURE_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Walking,
    Measuring,
}

impl Mode {
    pub fn other(self) -> Self {
        match self {
            Mode::Walking => Mode::Measuring,
            Mode::Measuring => Mode::Walking,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Walking => "Walking",
            Mode::Measuring => "Measuring",
        }
    }

    /// Camera pan limits for this mode.
    pub fn camera_bounds(self) -> CameraBounds {
        match self {
            Mode::Walking => CameraBounds {
                x: (-10.0, 10.0),
                z: (-10.0, 15.0),
            },
            Mode::Measuring => CameraBounds {
                x: (-15.0, 15.0),
                z: (-15.0, 20.0),
            },
        }
    }

    pub fn look_direction(self) -> Vec3 {
        match self {
            Mode::Walking => WALK_LOOK,
            Mode::Measuring => MEASURE_LOOK,
        }
    }
}

/// Inclusive `(min, max)` ranges for the camera's x and z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub x: (f32, f32),
    pub z: (f32, f32),
}

impl CameraBounds {
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x.clamp(self.x.0, self.x.1), p.y, p.z.clamp(self.z.0, self.z.1))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        (self.x.0..=self.x.1).contains(&p.x) && (self.z.0..=self.z.1).contains(&p.z)
    }
}

/// Clickable mode-switch icon, in physical pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeIcon {
    pub min: Vec2,
    pub size: Vec2,
}

impl ModeIcon {
    pub fn contains(&self, pixel: Vec2) -> bool {
        let max = self.min + self.size;
        pixel.x >= self.min.x && pixel.y >= self.min.y && pixel.x < max.x && pixel.y < max.y
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

impl Default for ModeIcon {
    fn default() -> Self {
        Self {
            min: Vec2::new(25.0, 70.0),
            size: Vec2::splat(64.0),
        }
    }
}

/// Tracks the active mode and the camera position each mode last had.
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
    walking_camera: Vec3,
    measuring_camera: Option<Vec3>,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            mode: Mode::Walking,
            walking_camera: WALK_CAMERA_START,
            measuring_camera: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_walking(&self) -> bool {
        self.mode == Mode::Walking
    }

    #[inline]
    pub fn is_measuring(&self) -> bool {
        self.mode == Mode::Measuring
    }

    /// Camera to start the app with.
    pub fn initial_camera(&self) -> Camera {
        Camera::new(self.walking_camera, Mode::Walking.look_direction())
    }

    /// Switches to the other mode, parking the live camera position under
    /// the mode being left and restoring the one saved for the mode entered.
    pub fn toggle(&mut self, camera: &mut Camera) -> Mode {
        let next = self.mode.other();

        match self.mode {
            Mode::Walking => self.walking_camera = camera.position,
            Mode::Measuring => self.measuring_camera = Some(camera.position),
        }

        camera.position = match next {
            Mode::Walking => self.walking_camera,
            Mode::Measuring => self.measuring_camera.unwrap_or(Vec3::new(
                camera.position.x,
                MEASURE_HEIGHT,
                camera.position.z,
            )),
        };
        camera.front = next.look_direction();

        log::info!(
            "Mode {} -> {} | camera at ({:.2}, {:.2}, {:.2})",
            self.mode.label(),
            next.label(),
            camera.position.x,
            camera.position.y,
            camera.position.z
        );

        self.mode = next;
        self.mode
    }

    /// Position saved for `mode`, if that mode has been left at least once
    /// (Walking always has one: the start position).
    pub fn saved_camera(&self, mode: Mode) -> Option<Vec3> {
        match mode {
            Mode::Walking => Some(self.walking_camera),
            Mode::Measuring => self.measuring_camera,
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
