//! MapWalk: GPU-free interaction core for the walk/measure map viewer.
//!
//! - The map is a square on the ground plane `y = 0`, `MAP_HALF_EXTENT` units
//!   from the origin to each edge.
//! - Walking mode: the avatar moves with the movement keys and its walked
//!   distance is accumulated every executed frame.
//! - Measuring mode: left clicks are cast onto the ground plane and toggle
//!   markers; the total path length over the marker sequence is recomputed
//!   after every edit.
//! - The camera pans in both modes, with a separate clamp range and a
//!   separate remembered position per mode.
//!
//! Everything here is plain data plus `glam` math so that the viewer crate can
//! drive it from a winit/wgpu loop and tests can drive it with synthetic input.

pub mod camera;
pub mod clock;
pub mod error;
pub mod input;
pub mod measure;
pub mod mode;
pub mod ray;
pub mod session;
pub mod walk;

pub use camera::Camera;
pub use clock::FrameClock;
pub use error::ConfigError;
pub use input::{InputEvent, InputQueue, Key, KeyState};
pub use measure::{MeasurementStore, Toggle};
pub use mode::{CameraBounds, Mode, ModeController, ModeIcon};
pub use ray::{Ray, Viewport};
pub use session::{Session, SessionConfig};
pub use walk::{Facing, MoveInput, Player, WalkTracker};

/// Distance from the map center to each edge of the map square.
pub const MAP_HALF_EXTENT: f32 = 10.0;

/// Axis-aligned square on the ground plane, `[-half, half]` on x and z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSquare {
    pub half_extent: f32,
}

impl MapSquare {
    pub const fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    /// True when the x/z projection of `p` lies on the map (edges included).
    #[inline]
    pub fn contains(&self, p: glam::Vec3) -> bool {
        p.x.abs() <= self.half_extent && p.z.abs() <= self.half_extent
    }

    /// Clamps the x/z components of `p` onto the map, keeping y.
    #[inline]
    pub fn clamp(&self, p: glam::Vec3) -> glam::Vec3 {
        let h = self.half_extent;
        glam::Vec3::new(p.x.clamp(-h, h), p.y, p.z.clamp(-h, h))
    }
}

impl Default for MapSquare {
    fn default() -> Self {
        Self::new(MAP_HALF_EXTENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn map_square_contains_edges() {
        let map = MapSquare::default();
        assert!(map.contains(Vec3::new(10.0, 0.0, -10.0)));
        assert!(map.contains(Vec3::new(0.0, 3.0, 0.0)));
        assert!(!map.contains(Vec3::new(10.01, 0.0, 0.0)));
        assert!(!map.contains(Vec3::new(0.0, 0.0, -12.0)));
    }

    #[test]
    fn map_square_clamp_keeps_height() {
        let map = MapSquare::default();
        let p = map.clamp(Vec3::new(14.0, 1.5, -30.0));
        assert_eq!(p, Vec3::new(10.0, 1.5, -10.0));
    }
}
