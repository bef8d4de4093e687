//! Screen-space picking against the ground plane `y = 0`.

use glam::{Mat4, Vec2, Vec3};

/// Framebuffer size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel (origin top-left, +y down) to normalized device coordinates.
    #[inline]
    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * pixel.x / self.width as f32 - 1.0,
            1.0 - 2.0 * pixel.y / self.height as f32,
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Builds the view ray through `pixel` by unprojecting it at the near
    /// (depth 0) and far (depth 1) planes.
    pub fn from_screen(pixel: Vec2, proj: Mat4, view: Mat4, viewport: Viewport) -> Self {
        let ndc = viewport.pixel_to_ndc(pixel);
        let inv = (proj * view).inverse();

        let start = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        Self {
            origin: start,
            dir: (far - start).normalize(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Intersection with the plane `y = 0`.
    ///
    /// `None` when the ray runs parallel to the ground or the plane lies
    /// behind the origin.
    pub fn intersect_ground(&self) -> Option<Vec3> {
        if self.dir.y == 0.0 {
            return None;
        }

        let t = -self.origin.y / self.dir.y;
        if t < 0.0 || !t.is_finite() {
            return None;
        }

        let mut hit = self.at(t);
        hit.y = 0.0;
        Some(hit)
    }
}

/// Casts `pixel` into the scene and returns where it lands on the ground.
pub fn pick_ground(pixel: Vec2, proj: Mat4, view: Mat4, viewport: Viewport) -> Option<Vec3> {
    Ray::from_screen(pixel, proj, view, viewport).intersect_ground()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn straight_down_center_hits_origin() {
        let viewport = Viewport::new(1920, 1080);
        let proj = Camera::projection(viewport.aspect());
        // Looking straight down needs an up vector that is not parallel to the view.
        let view = Mat4::look_to_rh(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, Vec3::NEG_Z);

        let hit = pick_ground(viewport.center(), proj, view, viewport).expect("hit");
        assert!(approx(hit, Vec3::ZERO, 1e-3), "hit = {hit:?}");
    }

    #[test]
    fn straight_down_offset_pixel_moves_along_screen_axes() {
        let viewport = Viewport::new(800, 800);
        let proj = Camera::projection(viewport.aspect());
        let view = Mat4::look_to_rh(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, Vec3::NEG_Z);

        // Right of center lands on +x, above center lands on -z (screen up = -z).
        let right = pick_ground(Vec2::new(600.0, 400.0), proj, view, viewport).expect("hit");
        let above = pick_ground(Vec2::new(400.0, 200.0), proj, view, viewport).expect("hit");
        assert!(right.x > 0.5 && right.z.abs() < 1e-3);
        assert!(above.z < -0.5 && above.x.abs() < 1e-3);

        // Symmetric half-width offset on a square viewport with 45 deg FOV.
        let half = 10.0 * (22.5f32).to_radians().tan() * 0.5;
        assert!((right.x - half).abs() < 1e-2);
    }

    #[test]
    fn horizontal_ray_never_hits() {
        let ray = Ray {
            origin: Vec3::new(0.0, 2.0, 0.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert_eq!(ray.intersect_ground(), None);

        let ray = Ray {
            origin: Vec3::new(3.0, -1.0, 7.0),
            dir: Vec3::X,
        };
        assert_eq!(ray.intersect_ground(), None);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 2.0, 0.0),
            dir: Vec3::new(0.0, 1.0, -1.0).normalize(),
        };
        assert_eq!(ray.intersect_ground(), None);
    }

    #[test]
    fn pixel_above_horizon_misses() {
        let viewport = Viewport::new(1280, 720);
        let proj = Camera::projection(viewport.aspect());
        let cam = Camera::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z);

        assert!(pick_ground(Vec2::new(640.0, 10.0), proj, cam.view(), viewport).is_none());
        assert!(pick_ground(Vec2::new(640.0, 710.0), proj, cam.view(), viewport).is_some());
    }

    #[test]
    fn oblique_ray_solves_t() {
        let ray = Ray {
            origin: Vec3::new(1.0, 4.0, 1.0),
            dir: Vec3::new(1.0, -1.0, 0.0).normalize(),
        };
        let hit = ray.intersect_ground().expect("hit");
        assert!(approx(hit, Vec3::new(5.0, 0.0, 1.0), 1e-4));
    }

    #[test]
    fn pixel_to_ndc_corners() {
        let vp = Viewport::new(200, 100);
        assert_eq!(vp.pixel_to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.pixel_to_ndc(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
        assert_eq!(vp.pixel_to_ndc(vp.center()), Vec2::ZERO);
    }
}
