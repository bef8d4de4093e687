//! GPU-resident scene assets and the per-frame draw list built from a
//! [`Session`].

use super::{
    context::GfxContext,
    pipelines::phong::{DrawItem, MeshGpu, PhongPipeline, TextureGpu},
};
use crate::{
    config::Config,
    data::{
        mesh::{box_mesh, ground_quad, load_obj, pin_mesh},
        texture::{checkerboard, load_rgba, solid, white_pixel},
        FrameUniform, Light, Material, MeshData, ObjectUniform,
    },
};
use anyhow::Result;
use glam::{Mat4, Quat, Vec3};
use image::RgbaImage;
use mapwalk::{Mode, Session};
use std::path::Path;

/// A mesh placed with a uniform scale and lifted so its lowest point rests
/// on the ground.
pub struct SceneObject {
    pub mesh:  MeshGpu,
    pub scale: f32,
    pub lift:  f32,
}

impl SceneObject {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData, scale: f32) -> Self {
        Self {
            mesh: MeshGpu::upload(device, label, mesh),
            scale,
            lift: -mesh.min_y() * scale,
        }
    }
}

pub struct Scene {
    pub map:        MeshGpu,
    pub map_tex:    TextureGpu,
    pub avatar:     SceneObject,
    pub avatar_tex: TextureGpu,
    pub pin:        SceneObject,
    pub white:      TextureGpu,
    pub light:      Light,
}

impl Scene {
    /// Loads configured assets, falling back to procedural shapes for any
    /// path that is unset. A configured asset that fails to load is an error.
    pub fn load(
        gfx:         &GfxContext,
        phong:       &PhongPipeline,
        config:      &Config,
        half_extent: f32,
    ) -> Result<Self> {
        let device = &gfx.device;

        let map_image = image_or(config.map_texture.as_deref(), || {
            checkerboard(512, 16, [205, 200, 180], [95, 130, 85])
        })?;
        let map_tex = phong.create_texture(device, &gfx.queue, "Map Texture", &map_image);
        let map = MeshGpu::upload(device, "Map", &ground_quad(half_extent));

        let white = phong.create_texture(device, &gfx.queue, "White Texture", &white_pixel());

        let avatar = match &config.avatar_model {
            Some(path) => SceneObject::new(device, "Avatar", &load_obj(path)?, config.avatar_scale),
            None => SceneObject::new(device, "Avatar", &box_mesh(0.3, 0.2, 1.2), 1.0),
        };
        let avatar_tex = phong.create_texture(
            device,
            &gfx.queue,
            "Avatar Texture",
            &image_or(config.avatar_texture.as_deref(), || solid(AVATAR_COLOR))?,
        );

        let pin = match &config.pin_model {
            Some(path) => SceneObject::new(device, "Pin", &load_obj(path)?, config.pin_scale),
            None => SceneObject::new(device, "Pin", &pin_mesh(0.15, 0.6), 1.0),
        };

        Ok(Self {
            map,
            map_tex,
            avatar,
            avatar_tex,
            pin,
            white,
            light: Light::default(),
        })
    }

    pub fn frame_uniform(&self, session: &Session) -> FrameUniform {
        frame_uniform(session.view_proj(), session.camera().position, &self.light)
    }

    /// Everything lit by the Phong pass this frame, in draw order.
    pub fn draw_list(&self, session: &Session) -> Vec<DrawItem<'_>> {
        let mut draws = vec![DrawItem {
            mesh:    &self.map,
            texture: &self.map_tex,
            uniform: object_uniform(Mat4::IDENTITY, &Material::MAP),
        }];

        match session.mode() {
            Mode::Walking => {
                let player = session.player();
                draws.push(DrawItem {
                    mesh:    &self.avatar.mesh,
                    texture: &self.avatar_tex,
                    uniform: object_uniform(
                        placement(
                            player.position,
                            player.facing.yaw_rad(),
                            self.avatar.scale,
                            self.avatar.lift,
                        ),
                        &Material::AVATAR,
                    ),
                });
            }
            Mode::Measuring => {
                for &marker in session.markers().points() {
                    draws.push(DrawItem {
                        mesh:    &self.pin.mesh,
                        texture: &self.white,
                        uniform: object_uniform(
                            placement(marker, 0.0, self.pin.scale, self.pin.lift),
                            &Material::PIN,
                        ),
                    });
                }
            }
        }

        draws
    }
}

/// Avatar fill when no texture is configured.
pub const AVATAR_COLOR: [u8; 3] = [70, 120, 210];

/// Decodes `path` when set, otherwise builds the fallback image.
pub fn image_or(path: Option<&Path>, fallback: impl FnOnce() -> RgbaImage) -> Result<RgbaImage> {
    match path {
        Some(path) => load_rgba(path),
        None => {
            log::debug!("No texture configured, using a generated one");
            Ok(fallback())
        }
    }
}

/// translate(position + lift) * rotate_y(yaw) * scale
pub fn placement(position: Vec3, yaw: f32, scale: f32, lift: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        Quat::from_rotation_y(yaw),
        position + Vec3::new(0.0, lift, 0.0),
    )
}

pub fn object_uniform(model: Mat4, material: &Material) -> ObjectUniform {
    ObjectUniform {
        model:        model.to_cols_array_2d(),
        normal_model: model.inverse().transpose().to_cols_array_2d(),
        ka:           material.ka,
        shine:        material.shine,
        kd:           material.kd,
        use_texture:  material.textured as u32,
        ks:           material.ks,
        _pad0:        0.0,
    }
}

pub fn frame_uniform(view_proj: Mat4, eye: Vec3, light: &Light) -> FrameUniform {
    FrameUniform {
        view_proj: view_proj.to_cols_array_2d(),
        eye_pos:   eye.into(),
        _pad0:     0.0,
        light_pos: light.pos,
        _pad1:     0.0,
        light_ka:  light.ka,
        _pad2:     0.0,
        light_kd:  light.kd,
        _pad3:     0.0,
        light_ks:  light.ks,
        _pad4:     0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_rotates_then_translates() {
        let m = placement(Vec3::new(2.0, 0.0, -3.0), std::f32::consts::FRAC_PI_2, 2.0, 0.5);
        // +z in model space points along +x after a quarter turn about y.
        let p = m.transform_point3(Vec3::Z);
        assert!((p - Vec3::new(4.0, 0.5, -3.0)).length() < 1e-5);
    }

    #[test]
    fn normal_matrix_undoes_scale() {
        let u = object_uniform(placement(Vec3::ZERO, 0.0, 4.0, 0.0), &Material::PIN);
        let n = Mat4::from_cols_array_2d(&u.normal_model).transform_vector3(Vec3::Y);
        assert!((n - Vec3::Y * 0.25).length() < 1e-6);
        assert_eq!(u.use_texture, 0);
    }

    #[test]
    fn unset_texture_uses_fallback() {
        let img = image_or(None, || solid(AVATAR_COLOR)).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [70, 120, 210, 255]);
    }

    #[test]
    fn configured_texture_is_loaded_not_replaced() {
        let path = std::env::temp_dir().join("mapwalk_avatar_diffuse_test.png");
        solid([10, 200, 30]).save(&path).unwrap();

        let img = image_or(Some(&path), || solid(AVATAR_COLOR)).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [10, 200, 30, 255]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_configured_texture_is_an_error() {
        let missing = Path::new("no/such/avatar.png");
        assert!(image_or(Some(missing), || solid(AVATAR_COLOR)).is_err());
    }

    #[test]
    fn frame_uniform_carries_light() {
        let f = frame_uniform(Mat4::IDENTITY, Vec3::new(0.0, 2.0, 5.0), &Light::default());
        assert_eq!(f.eye_pos, [0.0, 2.0, 5.0]);
        assert_eq!(f.light_pos, [0.0, 5.0, 0.0]);
        assert_eq!(f.light_ka, [0.2, 0.2, 0.2]);
    }
}
