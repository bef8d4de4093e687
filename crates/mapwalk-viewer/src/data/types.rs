//! GPU-facing data layouts. Each uniform struct must match its WGSL
//! counterpart in `renderer::pipelines`.

/// Mesh vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame lighting and camera state (std140).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 3],
    pub _pad0: f32,
    pub light_pos: [f32; 3],
    pub _pad1: f32,
    pub light_ka: [f32; 3],
    pub _pad2: f32,
    pub light_kd: [f32; 3],
    pub _pad3: f32,
    pub light_ks: [f32; 3],
    pub _pad4: f32,
}

// 64 + 5 * 16
const _: [(); 144] = [(); core::mem::size_of::<FrameUniform>()];

/// Per-object transform and Phong material (std140).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, for normals.
    pub normal_model: [[f32; 4]; 4],
    pub ka: [f32; 3],
    pub shine: f32,
    pub kd: [f32; 3],
    pub use_texture: u32,
    pub ks: [f32; 3],
    pub _pad0: f32,
}

// 2 * 64 + 3 * 16
const _: [(); 176] = [(); core::mem::size_of::<ObjectUniform>()];

/// Line-strip uniform: transform plus a flat color.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineUniform {
    pub view_proj: [[f32; 4]; 4],
    pub color: [f32; 4],
}

const _: [(); 80] = [(); core::mem::size_of::<LineUniform>()];

/// Phong material coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ka: [f32; 3],
    pub kd: [f32; 3],
    pub ks: [f32; 3],
    pub shine: f32,
    pub textured: bool,
}

impl Material {
    /// Slightly dull, textured ground.
    pub const MAP: Material = Material {
        ka: [0.5, 0.5, 0.5],
        kd: [0.6, 0.6, 0.6],
        ks: [0.1, 0.1, 0.1],
        shine: 32.0,
        textured: true,
    };

    /// White so the texture color shows unchanged.
    pub const AVATAR: Material = Material {
        ka: [1.0, 1.0, 1.0],
        kd: [1.0, 1.0, 1.0],
        ks: [0.5, 0.5, 0.5],
        shine: 32.0,
        textured: true,
    };

    pub const PIN: Material = Material {
        ka: [0.6, 0.1, 0.1],
        kd: [0.9, 0.15, 0.15],
        ks: [0.6, 0.6, 0.6],
        shine: 64.0,
        textured: false,
    };
}

/// The scene's single point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub pos: [f32; 3],
    pub ka: [f32; 3],
    pub kd: [f32; 3],
    pub ks: [f32; 3],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            pos: [0.0, 5.0, 0.0],
            ka: [0.2, 0.2, 0.2],
            kd: [0.8, 0.8, 0.8],
            ks: [1.0, 1.0, 1.0],
        }
    }
}
