// Phong-lit meshes: the map, the avatar and the measurement pins.

use crate::data::{
    types::{FrameUniform, ObjectUniform, Vertex},
    MeshData,
};
use wgpu::util::DeviceExt;

/// Vertex + index buffers of an uploaded mesh.
pub struct MeshGpu {
    vtx: wgpu::Buffer,
    idx: wgpu::Buffer,
    index_count: u32,
}

impl MeshGpu {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vtx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some(&format!("{label} VB")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage:    wgpu::BufferUsages::VERTEX,
        });
        let idx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some(&format!("{label} IB")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage:    wgpu::BufferUsages::INDEX,
        });

        Self {
            vtx,
            idx,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// A sampled texture with its bind group (group 2).
pub struct TextureGpu {
    _tex: wgpu::Texture,
    bind: wgpu::BindGroup,
}

/// One queued draw: which mesh, which texture, which object-uniform slot.
pub struct DrawItem<'a> {
    pub mesh: &'a MeshGpu,
    pub texture: &'a TextureGpu,
    pub uniform: ObjectUniform,
}

pub struct PhongPipeline {
    pipeline:       wgpu::RenderPipeline,
    frame_buffer:   wgpu::Buffer,
    frame_bind:     wgpu::BindGroup,
    object_layout:  wgpu::BindGroupLayout,
    object_buffer:  wgpu::Buffer,
    object_bind:    wgpu::BindGroup,
    object_stride:  u64,
    object_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    sampler:        wgpu::Sampler,
}

const OBJECT_SIZE: u64 = std::mem::size_of::<ObjectUniform>() as u64;

fn align_up(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}

impl PhongPipeline {
    pub fn new(
        device:    &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        // Group 0: per-frame camera and light
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label:   Some("Phong Frame BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding:    0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty:                 wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size:   wgpu::BufferSize::new(
                        std::mem::size_of::<FrameUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("Phong Frame UBO"),
            size:               std::mem::size_of::<FrameUniform>() as u64,
            usage:              wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:   Some("Phong Frame Bind Group"),
            layout:  &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding:  0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Group 1: per-object transform + material, one dynamic-offset slot per draw
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label:   Some("Phong Object BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding:    0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty:                 wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size:   wgpu::BufferSize::new(OBJECT_SIZE),
                },
                count: None,
            }],
        });

        let object_stride = align_up(
            OBJECT_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let object_capacity = 16;
        let (object_buffer, object_bind) =
            Self::create_object_slots(device, &object_layout, object_stride, object_capacity);

        // Group 2: diffuse texture
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label:   Some("Phong Texture BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding:    0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type:    wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled:   false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding:    1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty:         wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count:      None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label:          Some("Phong Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter:     wgpu::FilterMode::Linear,
            min_filter:     wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("Phong WGSL"),
            source: wgpu::ShaderSource::Wgsl(PHONG_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label:                Some("Phong Pipeline Layout"),
            bind_group_layouts:   &[&frame_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label:  Some("Phong Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module:              &shader,
                entry_point:         "vs_main",
                buffers:             &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module:      &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format:     color_fmt,
                    blend:      None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            // OBJ winding is not guaranteed; draw both faces.
            primitive: wgpu::PrimitiveState {
                topology:  wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format:              depth_fmt,
                depth_write_enabled: true,
                depth_compare:       wgpu::CompareFunction::Less,
                stencil:             wgpu::StencilState::default(),
                bias:                wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview:   None,
        });

        Self {
            pipeline,
            frame_buffer,
            frame_bind,
            object_layout,
            object_buffer,
            object_bind,
            object_stride,
            object_capacity,
            texture_layout,
            sampler,
        }
    }

    fn create_object_slots(
        device:   &wgpu::Device,
        layout:   &wgpu::BindGroupLayout,
        stride:   u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("Phong Object UBO"),
            size:               stride * capacity as u64,
            usage:              wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:   Some("Phong Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding:  0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size:   wgpu::BufferSize::new(OBJECT_SIZE),
                }),
            }],
        });

        (buffer, bind)
    }

    /// Uploads an RGBA8 image as an sRGB texture usable by this pipeline.
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue:  &wgpu::Queue,
        label:  &str,
        image:  &image::RgbaImage,
    ) -> TextureGpu {
        let tex = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width:                 image.width(),
                    height:                image.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count:    1,
                dimension:       wgpu::TextureDimension::D2,
                format:          wgpu::TextureFormat::Rgba8UnormSrgb,
                usage:           wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats:    &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:   Some(label),
            layout:  &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding:  0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding:  1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        TextureGpu { _tex: tex, bind }
    }

    /// Writes the frame uniform and one object slot per draw, growing the
    /// slot buffer when there are more draws than slots.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue:  &wgpu::Queue,
        frame:  &FrameUniform,
        draws:  &[DrawItem<'_>],
    ) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));

        if draws.len() > self.object_capacity {
            let capacity = draws.len().next_power_of_two();
            log::debug!("Growing object uniform slots {} -> {}", self.object_capacity, capacity);
            let (buffer, bind) =
                Self::create_object_slots(device, &self.object_layout, self.object_stride, capacity);
            self.object_buffer = buffer;
            self.object_bind = bind;
            self.object_capacity = capacity;
        }

        if draws.is_empty() {
            return;
        }

        let stride = self.object_stride as usize;
        let mut staging = vec![0u8; stride * draws.len()];
        for (slot, item) in staging.chunks_exact_mut(stride).zip(draws) {
            slot[..OBJECT_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&item.uniform));
        }
        queue.write_buffer(&self.object_buffer, 0, &staging);
    }

    /// Records the draws written by the last `prepare`, in the same order.
    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, draws: &[DrawItem<'a>]) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.frame_bind, &[]);

        for (slot, item) in draws.iter().enumerate() {
            let offset = (slot as u64 * self.object_stride) as wgpu::DynamicOffset;
            rpass.set_bind_group(1, &self.object_bind, &[offset]);
            rpass.set_bind_group(2, &item.texture.bind, &[]);
            rpass.set_vertex_buffer(0, item.mesh.vtx.slice(..));
            rpass.set_index_buffer(item.mesh.idx.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..item.mesh.index_count, 0, 0..1);
        }
    }
}

pub const PHONG_WGSL: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    eye_pos: vec3<f32>,
    light_pos: vec3<f32>,
    light_ka: vec3<f32>,
    light_kd: vec3<f32>,
    light_ks: vec3<f32>,
};

struct Object {
    model: mat4x4<f32>,
    normal_model: mat4x4<f32>,
    ka: vec3<f32>,
    shine: f32,
    kd: vec3<f32>,
    use_texture: u32,
    ks: vec3<f32>,
};

@group(0) @binding(0) var<uniform> F: Frame;
@group(1) @binding(0) var<uniform> O: Object;
@group(2) @binding(0) var t_diffuse: texture_2d<f32>;
@group(2) @binding(1) var s_diffuse: sampler;

struct VSOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(
    @location(0) pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VSOut {
    let world = O.model * vec4<f32>(pos, 1.0);

    var out: VSOut;
    out.clip = F.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (O.normal_model * vec4<f32>(normal, 0.0)).xyz;
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    let tex = textureSample(t_diffuse, s_diffuse, in.uv).rgb;
    let base = select(vec3<f32>(1.0), tex, O.use_texture != 0u);

    let n = normalize(in.normal);
    let l = normalize(F.light_pos - in.world_pos);
    let v = normalize(F.eye_pos - in.world_pos);
    let r = reflect(-l, n);

    let ambient  = F.light_ka * O.ka;
    let diffuse  = F.light_kd * O.kd * max(dot(n, l), 0.0);
    let specular = F.light_ks * O.ks * pow(max(dot(v, r), 0.0), O.shine);

    return vec4<f32>((ambient + diffuse) * base + specular, 1.0);
}
"#;
