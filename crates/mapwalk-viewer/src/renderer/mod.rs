//! The rendering orchestrator. Owns the GPU context, the depth target, the
//! scene pipelines and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod scene;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{path_line::PathLinePipeline, phong::PhongPipeline},
    scene::Scene,
    targets::{Targets, DEPTH_FORMAT},
};
use mapwalk::{Mode, Session};
use std::sync::Arc;
use winit::window::Window;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 };

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub phong: PhongPipeline,
    pub path: PathLinePipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, vsync: bool) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window, vsync).await?;
        let size = gfx.size;

        let targets = Targets::new(&gfx.device, size);
        let phong = PhongPipeline::new(&gfx.device, gfx.config.format, DEPTH_FORMAT);
        let path = PathLinePipeline::new(&gfx.device, gfx.config.format, DEPTH_FORMAT);

        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            phong,
            path,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Draws the 3D scene for the current session state into `swap_view`.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, session: &Session, scene: &Scene) {
        let draws = scene.draw_list(session);
        self.phong.prepare(
            &self.gfx.device,
            &self.gfx.queue,
            &scene.frame_uniform(session),
            &draws,
        );

        let path_points: &[glam::Vec3] = if session.mode() == Mode::Measuring {
            session.markers().points()
        } else {
            &[]
        };
        self.path.prepare(
            &self.gfx.device,
            &self.gfx.queue,
            session.view_proj(),
            path_points,
        );

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.phong.draw(&mut pass, &draws);
            // Path on top of the map, tested against pins and avatar.
            self.path.draw(&mut pass);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
