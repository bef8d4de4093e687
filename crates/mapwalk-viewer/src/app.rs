use crate::{config::Config, keymap::logical_key, renderer::scene::Scene, renderer::Renderer, ui};
use anyhow::{Context, Result};
use glam::Vec2;
use mapwalk::{FrameClock, InputEvent, InputQueue, Session, Viewport};
use std::{sync::Arc, time::Instant};
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    window::Window,
};

pub struct App {
    pub renderer: Renderer,
    pub session: Session,
    pub scene: Scene,
    pub clock: FrameClock,
    pub input: InputQueue,
    pub cursor: Option<Vec2>,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let renderer = Renderer::new(window.clone(), config.vsync).await?;
        let size = renderer.gfx.size;

        let session = Session::new(config.session_config(Viewport::new(size.width, size.height)))
            .context("invalid session configuration")?;

        let clock = FrameClock::new(session.config().tick_rate_hz, Instant::now());

        let scene = Scene::load(
            &renderer.gfx,
            &renderer.phong,
            config,
            session.map().half_extent,
        )?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        log::info!(
            "Session ready: {}x{} at {} Hz",
            size.width,
            size.height,
            config.tick_rate
        );

        Ok(Self {
            renderer,
            session,
            scene,
            clock,
            input: InputQueue::new(),
            cursor: None,
            egui_ctx,
            egui_state,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            log::debug!("Resized to {}x{}", new_size.width, new_size.height);
            self.renderer.resize(new_size);
            self.input.push(InputEvent::Resized {
                width:  new_size.width,
                height: new_size.height,
            });
        }
    }

    /// Translates a window event into session input. Returns true when egui
    /// consumed it.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = logical_key(event.physical_key) {
                    self.input.push(match event.state {
                        ElementState::Pressed => InputEvent::KeyPressed(key),
                        ElementState::Released => InputEvent::KeyReleased(key),
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(pixel) = self.cursor {
                    self.input.push(InputEvent::Click(pixel));
                }
            }
            WindowEvent::Focused(false) => self.input.push(InputEvent::FocusLost),
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::CloseRequested => self.input.push(InputEvent::CloseRequested),
            _ => {}
        }

        false
    }

    /// Runs one frame if the clock says one is due.
    pub fn tick(&mut self, window: &Window, now: Instant) -> Result<(), wgpu::SurfaceError> {
        let Some(dt) = self.clock.poll(now) else {
            return Ok(());
        };

        self.session.update(self.input.drain(), dt.as_secs_f32());
        if self.session.should_close() {
            return Ok(());
        }
        self.render(window)
    }

    pub fn should_close(&self) -> bool {
        self.session.should_close()
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(&swap_view, &self.session, &self.scene);

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        ui::draw_hud(&self.egui_ctx, &self.session, self.clock.fps());

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
