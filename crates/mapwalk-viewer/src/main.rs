//! Entry point for the MapWalk viewer.

use anyhow::Result;
use clap::Parser;
use mapwalk_viewer::{app::App, config::Config};
use std::{sync::Arc, time::Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Config::parse();
    log::debug!("{config:?}");

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("MapWalk")
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );

    let mut app = pollster::block_on(App::new(window.clone(), &config))?;

    // Busy-poll: the frame clock inside `App::tick` decides when a frame runs.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                app.handle_event(&window, &event);
            }
            Event::AboutToWait => {
                match app.tick(&window, Instant::now()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => app.renderer.gfx.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("WGPU out of memory, exiting.");
                        elwt.exit();
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }

                if app.should_close() {
                    log::info!("Closing after {} frames", app.clock.ticks());
                    elwt.exit();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
