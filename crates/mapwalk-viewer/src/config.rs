use clap::Parser;
use mapwalk::{SessionConfig, Viewport};
use std::path::PathBuf;

/// `mapwalk` - walk an avatar around a textured map and measure paths on it.
///
/// Space (or the icon in the top-left corner) switches between Walking and
/// Measuring. W/A/S/D move the avatar, the arrow keys pan the camera, a left
/// click in Measuring mode places or removes a marker, Backspace clears all
/// markers and Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Initial window width in logical pixels.
    #[arg(long, env = "MAPWALK_WIDTH", default_value_t = 1920)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, env = "MAPWALK_HEIGHT", default_value_t = 1080)]
    pub height: u32,

    /// Upper bound on simulated/rendered frames per second.
    #[arg(long, env = "MAPWALK_TICK_RATE", default_value_t = mapwalk::clock::TARGET_TICK_HZ)]
    pub tick_rate: f64,

    /// Avatar speed in map units per second.
    #[arg(long, env = "MAPWALK_PLAYER_SPEED", default_value_t = mapwalk::walk::PLAYER_SPEED)]
    pub player_speed: f32,

    /// Camera pan speed in map units per second.
    #[arg(long, env = "MAPWALK_CAMERA_SPEED", default_value_t = mapwalk::session::CAMERA_SPEED)]
    pub camera_speed: f32,

    /// Image draped over the map square. A checkerboard is used when unset.
    #[arg(long, env = "MAPWALK_MAP_TEXTURE")]
    pub map_texture: Option<PathBuf>,

    /// Wavefront OBJ for the avatar. A box is used when unset.
    #[arg(long, env = "MAPWALK_AVATAR_MODEL")]
    pub avatar_model: Option<PathBuf>,

    /// Diffuse image for the avatar. A solid color is used when unset.
    #[arg(long, env = "MAPWALK_AVATAR_TEXTURE")]
    pub avatar_texture: Option<PathBuf>,

    /// Uniform scale applied to the avatar OBJ.
    #[arg(long, env = "MAPWALK_AVATAR_SCALE", default_value_t = 0.01)]
    pub avatar_scale: f32,

    /// Wavefront OBJ for measurement pins. A pyramid is used when unset.
    #[arg(long, env = "MAPWALK_PIN_MODEL")]
    pub pin_model: Option<PathBuf>,

    /// Uniform scale applied to the pin OBJ.
    #[arg(long, env = "MAPWALK_PIN_SCALE", default_value_t = 0.01)]
    pub pin_scale: f32,

    /// Wait for vertical blank when presenting. Off by default: the frame
    /// clock already caps the rate.
    #[arg(long, env = "MAPWALK_VSYNC", default_value_t = false)]
    pub vsync: bool,
}

impl Config {
    /// Core settings, with the framebuffer size known after window creation.
    pub fn session_config(&self, framebuffer: Viewport) -> SessionConfig {
        SessionConfig {
            tick_rate_hz: self.tick_rate,
            player_speed: self.player_speed,
            camera_speed: self.camera_speed,
            viewport: framebuffer,
            ..SessionConfig::default()
        }
    }
}
