use thiserror::Error;

/// Rejected [`SessionConfig`](crate::SessionConfig) values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("target tick rate must be positive, finite and give a representable tick interval, got {0} Hz")]
    TickRate(f64),

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("viewport must be at least 1x1 pixels, got {width}x{height}")]
    Viewport { width: u32, height: u32 },
}
