// src/lib.rs
//! Interactive walk/measure map viewer.
//!
//! winit + wgpu front end over the `mapwalk` interaction core: a textured map
//! square, a Phong-lit avatar and pins, the measured path as a line strip and
//! an egui HUD.

pub mod app;
pub mod config;
pub mod data;
pub mod keymap;
pub mod renderer;
pub mod ui;
