// src/data/mod.rs
//! Asset data for the viewer.
//!
//! This module provides functionality for:
//! - Loading OBJ meshes and building the procedural fallbacks.
//! - Decoding textures to RGBA.
//! - Defining the data structures for GPU buffers.

pub mod mesh;
pub mod texture;
pub mod types;

// Re-export commonly used types for convenience.
pub use self::mesh::MeshData;
pub use self::types::{FrameUniform, Light, LineUniform, Material, ObjectUniform, Vertex};
