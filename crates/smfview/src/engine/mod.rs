pub mod camera;
pub mod lighting;
pub mod material;
pub mod render;
pub mod shading;

use std::path::PathBuf;

use thiserror::Error;

pub use render::context::{GpuContext, RenderPassContext};
pub use render::draw_call::{DrawCall, DrawCallProps};
pub use render::globals::Globals;
pub use render::mesh::Mesh;
pub use render::shader::{Shader, ShaderKind};
pub use render::{MeshIndex, Size2D, Vertex3};

/// Failures while setting up the GPU side. All of them are fatal.
#[derive(Debug, Error)]
pub enum GraphicsBuildError {
    #[error("Failed to read shader source {path}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile shader {name}:\n{message}")]
    Compile { name: String, message: String },

    #[error("Invalid uniform block in shader {name}: {message}")]
    Uniforms { name: String, message: String },

    #[error("No suitable graphics adapter found")]
    NoAdapter,

    #[error("Failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to acquire graphics device")]
    Device(#[from] wgpu::RequestDeviceError),
}
