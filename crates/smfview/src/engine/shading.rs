use futures::executor::block_on;
use strum::Display;
use tracing::debug;

use super::{DrawCall, DrawCallProps, GpuContext, GraphicsBuildError, Shader, ShaderKind};
use crate::loader::shader_loader::ShaderLoader;

/// Where the reflectance formula is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum ShadingMode {
    /// Lit per vertex, color interpolated across the triangle (Gouraud).
    #[strum(serialize = "Gouraud")]
    Vertex,

    /// Position and normal interpolated, lit per fragment (Phong).
    #[default]
    #[strum(serialize = "Phong")]
    Fragment,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadingMode::Vertex => ShadingMode::Fragment,
            ShadingMode::Fragment => ShadingMode::Vertex,
        }
    }

    /// Base name of the WGSL sources implementing this mode.
    pub fn program_name(self) -> &'static str {
        match self {
            ShadingMode::Vertex => "vertex_lit",
            ShadingMode::Fragment => "fragment_lit",
        }
    }
}

/// One linked program per shading mode, all built up front.
pub struct ShadingPrograms {
    vertex_lit: DrawCall,
    fragment_lit: DrawCall,
}

impl ShadingPrograms {
    pub fn new(context: &GpuContext, loader: &ShaderLoader) -> Result<Self, GraphicsBuildError> {
        let [vertex_lit, fragment_lit] = [ShadingMode::Vertex, ShadingMode::Fragment]
            .map(|mode| build_program(context, loader, mode));
        Ok(ShadingPrograms {
            vertex_lit: vertex_lit?,
            fragment_lit: fragment_lit?,
        })
    }

    pub fn get(&self, mode: ShadingMode) -> &DrawCall {
        match mode {
            ShadingMode::Vertex => &self.vertex_lit,
            ShadingMode::Fragment => &self.fragment_lit,
        }
    }
}

fn build_program(
    context: &GpuContext,
    loader: &ShaderLoader,
    mode: ShadingMode,
) -> Result<DrawCall, GraphicsBuildError> {
    let name = mode.program_name();
    let [vertex_shader, fragment_shader] = [ShaderKind::Vertex, ShaderKind::Fragment].map(|kind| {
        let source = loader.load(name, kind)?;
        let label = format!("{name}.{}", kind.file_suffix());
        Shader::new(context, &label, &source, kind)
    });
    let props = DrawCallProps {
        id: name.to_string(),
        vertex_shader: vertex_shader?,
        fragment_shader: fragment_shader?,
    };

    // Stage interface mismatches only surface when the pipeline is linked.
    context.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let draw_call = DrawCall::new(context, props);
    link_result(name, block_on(context.device.pop_error_scope()))?;
    debug!("Built {mode} shading program '{}'", draw_call.id);
    Ok(draw_call)
}

fn link_result(name: &str, error: Option<wgpu::Error>) -> Result<(), GraphicsBuildError> {
    match error {
        None => Ok(()),
        Some(err) => Err(GraphicsBuildError::Compile {
            name: name.to_string(),
            message: err.to_string(),
        }),
    }
}
