use std::cell::RefCell;
use std::mem::size_of;
use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use naga::{AddressSpace, ScalarKind, TypeInner, VectorSize};
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::trace;

use super::context::GpuContext;
use super::globals::{GlobalType, Globals};
use crate::engine::GraphicsBuildError;

#[derive(Copy, Clone, Hash, PartialEq, Eq, Debug)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    /// Returns the bind group index for this shader stage.
    ///
    /// Each stage owns one bind group so the two stages of a program never collide:
    /// - Vertex shader: `@group(0)`
    /// - Fragment shader: `@group(1)`
    ///
    /// The stage's uniform block is always at `@binding(0)`.
    pub fn get_bind_group_index(&self) -> u32 {
        match self {
            ShaderKind::Vertex => 0,
            ShaderKind::Fragment => 1,
        }
    }

    pub fn entry_point(&self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vs_main",
            ShaderKind::Fragment => "fs_main",
        }
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vs",
            ShaderKind::Fragment => "fs",
        }
    }

    fn visibility(&self) -> wgpu::ShaderStages {
        match self {
            ShaderKind::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderKind::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

/// A uniform block member, as reflected from the WGSL source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub global_type: GlobalType,
    pub f32_offset: usize,
    pub f32_count: usize,
}

/// Layout of the single uniform block a shader stage may declare.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformLayout {
    pub fields: Vec<UniformField>,

    /// Size of the uniform buffer in bytes. Zero if the stage has no uniforms.
    pub size: usize,
}

impl UniformLayout {
    /// Parses and validates `source`, then extracts its uniform block.
    pub fn reflect(name: &str, source: &str, kind: ShaderKind) -> Result<Self, GraphicsBuildError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|err| {
            GraphicsBuildError::Compile {
                name: name.to_string(),
                message: err.emit_to_string(source),
            }
        })?;
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|err| GraphicsBuildError::Compile {
            name: name.to_string(),
            message: err.emit_to_string(source),
        })?;

        Self::from_module(&module, kind).map_err(|err| GraphicsBuildError::Uniforms {
            name: name.to_string(),
            message: format!("{err:#}"),
        })
    }

    fn from_module(module: &naga::Module, kind: ShaderKind) -> Result<Self> {
        let mut layout = UniformLayout::default();

        for (_, var) in module.global_variables.iter() {
            if var.space != AddressSpace::Uniform {
                continue;
            }
            let binding = var.binding.as_ref().context("Uniform block without binding")?;
            ensure!(
                binding.group == kind.get_bind_group_index() && binding.binding == 0,
                "{kind:?} shader uniforms must be at @group({}) @binding(0), found @group({}) @binding({})",
                kind.get_bind_group_index(),
                binding.group,
                binding.binding
            );
            ensure!(layout.size == 0, "Only one uniform block is supported per stage");

            let TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
                bail!("Uniform block must be a struct");
            };
            for member in members {
                let name = member.name.as_deref().context("Unnamed uniform member")?;
                let global_type = GlobalType::from_str(name)
                    .with_context(|| format!("Unknown uniform {name:?}"))?;
                let f32_count = match &module.types[member.ty].inner {
                    TypeInner::Scalar(scalar) if scalar.kind == ScalarKind::Float => 1,
                    TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float => {
                        *size as usize
                    }
                    TypeInner::Matrix {
                        columns: VectorSize::Quad,
                        rows: VectorSize::Quad,
                        ..
                    } => 16,
                    other => bail!("Uniform {name} has unsupported type {other:?}"),
                };
                ensure!(
                    global_type_len(global_type) == f32_count,
                    "Uniform {name} has {f32_count} components, expected {}",
                    global_type_len(global_type)
                );
                layout.fields.push(UniformField {
                    global_type,
                    f32_offset: member.offset as usize / size_of::<f32>(),
                    f32_count,
                });
            }
            layout.size = *span as usize;
        }

        trace!(
            "Uniforms: {:?}",
            layout.fields.iter().map(|f| f.global_type.name()).collect::<Vec<_>>()
        );
        Ok(layout)
    }

    pub fn find(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.global_type.name() == name)
    }
}

fn global_type_len(global_type: GlobalType) -> usize {
    Globals::default().get(global_type).len()
}

/// CPU staging for a stage's uniform buffer, written by uniform name.
#[derive(Clone, Debug)]
pub struct UniformBlock {
    layout: UniformLayout,
    values: Vec<f32>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let values = vec![0.0; layout.size / size_of::<f32>()];
        Self { layout, values }
    }

    /// Writes a named uniform. Names the stage doesn't declare are ignored.
    pub fn set(&mut self, name: &str, value: &[f32]) {
        let Some(field) = self.layout.find(name) else {
            return;
        };
        let count = field.f32_count.min(value.len());
        self.values[field.f32_offset..field.f32_offset + count].copy_from_slice(&value[..count]);
    }

    /// Writes every global by name.
    pub fn set_globals(&mut self, globals: &Globals) {
        for global_type in GlobalType::iter() {
            self.set(global_type.name(), globals.get(global_type));
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        let field = self.layout.find(name)?;
        Some(&self.values[field.f32_offset..field.f32_offset + field.f32_count])
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Shader stage, either vertex or fragment.
pub struct Shader {
    /// The compiled shader module.
    pub shader_module: wgpu::ShaderModule,

    pub kind: ShaderKind,

    /// Uniform values, filled from `Globals` before each draw.
    uniforms: RefCell<UniformBlock>,

    uniform_buffer: Option<wgpu::Buffer>,

    /// Layout of the single bind group containing the uniform buffer
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl Shader {
    pub fn new(
        context: &GpuContext,
        name: &str,
        source: &str,
        kind: ShaderKind,
    ) -> Result<Shader, GraphicsBuildError> {
        // Validate with naga first: wgpu reports invalid modules through its error callback only.
        let layout = UniformLayout::reflect(name, source, kind)?;

        let shader_module = context.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniforms = UniformBlock::new(layout);
        let uniform_buffer = (!uniforms.is_empty()).then(|| {
            context.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(name),
                size: uniforms.as_bytes().len() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let mut entries = SmallVec::<[_; 1]>::new();
        if uniform_buffer.is_some() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: kind.visibility(),
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
        }
        let bind_group_layout =
            context.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(name),
                entries: &entries,
            });

        Ok(Shader {
            shader_module,
            kind,
            uniforms: RefCell::new(uniforms),
            uniform_buffer,
            bind_group_layout,
        })
    }

    /// Uploads the current globals and returns the bind group for this stage.
    pub fn make_bind_group(&self, context: &GpuContext, globals: &Globals) -> wgpu::BindGroup {
        let mut entries = SmallVec::<[_; 1]>::new();
        if let Some(uniform_buffer) = &self.uniform_buffer {
            let mut uniforms = self.uniforms.borrow_mut();
            uniforms.set_globals(globals);
            context.queue.write_buffer(uniform_buffer, 0, uniforms.as_bytes());
            entries.push(wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            });
        }

        context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bind Group"),
            layout: &self.bind_group_layout,
            entries: &entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;

    const FRAGMENT_SOURCE: &str = r"
struct Uniforms {
    view_pos: vec3<f32>,
    material_shininess: f32,
    material_diffuse: vec3<f32>,
}
@group(1) @binding(0) var<uniform> u: Uniforms;
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(u.view_pos * u.material_diffuse, u.material_shininess);
}
";

    fn reflect(source: &str, kind: ShaderKind) -> Result<UniformLayout, GraphicsBuildError> {
        UniformLayout::reflect("test", source, kind)
    }

    #[test]
    fn reflects_std140_offsets() {
        let layout = reflect(FRAGMENT_SOURCE, ShaderKind::Fragment).unwrap();
        assert_eq!(
            layout.fields,
            vec![
                UniformField {
                    global_type: GlobalType::ViewPos,
                    f32_offset: 0,
                    f32_count: 3
                },
                UniformField {
                    global_type: GlobalType::MaterialShininess,
                    f32_offset: 3,
                    f32_count: 1
                },
                UniformField {
                    global_type: GlobalType::MaterialDiffuse,
                    f32_offset: 4,
                    f32_count: 3
                },
            ]
        );
        assert_eq!(layout.size, 32);
    }

    #[test]
    fn wrong_bind_group_is_rejected() {
        let err = reflect(FRAGMENT_SOURCE, ShaderKind::Vertex).unwrap_err();
        assert!(matches!(err, GraphicsBuildError::Uniforms { .. }));
    }

    #[test]
    fn unknown_uniform_name_is_rejected() {
        let source = FRAGMENT_SOURCE.replace("view_pos", "eye_position");
        let err = reflect(&source, ShaderKind::Fragment).unwrap_err();
        assert!(matches!(err, GraphicsBuildError::Uniforms { .. }));
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = reflect("fn broken( {", ShaderKind::Vertex).unwrap_err();
        assert!(matches!(err, GraphicsBuildError::Compile { .. }));
    }

    #[test]
    fn stage_without_uniforms_has_empty_layout() {
        let source = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let layout = reflect(source, ShaderKind::Fragment).unwrap();
        assert_eq!(layout, UniformLayout::default());
        assert!(UniformBlock::new(layout).is_empty());
    }

    #[test]
    fn undeclared_names_are_ignored() {
        let layout = reflect(FRAGMENT_SOURCE, ShaderKind::Fragment).unwrap();
        let mut block = UniformBlock::new(layout);
        block.set("world_from_model", Mat4::IDENTITY.as_ref());
        block.set("no_such_uniform", &[1.0, 2.0]);
        block.set("material_shininess", &[76.8]);
        assert_eq!(block.get("material_shininess"), Some(&[76.8f32][..]));
        assert_eq!(block.get("world_from_model"), None);
        assert_eq!(block.as_bytes().len(), 32);
    }

    #[test]
    fn set_globals_fills_declared_fields() {
        let layout = reflect(FRAGMENT_SOURCE, ShaderKind::Fragment).unwrap();
        let mut block = UniformBlock::new(layout);
        let globals = Globals {
            view_pos: Vec3::new(1.0, 2.0, 3.0),
            material_diffuse: Vec3::new(0.5, 0.25, 0.125),
            material_shininess: 10.0,
            ..Default::default()
        };
        block.set_globals(&globals);
        assert_eq!(block.get("view_pos"), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(block.get("material_diffuse"), Some(&[0.5, 0.25, 0.125][..]));
        assert_eq!(block.get("material_shininess"), Some(&[10.0][..]));
    }
}
