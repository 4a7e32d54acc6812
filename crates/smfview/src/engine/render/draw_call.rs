use std::mem::size_of;

use wgpu::CompareFunction;

use super::context::{GpuContext, RenderPassContext};
use super::mesh::Mesh;
use super::shader::Shader;
use super::{Vertex3, DEPTH_FORMAT, VERTEX_FORMAT};

/// A linked vertex and fragment stage pair with its render pipeline.
pub struct DrawCall {
    pub id: String,
    pub vertex_shader: Shader,
    pub fragment_shader: Shader,
    pipeline: wgpu::RenderPipeline,
}

pub struct DrawCallProps {
    pub id: String,
    pub vertex_shader: Shader,
    pub fragment_shader: Shader,
}

impl DrawCall {
    pub fn new(context: &GpuContext, props: DrawCallProps) -> DrawCall {
        let pipeline_layout =
            context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(props.id.as_str()),
                bind_group_layouts: &[
                    &props.vertex_shader.bind_group_layout,
                    &props.fragment_shader.bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

        let vertex_buffer_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex3>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_FORMAT,
        };

        let pipeline = context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(props.id.as_str()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &props.vertex_shader.shader_module,
                entry_point: Some(props.vertex_shader.kind.entry_point()),
                buffers: &[vertex_buffer_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &props.fragment_shader.shader_module,
                entry_point: Some(props.fragment_shader.kind.entry_point()),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // SMF models come with arbitrary winding, so both sides are drawn.
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        DrawCall {
            id: props.id,
            vertex_shader: props.vertex_shader,
            fragment_shader: props.fragment_shader,
            pipeline,
        }
    }

    pub fn render(&self, context: &mut RenderPassContext, mesh: &Mesh) {
        let vertex_bind_group =
            self.vertex_shader.make_bind_group(context.gpu_context, context.globals);
        let fragment_bind_group =
            self.fragment_shader.make_bind_group(context.gpu_context, context.globals);

        context.pass.set_pipeline(&self.pipeline);
        context.pass.set_bind_group(
            self.vertex_shader.kind.get_bind_group_index(),
            &vertex_bind_group,
            &[],
        );
        context.pass.set_bind_group(
            self.fragment_shader.kind.get_bind_group_index(),
            &fragment_bind_group,
            &[],
        );
        context.pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        context.pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        context.pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

/// Nearest surface wins, and every drawn fragment updates the depth buffer.
fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_always_on() {
        let state = depth_stencil_state();
        assert_eq!(state.format, DEPTH_FORMAT);
        assert!(state.depth_write_enabled);
        assert_eq!(state.depth_compare, CompareFunction::LessEqual);
        assert!(!state.stencil.is_enabled());
    }
}
