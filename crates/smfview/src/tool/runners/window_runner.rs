use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Mat4;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::control::input::ControlInput;
use crate::control::{control_for_key, CONTROLS_HELP};
use crate::engine::shading::ShadingPrograms;
use crate::engine::{GpuContext, Mesh, RenderPassContext};
use crate::loader::mesh_builder::MeshData;
use crate::loader::shader_loader::ShaderLoader;
use crate::tool::app_config::AppConfig;
use crate::tool::frame_driver::FrameDriver;
use crate::tool::timer::FrameClock;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.07,
    g: 0.08,
    b: 0.12,
    a: 1.0,
};

/// GPU resources, created once the window exists.
struct Viewer {
    window: Arc<Window>,
    gpu_context: GpuContext,
    programs: ShadingPrograms,
    mesh: Mesh,
}

pub struct WindowRunner {
    config: AppConfig,
    mesh_data: MeshData,
    viewer: Option<Viewer>,
    driver: FrameDriver,
    controls: ControlInput,
    clock: FrameClock,
    failure: Option<anyhow::Error>,
}

impl WindowRunner {
    pub fn run(config: AppConfig, mesh_data: MeshData) -> Result<()> {
        let world_from_model = if config.normalize_model {
            mesh_data.bounds.normalization_transform()
        } else {
            Mat4::IDENTITY
        };
        let mut runner = WindowRunner {
            driver: FrameDriver::new(config.rig, world_from_model),
            config,
            mesh_data,
            viewer: None,
            controls: ControlInput::default(),
            clock: FrameClock::new(),
            failure: None,
        };

        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.run_app(&mut runner).context("Event loop failed")?;

        match runner.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn create_viewer(&self, event_loop: &ActiveEventLoop) -> Result<Viewer> {
        let [width, height] = self.config.window_size;
        let attributes = Window::default_attributes()
            .with_title("SMF Shading (Gouraud/Phong)")
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let gpu_context = futures::executor::block_on(GpuContext::new(window.clone()))?;
        let loader = ShaderLoader::new(self.config.shader_dir.clone());
        let programs = ShadingPrograms::new(&gpu_context, &loader)?;
        let mesh = Mesh::new(&gpu_context, &self.mesh_data.vertices, &self.mesh_data.indices);
        debug!(
            "Uploaded {} vertices and {} indices",
            mesh.vertex_count, mesh.index_count
        );

        Ok(Viewer {
            window,
            gpu_context,
            programs,
            mesh,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        if let Some(control) = control_for_key(key) {
            self.controls.set_held(control, event.state == ElementState::Pressed);
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.tick();
        self.driver.step(&self.controls.sample());
        if self.driver.exit_requested() {
            event_loop.exit();
            return;
        }

        let Some(viewer) = &mut self.viewer else {
            return;
        };
        let Some(frame) = viewer.gpu_context.acquire_frame() else {
            return;
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let globals = self.driver.globals(viewer.gpu_context.surface_size());
        let program = viewer.programs.get(self.driver.rig().shading);

        let context = &viewer.gpu_context;
        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Model"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: context.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut pass_context = RenderPassContext {
                gpu_context: context,
                pass,
                globals: &globals,
            };
            program.render(&mut pass_context, &viewer.mesh);
        }
        context.queue.submit(Some(encoder.finish()));
        viewer.window.pre_present_notify();
        frame.present();
    }
}

impl ApplicationHandler for WindowRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                info!("{CONTROLS_HELP}");
                self.viewer = Some(viewer);
            }
            Err(err) => self.fail(event_loop, err.context("Failed to set up graphics")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.gpu_context.resize([size.width, size.height]);
                }
            }
            WindowEvent::Focused(false) => self.controls.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }
}
