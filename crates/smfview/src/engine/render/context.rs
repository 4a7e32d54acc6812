use std::sync::Arc;

use tracing::{debug, info};
use winit::window::Window;

use super::globals::Globals;
use super::{Size2D, DEPTH_FORMAT};
use crate::engine::GraphicsBuildError;

pub struct GpuContext {
    #[allow(dead_code)]
    pub adapter: wgpu::Adapter,
    pub queue: wgpu::Queue,
    pub device: wgpu::Device,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
}

impl GpuContext {
    pub async fn new(window: Arc<Window>) -> Result<Self, GraphicsBuildError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .ok_or(GraphicsBuildError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!("WGPU adapter: {:?} on {}", adapter_info.backend, adapter_info.name);

        let (device, queue) =
            adapter.request_device(&wgpu::DeviceDescriptor::default(), None).await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format =
            pick_surface_format(&capabilities.formats).ok_or(GraphicsBuildError::NoAdapter)?;
        debug!("Surface format: {format:?}");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities.alpha_modes.first().copied().unwrap_or_default(),
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, [surface_config.width, surface_config.height]);

        Ok(GpuContext {
            adapter,
            queue,
            device,
            surface,
            surface_config,
            depth_view,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn surface_size(&self) -> Size2D {
        [self.surface_config.width, self.surface_config.height]
    }

    /// Reconfigures the swapchain and depth buffer. Zero sizes (minimized window) are ignored.
    pub fn resize(&mut self, size: Size2D) {
        if size[0] == 0 || size[1] == 0 {
            return;
        }
        debug!("Resizing surface to {}x{}", size[0], size[1]);
        self.surface_config.width = size[0];
        self.surface_config.height = size[1];
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, size);
    }

    /// Acquires the next swapchain image. Returns None if the frame should be skipped.
    pub fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                None
            }
            Err(err) => {
                debug!("Skipping frame: {err}");
                None
            }
        }
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}

/// Shader outputs are displayed as written, so a non-sRGB format is preferred. Only the
/// advertised formats can be configured, so an sRGB-only surface keeps its first format.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

fn create_depth_view(device: &wgpu::Device, size: Size2D) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth buffer"),
        size: wgpu::Extent3d {
            width: size[0],
            height: size[1],
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub struct RenderPassContext<'pass> {
    pub gpu_context: &'pass GpuContext,
    pub pass: wgpu::RenderPass<'pass>,
    pub globals: &'pass Globals,
}
