use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::{CommandEncoder, RenderPass, Surface, SurfaceConfiguration, SurfaceError, SurfaceTexture, Texture, TextureView};
use winit::window::Window;

use super::error::SchedulerError;
use super::frame_scheduler::FrameTarget;
use super::gpu_context::GpuContext;
use super::listener::PassDescriptor;
use super::surface::SurfaceSize;

/// Format of the depth attachment every scene pipeline must declare
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Depth texture sized to the surface
pub struct DepthBuffer {
    texture: Texture,
    view: TextureView,
}

impl DepthBuffer {
    pub fn view(&self) -> &TextureView {
        &self.view
    }
}

/// An open render pass on the current surface texture
pub struct SurfacePass {
    pass: RenderPass<'static>,
    encoder: CommandEncoder,
    surface_texture: SurfaceTexture,
}

impl SurfacePass {
    pub fn render_pass(&mut self) -> &mut RenderPass<'static> {
        &mut self.pass
    }
}

/// Window surface that presents scheduler frames
pub struct SurfaceTarget {
    gpu: GpuContext,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

impl SurfaceTarget {
    /// Create the surface for `window` and the device that renders into it
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;
        let (gpu, adapter) = GpuContext::new_with_surface(&instance, &surface).await?;

        let caps = surface.get_capabilities(&adapter);
        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: gpu.surface_format(),
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        Ok(Self {
            gpu,
            surface,
            config,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Reconfigure the surface after a window resize.
    ///
    /// A zero-sized window keeps the old configuration; `surface_size` reports the
    /// empty size so the scheduler refuses to render until it grows again.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            self.config.width = 0;
            self.config.height = 0;
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(self.gpu.device(), &self.config);
    }

    fn reconfigure(&self) {
        if self.config.width > 0 && self.config.height > 0 {
            self.surface.configure(self.gpu.device(), &self.config);
        }
    }
}

impl FrameTarget for SurfaceTarget {
    type DepthBuffer = DepthBuffer;
    type Pass = SurfacePass;

    fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    fn create_depth_buffer(&mut self, size: SurfaceSize) -> Result<DepthBuffer, SchedulerError> {
        let limit = self.gpu.device().limits().max_texture_dimension_2d;
        if size.width > limit || size.height > limit {
            return Err(SchedulerError::DepthBuffer(format!(
                "{}x{} exceeds the device limit of {limit}",
                size.width, size.height
            )));
        }

        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(DepthBuffer { texture, view })
    }

    fn release_depth_buffer(&mut self, buffer: DepthBuffer) {
        drop(buffer.view);
        buffer.texture.destroy();
    }

    fn begin_pass(
        &mut self,
        depth: &DepthBuffer,
        descriptor: &PassDescriptor,
    ) -> Result<SurfacePass, SchedulerError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                log::warn!("surface {err}, reconfiguring");
                self.reconfigure();
                return Err(SchedulerError::Surface(err.to_string()));
            }
            Err(err) => return Err(SchedulerError::Surface(err.to_string())),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(descriptor.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(descriptor.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(descriptor.depth_clear),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        Ok(SurfacePass {
            pass,
            encoder,
            surface_texture,
        })
    }

    fn submit(&mut self, pass: SurfacePass) -> Result<(), SchedulerError> {
        let SurfacePass {
            pass,
            encoder,
            surface_texture,
        } = pass;

        // The encoder stays locked until the pass is dropped
        drop(pass);

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}
