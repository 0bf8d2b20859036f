use std::rc::Rc;

use anyhow::Result;
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::common::{create_pipeline, MatrixBinding, PipelineDesc, SceneScheduler, SharedCamera};
use crate::core::{Draw, Drawable, FrameContext, GpuContext, RenderListener, SurfacePass};
use crate::geometry::sphere_geometry;
use crate::types::SphereVertex;

pub const GLOBE_PRIORITY: i32 = 1;
pub const GLOBE_RADIUS: f32 = 1.0;
const WIDTH_SEGMENTS: u32 = 32;
const HEIGHT_SEGMENTS: u32 = 16;

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Globe projection is fixed at 45 degrees regardless of the orbit config
pub fn globe_mvp(view: Mat4, aspect_ratio: f32) -> Mat4 {
    let projection = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect_ratio, NEAR, FAR);
    projection * view * Mat4::IDENTITY
}

/// Unit sphere shaded by its normals
pub struct Globe {
    gpu: GpuContext,
    camera: SharedCamera,
    pipeline: wgpu::RenderPipeline,
    transform: MatrixBinding,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Globe {
    /// Upload the mesh and register the globe's draw listener
    pub fn new(gpu: &GpuContext, scheduler: &SceneScheduler, camera: SharedCamera) -> Rc<Self> {
        let device = gpu.device();
        let geometry = sphere_geometry(GLOBE_RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Vertices"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transform = MatrixBinding::new(device, "Globe Transform");
        let pipeline = create_pipeline(
            gpu,
            PipelineDesc {
                label: "Globe Pipeline",
                shader: include_str!("../shaders/globe.wgsl"),
                vertex_buffers: &[SphereVertex::layout()],
                bind_group_layouts: &[transform.layout()],
                cull_mode: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        log::debug!(
            "globe mesh: {} vertices, {} indices",
            geometry.vertex_count(),
            geometry.index_count()
        );

        let globe = Rc::new(Self {
            gpu: gpu.clone(),
            camera,
            pipeline,
            transform,
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count(),
        });
        scheduler.add_listener(RenderListener::new(GLOBE_PRIORITY, globe.clone()));
        globe
    }

    pub fn radius(&self) -> f32 {
        GLOBE_RADIUS
    }

    fn record(&self, frame: &mut FrameContext<SurfacePass>) -> Result<()> {
        let view = self.camera.borrow().view_matrix();
        self.transform
            .write(self.gpu.queue(), globe_mvp(view, frame.aspect_ratio()));

        let pass = frame.pass.render_pass();
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.transform.bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
        Ok(())
    }
}

impl Drawable<SurfacePass> for Globe {
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<SurfacePass>) -> Draw<'a> {
        self.record(frame).into()
    }
}
