use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::common::{create_pipeline, MatrixBinding, PipelineDesc, SceneScheduler, SharedCamera};
use crate::core::{Clock, Draw, Drawable, FrameContext, GpuContext, RenderListener, SurfacePass};
use crate::geometry::{cube_vertices, CUBE_VERTEX_COUNT};
use crate::types::ColorVertex;

pub const CUBE_PRIORITY: i32 = 0;

/// Radians per second about the (1, 1, 1) diagonal
pub const SPIN_SPEED: f32 = 1.0;

pub fn cube_model_matrix(angle: f32) -> Mat4 {
    Mat4::from_axis_angle(Vec3::ONE.normalize(), angle)
}

/// Vertex-colored cube spinning in front of the orbit camera
pub struct Cube {
    gpu: GpuContext,
    camera: SharedCamera,
    pipeline: wgpu::RenderPipeline,
    transform: MatrixBinding,
    vertex_buffer: wgpu::Buffer,
    clock: RefCell<Clock>,
}

impl Cube {
    pub fn new(gpu: &GpuContext, scheduler: &SceneScheduler, camera: SharedCamera) -> Rc<Self> {
        let device = gpu.device();
        let vertices: Vec<ColorVertex> = cube_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let transform = MatrixBinding::new(device, "Cube Transform");
        let pipeline = create_pipeline(
            gpu,
            PipelineDesc {
                label: "Cube Pipeline",
                shader: include_str!("../shaders/cube.wgsl"),
                vertex_buffers: &[ColorVertex::layout()],
                bind_group_layouts: &[transform.layout()],
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        let cube = Rc::new(Self {
            gpu: gpu.clone(),
            camera,
            pipeline,
            transform,
            vertex_buffer,
            clock: RefCell::new(Clock::new()),
        });
        scheduler.add_listener(RenderListener::new(CUBE_PRIORITY, cube.clone()));
        cube
    }

    fn record(&self, frame: &mut FrameContext<SurfacePass>) -> Result<()> {
        let angle = self.clock.borrow_mut().advance(SPIN_SPEED);
        let model = cube_model_matrix(angle);
        let view_projection = self
            .camera
            .borrow()
            .view_projection_matrix(frame.aspect_ratio());
        self.transform
            .write(self.gpu.queue(), view_projection * model);

        let pass = frame.pass.render_pass();
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.transform.bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..CUBE_VERTEX_COUNT, 0..1);
        Ok(())
    }
}

impl Drawable<SurfacePass> for Cube {
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<SurfacePass>) -> Draw<'a> {
        self.record(frame).into()
    }
}
