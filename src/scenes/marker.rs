use std::rc::Rc;

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::common::{create_pipeline, MatrixBinding, PipelineDesc, SceneScheduler, SharedCamera};
use crate::core::{Draw, Drawable, FrameContext, GpuContext, RenderListener, SurfacePass};
use crate::types::PositionVertex;

/// Drawn after the globe so it tests against the globe's depth
pub const MARKER_PRIORITY: i32 = 2;

/// Where the marker sits on the globe
pub const MARKER_DIRECTION: Vec3 = Vec3::X;

const VERTICES: [PositionVertex; 3] = [
    PositionVertex {
        position: [0.0, 0.5, 0.0],
    },
    PositionVertex {
        position: [-0.5, -0.5, 0.0],
    },
    PositionVertex {
        position: [0.5, -0.5, 0.0],
    },
];

/// Place a marker on the sphere surface, local -Z along the surface normal.
///
/// Returns `None` for a zero or non-finite direction.
pub fn marker_model_matrix(direction: Vec3, sphere_radius: f32) -> Option<Mat4> {
    let normal = direction.try_normalize()?;
    let position = normal * sphere_radius;

    // lookAt degenerates when the normal is parallel to up
    let up = if normal.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };

    Some(Mat4::look_at_rh(position, position + normal, up).inverse())
}

/// Red triangle stuck to the globe surface
pub struct Marker {
    gpu: GpuContext,
    camera: SharedCamera,
    pipeline: wgpu::RenderPipeline,
    transform: MatrixBinding,
    vertex_buffer: wgpu::Buffer,
    model: Mat4,
}

impl Marker {
    pub fn new(
        gpu: &GpuContext,
        scheduler: &SceneScheduler,
        camera: SharedCamera,
        sphere_radius: f32,
    ) -> Rc<Self> {
        let device = gpu.device();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Marker Vertices"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let transform = MatrixBinding::new(device, "Marker Transform");
        let pipeline = create_pipeline(
            gpu,
            PipelineDesc {
                label: "Marker Pipeline",
                shader: include_str!("../shaders/marker.wgsl"),
                vertex_buffers: &[PositionVertex::layout()],
                bind_group_layouts: &[transform.layout()],
                cull_mode: Some(wgpu::Face::Front),
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        let model = marker_model_matrix(MARKER_DIRECTION, sphere_radius).unwrap_or(Mat4::IDENTITY);

        let marker = Rc::new(Self {
            gpu: gpu.clone(),
            camera,
            pipeline,
            transform,
            vertex_buffer,
            model,
        });
        scheduler.add_listener(RenderListener::new(MARKER_PRIORITY, marker.clone()));
        marker
    }

    fn record(&self, frame: &mut FrameContext<SurfacePass>) -> Result<()> {
        let view_projection = self
            .camera
            .borrow()
            .view_projection_matrix(frame.aspect_ratio());
        self.transform
            .write(self.gpu.queue(), view_projection * self.model);

        let pass = frame.pass.render_pass();
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.transform.bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..VERTICES.len() as u32, 0..1);
        Ok(())
    }
}

impl Drawable<SurfacePass> for Marker {
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<SurfacePass>) -> Draw<'a> {
        self.record(frame).into()
    }
}
