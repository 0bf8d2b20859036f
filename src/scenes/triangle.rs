use std::rc::Rc;

use super::common::{create_pipeline, PipelineDesc, SceneScheduler};
use crate::core::{Draw, Drawable, FrameContext, GpuContext, RenderListener, SurfacePass};

pub const TRIANGLE_PRIORITY: i32 = 0;

/// Red triangle with positions baked into the shader
pub struct Triangle {
    pipeline: wgpu::RenderPipeline,
}

impl Triangle {
    pub fn new(gpu: &GpuContext, scheduler: &SceneScheduler) -> Rc<Self> {
        let pipeline = create_pipeline(
            gpu,
            PipelineDesc {
                label: "Triangle Pipeline",
                shader: include_str!("../shaders/triangle.wgsl"),
                vertex_buffers: &[],
                bind_group_layouts: &[],
                cull_mode: None,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );

        let triangle = Rc::new(Self { pipeline });
        scheduler.add_listener(RenderListener::new(TRIANGLE_PRIORITY, triangle.clone()));
        triangle
    }
}

impl Drawable<SurfacePass> for Triangle {
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<SurfacePass>) -> Draw<'a> {
        let pass = frame.pass.render_pass();
        pass.set_pipeline(&self.pipeline);
        pass.draw(0..3, 0..1);
        Draw::done()
    }
}
