use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::OrbitCameraController;

/// Pixels per scroll line, matching what browsers report for one wheel notch
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Adapter that bridges Winit events to the orbit camera.
///
/// Winit reports button presses without a position, so the last cursor position is
/// tracked here and handed to `on_pointer_down`.
#[derive(Debug, Clone, Default)]
pub struct OrbitInput {
    cursor: Option<(f32, f32)>,
}

impl OrbitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in surface-local pixels
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Apply a window event to the camera. Returns true if a new frame is needed.
    pub fn process_event(&mut self, camera: &mut OrbitCameraController, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
                        camera.on_pointer_down(x, y);
                    }
                    ElementState::Released => camera.on_pointer_up(),
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                camera.on_pointer_move(x, y)
            }
            WindowEvent::CursorLeft { .. } => {
                camera.on_pointer_up();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => camera.on_wheel(wheel_delta_pixels(*delta)),
            _ => false,
        }
    }
}

/// Convert a winit scroll into a browser-style `deltaY` (positive = scroll down)
pub fn wheel_delta_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => -(y as f32),
    }
}
