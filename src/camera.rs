use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

/// Radians of orbit per pixel of pointer travel
pub const ROTATE_SENSITIVITY: f32 = 0.01;
/// World units of zoom per unit of wheel delta
pub const ZOOM_SENSITIVITY: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitConfigError {
    #[error("radius bounds must satisfy 0 < min <= max (got min {min}, max {max})")]
    RadiusBounds { min: f32, max: f32 },
    #[error("clip planes must satisfy 0 < near < far (got near {near}, far {far})")]
    ClipPlanes { near: f32, far: f32 },
}

/// Orbit camera tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub initial_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            initial_radius: 5.0,
            min_radius: 1.0,
            max_radius: 100.0,
            rotate_sensitivity: ROTATE_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrbitConfig {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.initial_radius = radius;
        self
    }

    pub fn validate(&self) -> Result<(), OrbitConfigError> {
        let (min, max) = (self.min_radius, self.max_radius);
        if !(min > 0.0 && min <= max) {
            return Err(OrbitConfigError::RadiusBounds { min, max });
        }
        let (near, far) = (self.near, self.far);
        if !(near > 0.0 && far > near) {
            return Err(OrbitConfigError::ClipPlanes { near, far });
        }
        Ok(())
    }
}

/// Mutable orbit parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub radius: f32,
    /// x = pitch, y = yaw (radians)
    pub yaw_pitch: Vec2,
    pub dragging: bool,
    pub last_pointer: Vec2,
}

/// Turns pointer drags and wheel scrolls into an orbit around the origin.
///
/// The controller rotates the world rather than the camera, so the view matrix is
/// the inverse of the orbit transform.
#[derive(Debug, Clone)]
pub struct OrbitCameraController {
    config: OrbitConfig,
    state: OrbitState,
}

impl OrbitCameraController {
    pub fn new(config: OrbitConfig) -> Result<Self, OrbitConfigError> {
        config.validate()?;
        let radius = config
            .initial_radius
            .clamp(config.min_radius, config.max_radius);

        Ok(Self {
            config,
            state: OrbitState {
                radius,
                yaw_pitch: Vec2::ZERO,
                dragging: false,
                last_pointer: Vec2::ZERO,
            },
        })
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn radius(&self) -> f32 {
        self.state.radius
    }

    pub fn pitch(&self) -> f32 {
        self.state.yaw_pitch.x
    }

    pub fn yaw(&self) -> f32 {
        self.state.yaw_pitch.y
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.state.dragging = true;
        if x.is_finite() && y.is_finite() {
            self.state.last_pointer = Vec2::new(x, y);
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.state.dragging = false;
    }

    /// Returns true if the orbit changed
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.state.dragging || !x.is_finite() || !y.is_finite() {
            return false;
        }

        let pointer = Vec2::new(x, y);
        let delta = pointer - self.state.last_pointer;
        let k = self.config.rotate_sensitivity;

        self.state.yaw_pitch.y += delta.x * k;
        self.state.yaw_pitch.x = (self.state.yaw_pitch.x + delta.y * k).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.state.last_pointer = pointer;

        true
    }

    /// Positive delta zooms out. Returns true if the radius changed.
    pub fn on_wheel(&mut self, delta_y: f32) -> bool {
        if !delta_y.is_finite() {
            return false;
        }

        let previous = self.state.radius;
        self.state.radius = (previous + delta_y * self.config.zoom_sensitivity)
            .clamp(self.config.min_radius, self.config.max_radius);

        self.state.radius != previous
    }

    /// Orbit transform `Rx(pitch) * Ry(yaw) * T(0, 0, radius)`
    fn orbit_transform(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch())
            * Mat4::from_rotation_y(self.yaw())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.state.radius))
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.orbit_transform().inverse()
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        self.orbit_transform().transform_point3(Vec3::ZERO)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_y, aspect_ratio, self.config.near, self.config.far)
    }

    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}

impl Default for OrbitCameraController {
    fn default() -> Self {
        Self {
            config: OrbitConfig::default(),
            state: OrbitState {
                radius: OrbitConfig::default().initial_radius,
                yaw_pitch: Vec2::ZERO,
                dragging: false,
                last_pointer: Vec2::ZERO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_default_state() {
        let camera = OrbitCameraController::default();
        assert_eq!(camera.radius(), 5.0);
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), 0.0);
        assert!(!camera.is_dragging());
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut camera = OrbitCameraController::default();
        assert!(!camera.on_pointer_move(100.0, 100.0));
        assert_eq!(camera.yaw(), 0.0);
    }

    #[test]
    fn test_drag_rotates() {
        let mut camera = OrbitCameraController::default();
        camera.on_pointer_down(10.0, 10.0);
        assert!(camera.on_pointer_move(60.0, 30.0));

        assert!((camera.yaw() - 0.5).abs() < EPS);
        assert!((camera.pitch() - 0.2).abs() < EPS);
        assert_eq!(camera.state().last_pointer, Vec2::new(60.0, 30.0));

        camera.on_pointer_up();
        assert!(!camera.on_pointer_move(500.0, 500.0));
        assert!((camera.yaw() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = OrbitCameraController::default();
        camera.on_pointer_down(0.0, 0.0);
        camera.on_pointer_move(0.0, 10_000.0);
        assert_eq!(camera.pitch(), FRAC_PI_2);

        camera.on_pointer_move(0.0, -50_000.0);
        assert_eq!(camera.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn test_huge_negative_scroll_clamps_to_min_radius() {
        let mut camera = OrbitCameraController::default();
        assert!(camera.on_wheel(-10_000.0));
        assert_eq!(camera.radius(), 1.0);
        assert!(!camera.on_wheel(-10.0));
    }

    #[test]
    fn test_scroll_clamps_to_max_radius() {
        let mut camera = OrbitCameraController::default();
        camera.on_wheel(1_000_000.0);
        assert_eq!(camera.radius(), 100.0);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut camera = OrbitCameraController::default();
        assert!(!camera.on_wheel(f32::NAN));
        camera.on_pointer_down(0.0, 0.0);
        assert!(!camera.on_pointer_move(f32::INFINITY, 0.0));
        assert_eq!(camera.radius(), 5.0);
        assert_eq!(camera.yaw(), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = OrbitConfig {
            min_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            OrbitCameraController::new(config),
            Err(OrbitConfigError::RadiusBounds { .. })
        ));

        let config = OrbitConfig {
            near: 10.0,
            far: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            OrbitCameraController::new(config),
            Err(OrbitConfigError::ClipPlanes { .. })
        ));
    }

    #[test]
    fn test_initial_radius_clamped_into_range() {
        let camera = OrbitCameraController::new(OrbitConfig::default().with_radius(0.2)).unwrap();
        assert_eq!(camera.radius(), 1.0);
    }

    #[test]
    fn test_view_matrix_at_rest_looks_down_negative_z() {
        let camera = OrbitCameraController::default();
        let view = camera.view_matrix();
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert!((origin_in_view - Vec3::new(0.0, 0.0, -5.0)).length() < EPS);
        assert!((camera.eye_position() - Vec3::new(0.0, 0.0, 5.0)).length() < EPS);
    }
}
