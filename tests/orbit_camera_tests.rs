use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3, Vec4};
use orbit_render::camera::{OrbitCameraController, OrbitConfig};

/// Small deterministic generator so the sequences are reproducible
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self, range: f32) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let unit = (self.0 >> 40) as f32 / (1u64 << 24) as f32;
        (unit * 2.0 - 1.0) * range
    }
}

// ============================================================================
// Clamping
// ============================================================================

#[test]
fn test_pitch_stays_clamped_for_any_drag_sequence() {
    let mut rng = Lcg(7);
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(0.0, 0.0);

    let (mut x, mut y) = (0.0, 0.0);
    for _ in 0..2_000 {
        x += rng.next_f32(400.0);
        y += rng.next_f32(400.0);
        camera.on_pointer_move(x, y);
        assert!(camera.pitch() >= -FRAC_PI_2 && camera.pitch() <= FRAC_PI_2);
    }
}

#[test]
fn test_radius_never_below_min_for_any_wheel_sequence() {
    let mut rng = Lcg(42);
    let mut camera = OrbitCameraController::default();
    let min = camera.config().min_radius;
    let max = camera.config().max_radius;

    for _ in 0..2_000 {
        camera.on_wheel(rng.next_f32(5_000.0) - 1_000.0);
        assert!(camera.radius() >= min && camera.radius() <= max);
    }
}

#[test]
fn test_huge_negative_scroll_lands_on_min_radius() {
    let mut camera = OrbitCameraController::new(OrbitConfig::default()).unwrap();
    assert_eq!(camera.radius(), 5.0);
    camera.on_wheel(-10_000.0);
    assert_eq!(camera.radius(), 1.0);
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn test_view_matrix_is_pure() {
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(0.0, 0.0);
    camera.on_pointer_move(37.0, -12.0);

    let first = camera.view_matrix();
    let second = camera.view_matrix();
    assert_eq!(first, second);
}

#[test]
fn test_view_is_inverse_of_orbit_transform() {
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(0.0, 0.0);
    camera.on_pointer_move(80.0, 30.0);
    camera.on_wheel(250.0);

    let orbit = Mat4::from_rotation_x(camera.pitch())
        * Mat4::from_rotation_y(camera.yaw())
        * Mat4::from_translation(Vec3::new(0.0, 0.0, camera.radius()));
    assert!((camera.view_matrix() * orbit).abs_diff_eq(Mat4::IDENTITY, 1e-5));
}

#[test]
fn test_view_projection_is_projection_times_view() {
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(10.0, 10.0);
    camera.on_pointer_move(55.0, 90.0);

    let aspect = 16.0 / 9.0;
    let expected = camera.projection_matrix(aspect) * camera.view_matrix();
    assert!(camera
        .view_projection_matrix(aspect)
        .abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_origin_stays_centred_while_orbiting() {
    let mut rng = Lcg(3);
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(0.0, 0.0);

    for _ in 0..50 {
        camera.on_pointer_move(rng.next_f32(300.0), rng.next_f32(300.0));
        let clip = camera.view_projection_matrix(1.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((camera.eye_position().length() - camera.radius()).abs() < 1e-3);
    }
}

#[test]
fn test_wider_aspect_narrows_horizontal_scale() {
    let camera = OrbitCameraController::default();
    let square = camera.projection_matrix(1.0);
    let wide = camera.projection_matrix(2.0);
    assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
    assert_eq!(wide.y_axis.y, square.y_axis.y);
}
