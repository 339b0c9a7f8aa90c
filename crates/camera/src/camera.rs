use std::time::Duration;

use chairview_common::FrameMatrices;
use chairview_input::CursorDelta;
use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Look-at camera with an orbit parameterisation around its target.
///
/// Position and target are only changed through methods so the derived basis
/// can be refreshed on every mutation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    world_up: Vec3,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees.
    fov: f32,
    orbit_radius: f32,
    /// Accumulated cursor yaw, degrees.
    yaw: f32,
    /// Accumulated cursor pitch, degrees. Unbounded; only the effective
    /// angle is clamped, so motion past the limit must be undone first.
    pitch: f32,
    pitch_limit: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.default_position,
            target: config.default_target,
            world_up: config.world_up,
            direction: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            fov: config.default_fov,
            orbit_radius: config.orbit_radius,
            yaw: 0.0,
            pitch: 0.0,
            pitch_limit: config.pitch_limit(),
            near: config.near,
            far: config.far,
        };
        camera.refresh_basis();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Unit vector from the target toward the camera.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    /// Orbit yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw.to_radians()
    }

    /// Effective orbit pitch in radians, inside the pitch limit.
    pub fn pitch(&self) -> f32 {
        self.pitch
            .to_radians()
            .clamp(-self.pitch_limit, self.pitch_limit)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.world_up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// View and projection for a framebuffer of the given size.
    pub fn frame_matrices(&self, width: u32, height: u32) -> FrameMatrices {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        FrameMatrices {
            view: self.view_matrix(),
            projection: self.projection_matrix(aspect),
        }
    }

    /// Move the camera and its look-at point together.
    pub fn place(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.refresh_basis();
    }

    /// Restore the configured position and target. Orbit angles and field of
    /// view are left as they are.
    pub fn reset(&mut self, config: &CameraConfig) {
        self.place(config.default_position, config.default_target);
    }

    /// Accumulate a cursor delta into yaw/pitch and re-place the camera on the
    /// orbit sphere around the current target.
    pub fn orbit(&mut self, delta: CursorDelta, config: &CameraConfig) {
        let limit = config.pitch_limit();

        self.yaw += delta.x * config.orbit_sensitivity;
        self.pitch += delta.y * config.orbit_sensitivity;

        let yaw = self.yaw();
        let pitch = self.pitch.to_radians().clamp(-limit, limit);
        self.pitch_limit = limit;
        let offset = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        );
        self.position = self.target + self.orbit_radius * offset;
        self.refresh_basis();
    }

    /// Put the camera on the spin circle at `elapsed` seconds (one radian per
    /// second) with the target pinned to its default.
    pub fn spin_to(&mut self, elapsed: Duration, config: &CameraConfig) {
        let t = elapsed.as_secs_f64();
        let radius = f64::from(config.spin_radius);
        let offset = Vec3::new((radius * t.sin()) as f32, 0.0, (radius * t.cos()) as f32);
        self.place(config.spin_center + offset, config.default_target);
    }

    /// Narrow (positive scroll) or widen the field of view.
    pub fn zoom(&mut self, scroll: f32, config: &CameraConfig) {
        self.fov = (self.fov - scroll * config.scroll_sensitivity)
            .clamp(config.min_fov, config.max_fov);
    }

    fn refresh_basis(&mut self) {
        self.direction = (self.position - self.target)
            .try_normalize()
            .unwrap_or(self.direction);
        self.right = self
            .world_up
            .cross(self.direction)
            .try_normalize()
            .unwrap_or(self.right);
        self.up = self.direction.cross(self.right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::f64::consts::TAU;

    fn assert_orthonormal(camera: &Camera) {
        let (d, r, u) = (camera.direction(), camera.right(), camera.up());
        assert!(d.dot(r).abs() < 1e-5, "direction.right = {}", d.dot(r));
        assert!(d.dot(u).abs() < 1e-5, "direction.up = {}", d.dot(u));
        assert!(r.dot(u).abs() < 1e-5, "right.up = {}", r.dot(u));
        for v in [d, r, u] {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 1.0, 4.0));
        assert_eq!(cam.target(), Vec3::new(-0.375, 0.5, 0.4));
        assert_eq!(cam.fov(), 45.0);
        assert_orthonormal(&cam);

        let m = cam.frame_matrices(640, 480);
        assert!(!m.view.col(0).x.is_nan());
        assert!(!m.projection.col(0).x.is_nan());
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::default();
        let target_in_view = cam.view_matrix().transform_point3(cam.target());
        assert!(target_in_view.x.abs() < 1e-5);
        assert!(target_in_view.y.abs() < 1e-5);
        let distance = (cam.position() - cam.target()).length();
        assert!((target_in_view.z + distance).abs() < 1e-5);
    }

    #[test]
    fn projection_uses_fov_in_radians() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(1.0);
        let expected = 1.0 / (45.0_f32.to_radians() / 2.0).tan();
        assert!((proj.col(1).y - expected).abs() < 1e-5);
    }

    #[test]
    fn zero_height_framebuffer_is_finite() {
        let cam = Camera::default();
        let m = cam.frame_matrices(640, 0);
        assert!(m.projection.is_finite());
    }

    #[test]
    fn zoom_clamps_to_range() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);

        cam.zoom(10.0, &config);
        assert!((cam.fov() - 44.9).abs() < 1e-4);

        for _ in 0..10 {
            cam.zoom(10_000.0, &config);
        }
        assert_eq!(cam.fov(), 1.0);

        cam.zoom(-1_000_000.0, &config);
        assert_eq!(cam.fov(), 55.0);
    }

    #[test]
    fn zoom_matches_clamp_formula() {
        let config = CameraConfig::default();
        for delta in [-5000.0, -120.0, -1.0, 0.0, 0.5, 1.0, 37.0, 900.0, 4500.0] {
            let mut cam = Camera::new(&config);
            let before = cam.fov();
            cam.zoom(delta, &config);
            let expected = (before - 0.01 * delta).clamp(1.0, 55.0);
            assert!((cam.fov() - expected).abs() < 1e-5, "delta {delta}");
        }
    }

    #[test]
    fn orbit_keeps_radius_and_basis() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        let deltas = [
            (100.0, 0.0),
            (-35.0, 12.0),
            (3.0, -80.0),
            (720.0, 45.0),
            (-1.5, 300.0),
            (0.25, -900.0),
        ];
        for (x, y) in deltas {
            cam.orbit(CursorDelta { x, y }, &config);
            assert!((cam.position().distance(cam.target()) - 3.0).abs() < 1e-4);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn pitch_never_reaches_pole() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        for _ in 0..50 {
            cam.orbit(CursorDelta { x: 0.0, y: 1.0e6 }, &config);
            assert!(cam.pitch() < FRAC_PI_2);
            assert_orthonormal(&cam);
        }
        for _ in 0..50 {
            cam.orbit(CursorDelta { x: 0.0, y: -1.0e6 }, &config);
            assert!(cam.pitch() > -FRAC_PI_2);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn pitch_overshoot_must_be_undone_before_it_moves() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        cam.orbit(CursorDelta { x: 0.0, y: 10_000.0 }, &config);
        let clamped = cam.pitch();
        assert_eq!(clamped, config.pitch_limit());
        let held = cam.position();

        // 9990° of accumulated pitch is still far past the limit.
        cam.orbit(CursorDelta { x: 0.0, y: -10.0 }, &config);
        assert_eq!(cam.pitch(), clamped);
        assert!(cam.position().abs_diff_eq(held, 1e-6));

        // Travelling back the whole overshoot leaves the limit.
        cam.orbit(CursorDelta { x: 0.0, y: -9_990.0 }, &config);
        assert!(cam.pitch().abs() < 1e-4);
    }

    #[test]
    fn reset_derives_direction_from_target() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        cam.orbit(CursorDelta { x: 50.0, y: 20.0 }, &config);
        cam.reset(&config);

        let expected = (config.default_position - config.default_target).normalize();
        assert!(cam.direction().distance(expected) < 1e-6);
        assert_orthonormal(&cam);
    }

    #[test]
    fn reset_is_idempotent() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        cam.spin_to(Duration::from_secs_f32(1.3), &config);

        cam.reset(&config);
        let (p1, t1) = (cam.position(), cam.target());
        cam.reset(&config);
        assert_eq!(cam.position(), p1);
        assert_eq!(cam.target(), t1);
        assert_eq!(p1, config.default_position);
        assert_eq!(t1, config.default_target);
    }

    #[test]
    fn spin_is_periodic() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        for t in [0.0_f64, 0.7, 2.5, 11.0] {
            cam.spin_to(Duration::from_secs_f64(t), &config);
            let a = cam.position() - config.spin_center;
            cam.spin_to(Duration::from_secs_f64(t + TAU), &config);
            let b = cam.position() - config.spin_center;

            assert!(a.distance(b) < 1e-4, "t = {t}");
            assert_eq!(a.y, 0.0);
            assert!((a.length() - 3.5).abs() < 1e-4);
            assert_eq!(cam.target(), config.default_target);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn spin_derives_direction_from_target() {
        let config = CameraConfig::default();
        let mut cam = Camera::new(&config);
        cam.spin_to(Duration::from_secs_f64(1.25), &config);
        let expected = (cam.position() - cam.target()).normalize();
        assert!(cam.direction().abs_diff_eq(expected, 1e-6));
    }
}
