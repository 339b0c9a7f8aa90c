use chairview_input::{KeyCode, MouseButton};
use glam::Vec3;

/// Camera tuning. The defaults reproduce the chair viewer's fixed setup.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Position restored on startup and by the reset command.
    pub default_position: Vec3,
    /// Look-at point restored on startup and by reset; spin pins it here.
    pub default_target: Vec3,
    pub world_up: Vec3,
    /// Vertical field of view in degrees.
    pub default_fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    /// Degrees of field of view removed per unit of scroll.
    pub scroll_sensitivity: f32,
    /// Distance kept from the target while orbiting.
    pub orbit_radius: f32,
    /// Degrees of yaw/pitch per pixel of cursor motion.
    pub orbit_sensitivity: f32,
    /// Radians kept clear of the poles when clamping pitch.
    pub pitch_margin: f32,
    pub spin_center: Vec3,
    pub spin_radius: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_position: Vec3::new(0.0, 1.0, 4.0),
            default_target: Vec3::new(-0.375, 0.5, 0.4),
            world_up: Vec3::Y,
            default_fov: 45.0,
            min_fov: 1.0,
            max_fov: 55.0,
            scroll_sensitivity: 0.01,
            orbit_radius: 3.0,
            orbit_sensitivity: 1.0,
            pitch_margin: 0.1,
            spin_center: Vec3::new(0.0, 1.0, 0.0),
            spin_radius: 3.5,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    /// Largest pitch magnitude allowed, in radians.
    pub fn pitch_limit(&self) -> f32 {
        std::f32::consts::FRAC_PI_2 - self.pitch_margin
    }
}

/// Which inputs trigger which camera behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraBindings {
    /// Held together with `orbit_button` to orbit.
    pub orbit_modifier: KeyCode,
    pub orbit_button: MouseButton,
    pub reset: KeyCode,
    pub spin: KeyCode,
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self {
            orbit_modifier: KeyCode::AltLeft,
            orbit_button: MouseButton::Left,
            reset: KeyCode::KeyF,
            spin: KeyCode::KeyS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_limit_is_inside_the_pole() {
        let config = CameraConfig::default();
        assert!(config.pitch_limit() < std::f32::consts::FRAC_PI_2);
        assert!((config.pitch_limit() - (std::f32::consts::FRAC_PI_2 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn default_fov_in_range() {
        let config = CameraConfig::default();
        assert!(config.default_fov >= config.min_fov);
        assert!(config.default_fov <= config.max_fov);
    }
}
