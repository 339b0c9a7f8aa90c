use std::time::Duration;

use chairview_input::{CursorDelta, InputEvent, InputState};

use crate::camera::Camera;
use crate::config::{CameraBindings, CameraConfig};

/// What the controller did with the camera on the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Free,
    /// Orbit modifier and orbit button held; cursor motion orbits the target.
    Orbiting,
    /// Spin key held; the camera follows the timed spin circle.
    Spinning,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Free => "free",
            CameraMode::Orbiting => "orbiting",
            CameraMode::Spinning => "spinning",
        }
    }
}

/// Drives a [`Camera`] from input state.
///
/// Orbiting is a held state checked on every cursor move; reset and spin are
/// commands applied once per frame while their key is held, reset first so a
/// held spin key wins.
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    config: CameraConfig,
    bindings: CameraBindings,
    mode: CameraMode,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default(), CameraBindings::default())
    }
}

impl CameraController {
    pub fn new(config: CameraConfig, bindings: CameraBindings) -> Self {
        Self {
            camera: Camera::new(&config),
            config,
            bindings,
            mode: CameraMode::Free,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn bindings(&self) -> CameraBindings {
        self.bindings
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// True while both the orbit modifier and the orbit button are held.
    pub fn is_orbit_held(&self, input: &InputState) -> bool {
        input.is_key_held(self.bindings.orbit_modifier)
            && input.is_button_held(self.bindings.orbit_button)
    }

    /// React to an event that `input` has already absorbed. `delta` is what
    /// [`InputState::apply`] returned for it.
    pub fn handle_event(
        &mut self,
        input: &InputState,
        event: &InputEvent,
        delta: Option<CursorDelta>,
    ) {
        match *event {
            InputEvent::CursorMoved { .. } => {
                if let Some(delta) = delta {
                    self.on_cursor_delta(input, delta);
                }
            }
            InputEvent::Scrolled(amount) => self.on_scroll(amount),
            _ => {}
        }
    }

    /// Orbit by `delta` if the orbit chord is held. Returns whether the
    /// camera moved.
    pub fn on_cursor_delta(&mut self, input: &InputState, delta: CursorDelta) -> bool {
        if !self.is_orbit_held(input) {
            return false;
        }
        self.camera.orbit(delta, &self.config);
        true
    }

    pub fn on_scroll(&mut self, amount: f32) {
        self.camera.zoom(amount, &self.config);
        tracing::trace!(fov = self.camera.fov(), "zoom");
    }

    /// Per-frame update. `elapsed` is wall-clock time since the controller
    /// started and drives the spin animation.
    pub fn update(&mut self, input: &InputState, elapsed: Duration) -> CameraMode {
        if input.is_key_held(self.bindings.reset) {
            self.camera.reset(&self.config);
        }

        let spinning = input.is_key_held(self.bindings.spin);
        if spinning {
            self.camera.spin_to(elapsed, &self.config);
        }

        let mode = if spinning {
            CameraMode::Spinning
        } else if self.is_orbit_held(input) {
            CameraMode::Orbiting
        } else {
            CameraMode::Free
        };

        if mode != self.mode {
            tracing::debug!(from = self.mode.label(), to = mode.label(), "camera mode");
            self.mode = mode;
        }
        mode
    }
}
