//! Camera model and controller.
//!
//! The model owns position, target and the derived basis; the controller is a
//! small state machine that reads `InputState` and drives the model through
//! orbit, reset, spin and zoom.
//!
//! # Invariants
//! - `right`, `up` and `direction` stay orthonormal after every mutation.
//! - Pitch stays strictly inside `(-pi/2, pi/2)`.
//! - Field of view stays inside the configured range; inputs are clamped,
//!   never rejected.

mod camera;
mod config;
mod controller;

pub use camera::Camera;
pub use config::{CameraBindings, CameraConfig};
pub use controller::{CameraController, CameraMode};
