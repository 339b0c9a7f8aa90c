//! Input state: held keys and buttons plus cursor tracking, decoupled from
//! any windowing API's key codes.
//!
//! # Invariants
//! - Only the event collaborator mutates `InputState` (via `apply`).
//! - The first cursor event after start or after input is lost seeds the
//!   cursor without producing a delta.

pub mod event;
pub mod state;

pub use event::{CursorDelta, InputEvent, KeyCode, MouseButton};
pub use state::InputState;
