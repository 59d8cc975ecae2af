//! The select tool of a 2D canvas editor: turns per-frame pointer and key input into selection changes, move, resize
//! and rotate gestures, and snap guides on a scene owned by the host.

pub mod application;
pub mod consts;
pub mod messages;
pub mod misc;

#[cfg(test)]
pub mod test_utils;

#[doc(inline)]
pub use application::SelectSystem;
#[doc(inline)]
pub use misc::EditorError;
