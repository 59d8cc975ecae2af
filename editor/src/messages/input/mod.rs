pub mod frame_input;
pub mod input_keyboard;
pub mod input_mouse;

pub use frame_input::FrameInput;
pub use input_keyboard::{Key, ModifierKeys};
pub use input_mouse::{PointerEvent, PointerId, ViewportPosition};
