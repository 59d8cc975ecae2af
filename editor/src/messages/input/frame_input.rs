use super::input_keyboard::{Key, ModifierKeys};
use super::input_mouse::{PointerEvent, ViewportPosition};

use serde::{Deserialize, Serialize};

/// Everything the select tool reads from the input devices of one viewport during one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
	/// A pointer went down this frame.
	pub pointer_down: Option<PointerEvent>,
	/// A pointer was released this frame.
	pub pointer_up: Option<PointerEvent>,
	/// Pointers currently held down.
	pub active_pointers: Vec<PointerEvent>,
	pub cursor: ViewportPosition,
	pub cursor_moved: bool,
	/// Forces the hovered entity and the ready mode to be recomputed even though the cursor is still.
	pub refresh_hover: bool,
	/// Keys pressed this frame, in order.
	pub keys: Vec<Key>,
	pub modifiers: ModifierKeys,
}

impl FrameInput {
	pub fn pointer_active(&self) -> bool {
		!self.active_pointers.is_empty()
	}
}
