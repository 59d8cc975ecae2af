use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
	#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
	#[repr(transparent)]
	pub struct ModifierKeys: u8 {
		const SHIFT           = 0b0000_0001;
		const ALT             = 0b0000_0010;
		const CONTROL         = 0b0000_0100;
		const META_OR_COMMAND = 0b0000_1000;
	}
}

impl ModifierKeys {
	/// Extends or toggles the selection, locks the aspect ratio of a resize and snaps rotation angles.
	pub fn shift(self) -> bool {
		self.contains(Self::SHIFT)
	}

	/// Resizes about the center of the transform box.
	pub fn alt(self) -> bool {
		self.contains(Self::ALT)
	}
}

/// The keys the select tool responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
	Escape,
	Enter,
	ArrowUp,
	ArrowDown,
	ArrowLeft,
	ArrowRight,
	Shift,
	Alt,
}

impl Key {
	/// The unit direction of an arrow key in canvas space (y pointing down), or `None` for other keys.
	pub fn arrow_direction(self) -> Option<glam::DVec2> {
		match self {
			Key::ArrowUp => Some(-glam::DVec2::Y),
			Key::ArrowDown => Some(glam::DVec2::Y),
			Key::ArrowLeft => Some(-glam::DVec2::X),
			Key::ArrowRight => Some(glam::DVec2::X),
			_ => None,
		}
	}
}
