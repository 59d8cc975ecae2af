use glam::DVec2;
use serde::{Deserialize, Serialize};

// Origin is top left
pub type ViewportPosition = DVec2;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// A pointer and where it is in the viewport.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
	pub pointer: PointerId,
	pub position: ViewportPosition,
}

impl PointerEvent {
	pub fn new(pointer: PointerId, position: ViewportPosition) -> Self {
		Self { pointer, position }
	}

	pub fn primary(position: ViewportPosition) -> Self {
		Self::new(PointerId::default(), position)
	}
}
