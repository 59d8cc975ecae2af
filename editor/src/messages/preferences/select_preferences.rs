use crate::consts::{BIG_NUDGE_AMOUNT, BOUNDS_ROTATE_THRESHOLD, BOUNDS_SELECT_THRESHOLD, BRUSH_THRESHOLD, DRAG_THRESHOLD, NUDGE_AMOUNT, ROTATE_SNAP_ANGLE, SNAP_POINT_TOLERANCE};
use crate::misc::EditorError;

use serde::{Deserialize, Serialize};

/// Tunables of the select tool. Distances ending in `_threshold` or `_tolerance` are in viewport pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectPreferences {
	pub drag_threshold: f64,
	pub brush_threshold: f64,
	pub resize_handle_threshold: f64,
	pub rotate_zone_threshold: f64,
	pub snap_tolerance: f64,
	/// Degrees
	pub rotate_snap_angle: f64,
	/// Canvas units
	pub nudge_amount: f64,
	/// Canvas units
	pub big_nudge_amount: f64,
	/// Rotate the selection while a rotation is dragged instead of only when it is released.
	pub live_rotation: bool,
}

impl Default for SelectPreferences {
	fn default() -> Self {
		Self {
			drag_threshold: DRAG_THRESHOLD,
			brush_threshold: BRUSH_THRESHOLD,
			resize_handle_threshold: BOUNDS_SELECT_THRESHOLD,
			rotate_zone_threshold: BOUNDS_ROTATE_THRESHOLD,
			snap_tolerance: SNAP_POINT_TOLERANCE,
			rotate_snap_angle: ROTATE_SNAP_ANGLE,
			nudge_amount: NUDGE_AMOUNT,
			big_nudge_amount: BIG_NUDGE_AMOUNT,
			live_rotation: false,
		}
	}
}

impl SelectPreferences {
	/// Parses preferences from JSON. Missing fields take their default value.
	pub fn from_json(serialized: &str) -> Result<Self, EditorError> {
		let preferences: Self = serde_json::from_str(serialized)?;
		preferences.validate()?;
		Ok(preferences)
	}

	pub fn validate(&self) -> Result<(), EditorError> {
		let distances = [
			("drag_threshold", self.drag_threshold),
			("brush_threshold", self.brush_threshold),
			("resize_handle_threshold", self.resize_handle_threshold),
			("rotate_zone_threshold", self.rotate_zone_threshold),
			("snap_tolerance", self.snap_tolerance),
			("rotate_snap_angle", self.rotate_snap_angle),
			("nudge_amount", self.nudge_amount),
			("big_nudge_amount", self.big_nudge_amount),
		];
		if let Some((name, value)) = distances.into_iter().find(|(_, value)| !value.is_finite() || *value < 0.) {
			return Err(EditorError::InvalidPreferences(format!("`{name}` must be a finite, non-negative number but is {value}")));
		}
		if self.brush_threshold < self.drag_threshold {
			return Err(EditorError::InvalidPreferences(format!(
				"`brush_threshold` ({}) must not be smaller than `drag_threshold` ({})",
				self.brush_threshold, self.drag_threshold
			)));
		}
		Ok(())
	}
}
