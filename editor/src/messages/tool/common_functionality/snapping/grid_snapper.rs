use glam::DVec2;

/// Quantizes canvas positions to a square grid anchored at the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSnapper {
	pub spacing: f64,
}

impl GridSnapper {
	/// A snapper for the pitch, or `None` when the pitch cannot form a grid.
	pub fn new(spacing: f64) -> Option<Self> {
		(spacing.is_finite() && spacing > 0.).then_some(Self { spacing })
	}

	/// The nearest grid intersection to the point.
	pub fn snap_point(&self, point: DVec2) -> DVec2 {
		(point / self.spacing).round() * self.spacing
	}

	/// The offset between the grid-quantized `start` and `current`, which is always a whole number of grid steps.
	pub fn snapped_offset(&self, start: DVec2, current: DVec2) -> DVec2 {
		((current / self.spacing).round() - (start / self.spacing).round()) * self.spacing
	}
}
