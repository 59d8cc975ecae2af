mod alignment_snapper;
mod distribution_snapper;
mod grid_snapper;
mod snap_results;

pub use alignment_snapper::*;
pub use distribution_snapper::*;
pub use grid_snapper::*;
pub use snap_results::*;

use canvas_math::Rect;
use glam::DVec2;

/// The dragged box and its surroundings for one frame of a move.
#[derive(Debug, Clone, Copy)]
pub struct SnapData<'a> {
	/// Canvas bounds of the dragged selection before snapping
	pub bounds: Rect,
	/// Canvas bounds of the unselected siblings
	pub candidates: &'a [Rect],
	/// Canvas units
	pub tolerance: f64,
}

/// The correction that snaps a dragged box, and the guides that explain it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapCorrection {
	pub offset: DVec2,
	pub lines: Vec<SnapLine>,
}

/// Handles snapping of a dragged selection to its siblings
#[derive(Debug, Clone, Default)]
pub struct SnapManager {
	alignment_snapper: AlignmentSnapper,
	distribution_snapper: DistributionSnapper,
}

impl SnapManager {
	/// Collects every snap within tolerance, on both axes, from both snappers.
	pub fn free_snap(&mut self, snap_data: &SnapData) -> SnapResults {
		let mut snap_results = SnapResults::default();
		if snap_data.candidates.is_empty() {
			return snap_results;
		}
		self.alignment_snapper.free_snap(snap_data, &mut snap_results);
		self.distribution_snapper.free_snap(snap_data, &mut snap_results);
		snap_results
	}

	/// Computes the smallest correction per axis that snaps the box, along with its guides.
	pub fn snap_bounds(&mut self, snap_data: &SnapData) -> SnapCorrection {
		let snap_results = self.free_snap(snap_data);

		let mut best_x: Option<&SnappedPoint> = None;
		let mut best_y: Option<&SnappedPoint> = None;
		for snapped in snap_results.points.iter().filter(|snapped| snapped.is_snapped()) {
			let best = match snapped.axis {
				SnapAxis::X => &mut best_x,
				SnapAxis::Y => &mut best_y,
			};
			if best.is_none_or(|best| best.other_snap_better(snapped)) {
				*best = Some(snapped);
			}
		}

		let offset = DVec2::new(best_x.map_or(0., |snapped| snapped.offset), best_y.map_or(0., |snapped| snapped.offset));
		let mut lines = Vec::new();
		for snapped in best_x.into_iter().chain(best_y) {
			// Guides are drawn against the fully corrected box, so shift the dragged end by the other axis' correction
			let other_axis = offset - snapped.axis.unit() * snapped.offset;
			lines.extend(snapped.snap_lines().into_iter().map(|mut line| {
				if line.kind == SnapLineKind::Point {
					if let Some(source) = line.points.first_mut() {
						*source += other_axis;
					}
				}
				line
			}));
		}

		log::trace!("Snapped {:?} by {offset} with {} guides", snap_data.bounds, lines.len());
		SnapCorrection { offset, lines }
	}
}
