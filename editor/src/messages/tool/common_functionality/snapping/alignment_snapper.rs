use super::*;
use crate::consts::MAX_ALIGNMENT_CANDIDATES;

use canvas_math::Rect;
use glam::DVec2;

/// Snaps the edges, edge midpoints and center of the dragged box to those of its neighbours.
#[derive(Clone, Debug, Default)]
pub struct AlignmentSnapper {
	bounding_box_points: Vec<(DVec2, AlignmentSnapTarget)>,
}

/// The corners, edge midpoints and center of a box.
fn get_bbox_points(bounds: Rect) -> [(DVec2, AlignmentSnapTarget); 9] {
	let [min, max] = [bounds.min(), bounds.max()];
	let center = bounds.center();
	let edge = AlignmentSnapTarget::Edge;
	[
		(min, edge),
		(DVec2::new(center.x, min.y), edge),
		(DVec2::new(max.x, min.y), edge),
		(DVec2::new(max.x, center.y), edge),
		(max, edge),
		(DVec2::new(center.x, max.y), edge),
		(DVec2::new(min.x, max.y), edge),
		(DVec2::new(min.x, center.y), edge),
		(center, AlignmentSnapTarget::Center),
	]
}

impl AlignmentSnapper {
	pub fn collect_bounding_box_points(&mut self, snap_data: &SnapData) {
		self.bounding_box_points.clear();

		let mut candidates = snap_data.candidates.to_vec();
		if candidates.len() > MAX_ALIGNMENT_CANDIDATES {
			let center = snap_data.bounds.center();
			candidates.sort_by(|a, b| a.center().distance_squared(center).total_cmp(&b.center().distance_squared(center)));
			candidates.truncate(MAX_ALIGNMENT_CANDIDATES);
		}

		for bounds in candidates {
			self.bounding_box_points.extend(get_bbox_points(bounds));
		}
	}

	pub fn snap_bbox_points(&self, snap_data: &SnapData, snap_results: &mut SnapResults) {
		let tolerance = snap_data.tolerance;

		let mut snap_x: Option<SnappedPoint> = None;
		let mut snap_y: Option<SnappedPoint> = None;

		for (source, _) in get_bbox_points(snap_data.bounds) {
			for &(target_point, target) in &self.bounding_box_points {
				for (axis, best) in [(SnapAxis::X, &mut snap_x), (SnapAxis::Y, &mut snap_y)] {
					let distance = (target_point - source).dot(axis.unit()).abs();
					if distance > tolerance {
						continue;
					}
					let snapped = SnappedPoint::align(axis, target, snap_data.bounds, source, target_point, tolerance);
					if best.as_ref().is_none_or(|best| best.other_snap_better(&snapped)) {
						*best = Some(snapped);
					}
				}
			}
		}

		snap_results.points.extend(snap_x);
		snap_results.points.extend(snap_y);
	}

	pub fn free_snap(&mut self, snap_data: &SnapData, snap_results: &mut SnapResults) {
		self.collect_bounding_box_points(snap_data);
		self.snap_bbox_points(snap_data, snap_results);
	}
}
