use super::*;
use crate::consts::DISTRIBUTION_EQUALITY_TOLERANCE;

use canvas_math::Rect;
use glam::DVec2;
use std::collections::VecDeque;

/// Finds positions where the dragged box sits at an equal gap from a run of its neighbours.
#[derive(Clone, Debug, Default)]
pub struct DistributionSnapper {
	/// Neighbours on each [`Side`] of the dragged box, nearest first
	neighbours: [Vec<Rect>; 4],
}

/// The gaps of a distribution snap: the repeated gap of the run, and the gap the dragged box had before snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionMatch {
	pub equal: f64,
	pub first: f64,
}

/// A side of the dragged box, looking outward from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
	Right,
	Left,
	Down,
	Up,
}

impl Side {
	const ALL: [Self; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

	fn outward(self) -> DVec2 {
		match self {
			Self::Right => DVec2::X,
			Self::Left => DVec2::NEG_X,
			Self::Down => DVec2::Y,
			Self::Up => DVec2::NEG_Y,
		}
	}

	fn opposite(self) -> Self {
		match self {
			Self::Right => Self::Left,
			Self::Left => Self::Right,
			Self::Down => Self::Up,
			Self::Up => Self::Down,
		}
	}

	fn target(self) -> DistributionSnapTarget {
		match self {
			Self::Right => DistributionSnapTarget::Right,
			Self::Left => DistributionSnapTarget::Left,
			Self::Down => DistributionSnapTarget::Down,
			Self::Up => DistributionSnapTarget::Up,
		}
	}

	/// The side `bounds` lies on, if it shares a row or a column with `dragged`.
	fn of(dragged: Rect, bounds: Rect) -> Option<Self> {
		let difference = bounds.center() - dragged.center();
		if spans_overlap(dragged, bounds, DVec2::Y) {
			Some(if difference.x > 0. { Self::Right } else { Self::Left })
		} else if spans_overlap(dragged, bounds, DVec2::X) {
			Some(if difference.y > 0. { Self::Down } else { Self::Up })
		} else {
			None
		}
	}

	/// The empty space between `from` and the next box `to` further out on this side.
	fn gap(self, from: Rect, to: Rect) -> f64 {
		extent(to, self.outward()).0 - extent(from, self.outward()).1
	}

	/// The boxes of `rest` that continue a run outward from `from` with the same `gap` between each pair.
	fn continue_run(self, mut from: Rect, rest: &[Rect], gap: f64) -> Vec<Rect> {
		let mut run = Vec::new();
		for &rect in rest {
			// Allow a little more error the further the run reaches
			let tolerance = DISTRIBUTION_EQUALITY_TOLERANCE * (run.len() + 1) as f64;
			if (self.gap(from, rect) - gap).abs() < tolerance {
				run.push(rect);
				from = rect;
			}
		}
		run
	}

	/// The longest run of equally spaced `neighbours` that the dragged box can join within `tolerance`.
	fn longest_run(self, dragged: Rect, neighbours: &[Rect], tolerance: f64) -> Option<(DistributionMatch, Vec<Rect>)> {
		let mut longest: Option<(DistributionMatch, Vec<Rect>)> = None;
		for (index, &first) in neighbours.iter().enumerate() {
			let first_gap = self.gap(dragged, first);
			let rest = &neighbours[index + 1..];
			let Some((offset, &second)) = rest.iter().enumerate().find(|(_, second)| (self.gap(first, **second) - first_gap).abs() < tolerance) else {
				continue;
			};

			let equal = self.gap(first, second);
			let mut run = vec![first, second];
			run.extend(self.continue_run(second, &rest[offset + 1..], equal));
			if longest.as_ref().is_none_or(|(_, longest)| run.len() > longest.len()) {
				longest = Some((DistributionMatch { equal, first: first_gap }, run));
			}
		}
		longest
	}
}

/// The `(near, far)` extent of `rect` projected onto `direction`.
fn extent(rect: Rect, direction: DVec2) -> (f64, f64) {
	let (a, b) = (rect.min().dot(direction), rect.max().dot(direction));
	(a.min(b), a.max(b))
}

fn spans_overlap(a: Rect, b: Rect, direction: DVec2) -> bool {
	let (a, b) = (extent(a, direction), extent(b, direction));
	a.0 <= b.1 && b.0 <= a.1
}

/// Replaces each group of touching or overlapping boxes in a sorted list with their union.
fn merge_overlapping(sorted: Vec<Rect>) -> Vec<Rect> {
	let mut merged: Vec<Rect> = Vec::with_capacity(sorted.len());
	for rect in sorted {
		match merged.last_mut() {
			Some(last) if last.intersects(rect) => *last = Rect::combine_bounds(*last, rect),
			_ => merged.push(rect),
		}
	}
	merged
}

fn sorted_along(mut boxes: Vec<Rect>, axis: SnapAxis) -> VecDeque<Rect> {
	boxes.sort_by(|a, b| a.min().dot(axis.unit()).total_cmp(&b.min().dot(axis.unit())));
	boxes.into()
}

impl DistributionSnapper {
	fn side(&self, side: Side) -> &[Rect] {
		&self.neighbours[side as usize]
	}

	/// Sorts the siblings sharing a row or column with the dragged box onto its four sides.
	pub fn collect_neighbours(&mut self, snap_data: &SnapData) {
		let dragged = snap_data.bounds;
		let mut neighbours: [Vec<Rect>; 4] = Default::default();
		for &bounds in snap_data.candidates {
			if bounds.intersects(dragged) {
				continue;
			}
			if let Some(side) = Side::of(dragged, bounds) {
				neighbours[side as usize].push(bounds);
			}
		}

		for side in Side::ALL {
			let mut rects = std::mem::take(&mut neighbours[side as usize]);
			rects.sort_by(|a, b| a.center().dot(side.outward()).total_cmp(&b.center().dot(side.outward())));
			neighbours[side as usize] = merge_overlapping(rects);
		}
		self.neighbours = neighbours;
	}

	/// Snaps the dragged box into a run on `side`, extending the run through the neighbours on the opposite side.
	fn snap_to_side(&self, side: Side, dragged: Rect, tolerance: f64) -> Option<SnappedPoint> {
		let (matched, run) = side.longest_run(dragged, self.side(side), tolerance)?;
		let snapped = dragged.translate(side.outward() * (matched.first - matched.equal));

		let opposite = side.opposite();
		let mut boxes = opposite.continue_run(snapped, self.side(opposite), matched.equal);
		boxes.push(snapped);
		boxes.extend(run);
		let axis = if side.target().is_x() { SnapAxis::X } else { SnapAxis::Y };
		Some(SnappedPoint::distribute(side.target(), sorted_along(boxes, axis), matched, dragged, snapped, tolerance))
	}

	/// Centers the dragged box between its nearest neighbours on either side.
	fn snap_between(&self, axis: SnapAxis, dragged: Rect, tolerance: f64) -> Option<SnappedPoint> {
		let (before, after, target) = match axis {
			SnapAxis::X => (Side::Left, Side::Right, DistributionSnapTarget::X),
			SnapAxis::Y => (Side::Up, Side::Down, DistributionSnapTarget::Y),
		};
		let (&previous, &next) = (self.side(before).first()?, self.side(after).first()?);

		let unit = axis.unit();
		let middle = (previous.max() + next.min()).dot(unit) / 2.;
		let offset = middle - dragged.center().dot(unit);
		if offset.abs() >= tolerance {
			return None;
		}

		let snapped = dragged.translate(unit * offset);
		let equal = (snapped.min() - previous.max()).dot(unit);
		let matched = DistributionMatch { equal, first: equal + offset };
		Some(SnappedPoint::distribute(target, VecDeque::from([previous, snapped, next]), matched, dragged, snapped, tolerance))
	}

	/// The closest run on either side along `axis`, falling back to centering between the nearest neighbours.
	fn snap_axis(&self, axis: SnapAxis, dragged: Rect, tolerance: f64) -> Option<SnappedPoint> {
		let sides = match axis {
			SnapAxis::X => [Side::Right, Side::Left],
			SnapAxis::Y => [Side::Down, Side::Up],
		};
		sides
			.into_iter()
			.filter_map(|side| self.snap_to_side(side, dragged, tolerance))
			.reduce(|best, other| if best.other_snap_better(&other) { other } else { best })
			.or_else(|| self.snap_between(axis, dragged, tolerance))
	}

	pub fn free_snap(&mut self, snap_data: &SnapData, snap_results: &mut SnapResults) {
		self.collect_neighbours(snap_data);
		for axis in [SnapAxis::X, SnapAxis::Y] {
			if let Some(snapped) = self.snap_axis(axis, snap_data.bounds, snap_data.tolerance) {
				log::trace!("Distribution snap along {axis:?} by {}", snapped.offset);
				snap_results.points.push(snapped);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
		Rect::from_position_size(DVec2::new(x, y), DVec2::new(width, height))
	}

	fn snap(dragged: Rect, candidates: &[Rect], tolerance: f64) -> Vec<SnappedPoint> {
		let mut snapper = DistributionSnapper::default();
		let mut results = SnapResults::default();
		let snap_data = SnapData {
			bounds: dragged,
			candidates,
			tolerance,
		};
		snapper.free_snap(&snap_data, &mut results);
		results.points
	}

	#[test]
	fn joins_a_row_of_equally_spaced_siblings() {
		let points = snap(rect(41., 0., 10., 10.), &[rect(0., 0., 10., 10.), rect(20., 0., 10., 10.)], 2.);

		assert_eq!(points.len(), 1);
		let point = &points[0];
		assert_eq!(point.axis, SnapAxis::X);
		assert_eq!(point.target, SnapTarget::DistributeEvenly(DistributionSnapTarget::Left));
		assert_eq!(point.offset, -1.);
		assert_eq!(point.distribution_equal_distance, Some(10.));
		assert_eq!(point.distribution_boxes, VecDeque::from([rect(0., 0., 10., 10.), rect(20., 0., 10., 10.), rect(40., 0., 10., 10.)]));
	}

	#[test]
	fn run_continues_on_the_far_side() {
		let candidates = [rect(0., 0., 10., 10.), rect(20., 0., 10., 10.), rect(60., 0., 10., 10.)];
		let points = snap(rect(41., 0., 10., 10.), &candidates, 2.);

		assert_eq!(points.len(), 1);
		assert_eq!(points[0].offset, -1.);
		assert_eq!(points[0].distribution_boxes.len(), 4);
		assert_eq!(points[0].distribution_boxes.back(), Some(&rect(60., 0., 10., 10.)));
	}

	#[test]
	fn uneven_gaps_do_not_snap() {
		let points = snap(rect(44., 0., 10., 10.), &[rect(0., 0., 10., 10.), rect(20., 0., 10., 10.)], 2.);
		assert!(points.is_empty());
	}

	#[test]
	fn centers_between_the_nearest_neighbours() {
		let candidates = [rect(0., 0., 10., 10.), rect(50., 0., 10., 10.)];
		// Three units off center
		assert!(snap(rect(22., 0., 10., 10.), &candidates, 2.).is_empty());

		let points = snap(rect(22., 0., 10., 10.), &candidates, 5.);
		assert_eq!(points.len(), 1);
		let point = &points[0];
		assert_eq!(point.target, SnapTarget::DistributeEvenly(DistributionSnapTarget::X));
		assert_eq!(point.offset, 3.);
		assert_eq!(point.distribution_equal_distance, Some(15.));
		assert_eq!(point.source_bounds, Some(rect(25., 0., 10., 10.)));
	}

	#[test]
	fn the_closer_side_wins() {
		// The right run needs no correction, the left one needs 1.5
		let candidates = [rect(0., 0., 10., 10.), rect(20., 0., 10., 10.), rect(63., 0., 10., 10.), rect(84.5, 0., 10., 10.)];
		let points = snap(rect(41.5, 0., 10., 10.), &candidates, 2.);

		assert_eq!(points.len(), 1);
		let point = &points[0];
		assert_eq!(point.target, SnapTarget::DistributeEvenly(DistributionSnapTarget::Right));
		assert_eq!(point.offset, 0.);
		assert_eq!(point.distribution_equal_distance, Some(11.5));
		// The left neighbour happens to sit at the same gap and joins the run
		assert_eq!(point.distribution_boxes.front(), Some(&rect(20., 0., 10., 10.)));
		assert_eq!(point.distribution_boxes.len(), 4);
	}

	#[test]
	fn columns_snap_vertically() {
		let points = snap(rect(0., 41., 10., 10.), &[rect(0., 0., 10., 10.), rect(0., 20., 10., 10.)], 2.);

		assert_eq!(points.len(), 1);
		assert_eq!(points[0].axis, SnapAxis::Y);
		assert_eq!(points[0].offset, -1.);
		assert_eq!(points[0].distribution_equal_distance, Some(10.));
	}

	#[test]
	fn neighbours_sort_onto_sides() {
		let dragged = rect(0., 0., 10., 10.);
		let candidates = [
			rect(30., 0., 10., 10.),
			rect(-30., 2., 10., 10.),
			rect(0., 40., 10., 10.),
			rect(2., -30., 10., 10.),
			rect(50., 50., 10., 10.),
			rect(5., 5., 10., 10.),
		];
		let mut snapper = DistributionSnapper::default();
		snapper.collect_neighbours(&SnapData {
			bounds: dragged,
			candidates: &candidates,
			tolerance: 2.,
		});

		assert_eq!(snapper.side(Side::Right), &[rect(30., 0., 10., 10.)]);
		assert_eq!(snapper.side(Side::Left), &[rect(-30., 2., 10., 10.)]);
		assert_eq!(snapper.side(Side::Down), &[rect(0., 40., 10., 10.)]);
		assert_eq!(snapper.side(Side::Up), &[rect(2., -30., 10., 10.)]);
	}

	#[test]
	fn overlapping_neighbours_count_as_one() {
		let candidates = [rect(-40., 0., 10., 10.), rect(-20., 0., 8., 10.), rect(-15., 0., 10., 10.)];
		let mut snapper = DistributionSnapper::default();
		snapper.collect_neighbours(&SnapData {
			bounds: rect(20., 0., 10., 10.),
			candidates: &candidates,
			tolerance: 2.,
		});

		assert_eq!(snapper.side(Side::Left), &[rect(-20., 0., 15., 10.), rect(-40., 0., 10., 10.)]);
	}
}
