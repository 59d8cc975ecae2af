use super::DistributionMatch;

use canvas_math::Rect;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnapAxis {
	#[default]
	X,
	Y,
}

impl SnapAxis {
	pub fn unit(self) -> DVec2 {
		match self {
			Self::X => DVec2::X,
			Self::Y => DVec2::Y,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignmentSnapTarget {
	#[default]
	Edge,
	Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionSnapTarget {
	X,
	Y,
	Right,
	Left,
	Up,
	Down,
}

impl DistributionSnapTarget {
	pub const fn is_x(&self) -> bool {
		matches!(self, Self::Left | Self::Right | Self::X)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapTarget {
	#[default]
	None,
	Alignment(AlignmentSnapTarget),
	DistributeEvenly(DistributionSnapTarget),
}

#[derive(Clone, Debug, Default)]
pub struct SnapResults {
	pub points: Vec<SnappedPoint>,
}

/// A correction along one axis that snaps the dragged box to its surroundings.
#[derive(Default, Debug, Clone)]
pub struct SnappedPoint {
	pub axis: SnapAxis,
	/// Signed correction along `axis`, in canvas units
	pub offset: f64,
	pub target: SnapTarget,
	pub distance: f64,
	pub tolerance: f64,
	/// The dragged box after the correction is applied
	pub source_bounds: Option<Rect>,
	/// The aligned point on the dragged box and the point it aligns with
	pub alignment_points: Option<[DVec2; 2]>,
	pub distribution_boxes: VecDeque<Rect>,
	pub distribution_equal_distance: Option<f64>,
}

impl SnappedPoint {
	pub fn align(axis: SnapAxis, target: AlignmentSnapTarget, bounds: Rect, source_point: DVec2, target_point: DVec2, tolerance: f64) -> Self {
		let offset = (target_point - source_point).dot(axis.unit());
		let correction = axis.unit() * offset;
		Self {
			axis,
			offset,
			target: SnapTarget::Alignment(target),
			distance: offset.abs(),
			tolerance,
			source_bounds: Some(bounds.translate(correction)),
			alignment_points: Some([source_point + correction, target_point]),
			..Default::default()
		}
	}

	pub fn distribute(target: DistributionSnapTarget, boxes: VecDeque<Rect>, distances: DistributionMatch, bounds: Rect, translated: Rect, tolerance: f64) -> Self {
		let axis = if target.is_x() { SnapAxis::X } else { SnapAxis::Y };
		Self {
			axis,
			offset: (translated.min() - bounds.min()).dot(axis.unit()),
			target: SnapTarget::DistributeEvenly(target),
			distance: (distances.first - distances.equal).abs(),
			tolerance,
			source_bounds: Some(translated),
			distribution_boxes: boxes,
			distribution_equal_distance: Some(distances.equal),
			..Default::default()
		}
	}

	pub fn other_snap_better(&self, other: &Self) -> bool {
		if self.distance.is_finite() && !other.distance.is_finite() {
			return false;
		}
		if !self.distance.is_finite() && other.distance.is_finite() {
			return true;
		}

		// Prevent flickering when two snaps are equally close
		let bias = 1e-2;
		other.distance < self.distance - bias
	}

	pub fn is_snapped(&self) -> bool {
		self.distance.is_finite() && self.distance <= self.tolerance
	}

	/// The guides that show this snap to the user.
	pub fn snap_lines(&self) -> Vec<SnapLine> {
		match self.target {
			SnapTarget::None => Vec::new(),
			SnapTarget::Alignment(_) => self
				.alignment_points
				.map(|[source, target]| SnapLine {
					kind: SnapLineKind::Point,
					points: vec![source, target],
					direction: Some(self.axis),
				})
				.into_iter()
				.collect(),
			SnapTarget::DistributeEvenly(_) => {
				let distance = self.distribution_equal_distance.unwrap_or_default();
				let unit = self.axis.unit();
				let mut boxes: Vec<Rect> = self.distribution_boxes.iter().copied().collect();
				boxes.sort_by(|a, b| a.min().dot(unit).total_cmp(&b.min().dot(unit)));
				boxes
					.windows(2)
					.map(|pair| (pair[0], pair[1]))
					.map(|(a, b)| SnapLine {
						kind: SnapLineKind::Gap { distance },
						points: gap_points(self.axis, a, b).to_vec(),
						direction: Some(self.axis),
					})
					.collect()
			}
		}
	}
}

/// The two facing edge midpoints of the gap between consecutive boxes along `axis`, drawn across their shared span.
fn gap_points(axis: SnapAxis, a: Rect, b: Rect) -> [DVec2; 2] {
	match axis {
		SnapAxis::X => {
			let y = (a.min().y.max(b.min().y) + a.max().y.min(b.max().y)) / 2.;
			[DVec2::new(a.max().x, y), DVec2::new(b.min().x, y)]
		}
		SnapAxis::Y => {
			let x = (a.min().x.max(b.min().x) + a.max().x.min(b.max().x)) / 2.;
			[DVec2::new(x, a.max().y), DVec2::new(x, b.min().y)]
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SnapLineKind {
	/// Marks an aligned edge, corner or center
	Point,
	/// Marks one of several equal gaps, labelled with the gap
	Gap { distance: f64 },
}

/// A transient alignment guide in canvas space, rebuilt every frame of a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapLine {
	pub kind: SnapLineKind,
	pub points: Vec<DVec2>,
	pub direction: Option<SnapAxis>,
}
