use crate::consts::{BOUNDS_ROTATE_THRESHOLD, BOUNDS_SELECT_THRESHOLD};
use crate::messages::scene::utility_types::NodeId;
use crate::messages::scene::SceneInterface;
use crate::misc::EditorError;

use canvas_math::{decompose_near, normalize_angle, Obb, Rect, GEOMETRY_EPSILON};
use glam::{DAffine2, DVec2};

/// One of the eight resize handles of the transform box, named in the box's own frame (where `Top` is the `y = 0` edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeAnchor {
	TopLeft,
	Top,
	TopRight,
	Right,
	BottomRight,
	Bottom,
	BottomLeft,
	Left,
}

impl ResizeAnchor {
	pub const ALL: [Self; 8] = [Self::TopLeft, Self::Top, Self::TopRight, Self::Right, Self::BottomRight, Self::Bottom, Self::BottomLeft, Self::Left];

	/// Builds the anchor from which edges are grabbed, in order top, bottom, left, right.
	pub fn from_edges(top: bool, bottom: bool, left: bool, right: bool) -> Option<Self> {
		match (top, bottom, left, right) {
			(true, false, true, false) => Some(Self::TopLeft),
			(true, false, false, false) => Some(Self::Top),
			(true, false, false, true) => Some(Self::TopRight),
			(false, false, false, true) => Some(Self::Right),
			(false, true, false, true) => Some(Self::BottomRight),
			(false, true, false, false) => Some(Self::Bottom),
			(false, true, true, false) => Some(Self::BottomLeft),
			(false, false, true, false) => Some(Self::Left),
			_ => None,
		}
	}

	/// The grabbed edges, in order top, bottom, left, right.
	pub fn edges(self) -> (bool, bool, bool, bool) {
		match self {
			Self::TopLeft => (true, false, true, false),
			Self::Top => (true, false, false, false),
			Self::TopRight => (true, false, false, true),
			Self::Right => (false, false, false, true),
			Self::BottomRight => (false, true, false, true),
			Self::Bottom => (false, true, false, false),
			Self::BottomLeft => (false, true, true, false),
			Self::Left => (false, false, true, false),
		}
	}

	pub fn is_corner(self) -> bool {
		matches!(self, Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft)
	}

	/// The anchor's position as a fraction of the box size.
	pub fn factor(self) -> DVec2 {
		let (top, bottom, left, right) = self.edges();
		let x = if left { 0. } else if right { 1. } else { 0.5 };
		let y = if top { 0. } else if bottom { 1. } else { 0.5 };
		DVec2::new(x, y)
	}

	/// Where the anchor sits on a box of `size` in the box's own frame.
	pub fn local_position(self, size: DVec2) -> DVec2 {
		self.factor() * size
	}
}

/// What part of the transform box a point is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorHit {
	Resize(ResizeAnchor),
	Rotate,
	Interior,
}

/// The transform box drawn around the selection, with its resize handles and rotate zones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundingBoxManager {
	/// The box in canvas space
	pub obb: Obb,
	/// Canvas to viewport
	pub transform: DAffine2,
	pub select_threshold: f64,
	pub rotate_threshold: f64,
}

impl BoundingBoxManager {
	pub fn new(obb: Obb, transform: DAffine2) -> Self {
		Self {
			obb,
			transform,
			select_threshold: BOUNDS_SELECT_THRESHOLD,
			rotate_threshold: BOUNDS_ROTATE_THRESHOLD,
		}
	}

	pub fn with_thresholds(mut self, select_threshold: f64, rotate_threshold: f64) -> Self {
		self.select_threshold = select_threshold;
		self.rotate_threshold = rotate_threshold;
		self
	}

	/// Maps the box's own frame (where it spans `[0, width] x [0, height]`) to the viewport.
	fn local_to_viewport(&self) -> Option<DAffine2> {
		let transform = self.transform * self.obb.mask_transform();
		(transform.matrix2.determinant().abs() > GEOMETRY_EPSILON).then_some(transform)
	}

	/// Converts a viewport cursor and threshold into the box's own frame.
	fn local_cursor_and_threshold(&self, cursor: DVec2, threshold: f64) -> Option<(DVec2, f64)> {
		let inverse = self.local_to_viewport()?.inverse();
		Some((inverse.transform_point2(cursor), inverse.transform_vector2(DVec2::new(0., threshold)).length()))
	}

	/// The eight handle positions in canvas space, in the order of [`ResizeAnchor::ALL`].
	pub fn evaluate_transform_handle_positions(&self) -> [DVec2; 8] {
		let mask = self.obb.mask_transform();
		ResizeAnchor::ALL.map(|anchor| mask.transform_point2(anchor.local_position(self.obb.size())))
	}

	/// Check if the user has selected the edge for dragging (returns which edge in order top, bottom, left, right)
	pub fn check_selected_edges(&self, cursor: DVec2) -> Option<(bool, bool, bool, bool)> {
		let (cursor, select_threshold) = self.local_cursor_and_threshold(cursor, self.select_threshold)?;

		let min = DVec2::ZERO;
		let max = self.obb.size();
		if min.x - cursor.x < select_threshold && min.y - cursor.y < select_threshold && cursor.x - max.x < select_threshold && cursor.y - max.y < select_threshold {
			let mut top = (cursor.y - min.y).abs() < select_threshold;
			let mut bottom = (max.y - cursor.y).abs() < select_threshold;
			let mut left = (cursor.x - min.x).abs() < select_threshold;
			let mut right = (max.x - cursor.x).abs() < select_threshold;
			// A box thinner than two thresholds keeps only the edge nearest to the cursor
			if top && bottom {
				top = (cursor.y - min.y).abs() <= (max.y - cursor.y).abs();
				bottom = !top;
			}
			if left && right {
				left = (cursor.x - min.x).abs() <= (max.x - cursor.x).abs();
				right = !left;
			}

			if top || bottom || left || right {
				return Some((top, bottom, left, right));
			}
		}

		None
	}

	/// Check if the user is rotating with the bounds
	pub fn check_rotate(&self, cursor: DVec2) -> bool {
		let Some((cursor, rotate_threshold)) = self.local_cursor_and_threshold(cursor, self.rotate_threshold) else {
			return false;
		};

		let min = DVec2::ZERO;
		let max = self.obb.size();

		let outside_bounds = (min.x > cursor.x || cursor.x > max.x) || (min.y > cursor.y || cursor.y > max.y);
		let inside_extended_bounds = min.x - cursor.x < rotate_threshold && min.y - cursor.y < rotate_threshold && cursor.x - max.x < rotate_threshold && cursor.y - max.y < rotate_threshold;

		outside_bounds & inside_extended_bounds
	}

	/// Check if the cursor is inside the box
	pub fn check_interior(&self, cursor: DVec2) -> bool {
		self.local_cursor_and_threshold(cursor, 0.)
			.is_some_and(|(cursor, _)| Rect::from_position_size(DVec2::ZERO, self.obb.size()).contains_inclusive(cursor))
	}

	/// Which part of the box is under a viewport position. Resize handles win over rotate zones, which win over the interior.
	pub fn anchor_hit_test(&self, cursor: DVec2) -> Option<AnchorHit> {
		if let Some(anchor) = self.check_selected_edges(cursor).and_then(|(top, bottom, left, right)| ResizeAnchor::from_edges(top, bottom, left, right)) {
			Some(AnchorHit::Resize(anchor))
		} else if self.check_rotate(cursor) {
			Some(AnchorHit::Rotate)
		} else if self.check_interior(cursor) {
			Some(AnchorHit::Interior)
		} else {
			None
		}
	}
}

/// The oriented box of a single node in canvas space.
pub fn node_obb(scene: &dyn SceneInterface, node: NodeId) -> Result<Option<Obb>, EditorError> {
	let scene_node = scene.node(node).ok_or(EditorError::MissingNode(node))?;
	let parent = scene.parent_transform(node);
	let absolute = parent * scene_node.geometry.transform.to_affine();
	let reference_angle = parent.matrix2.x_axis.y.atan2(parent.matrix2.x_axis.x) + scene_node.geometry.transform.rotation;
	let Some(decomposed) = decompose_near(absolute, reference_angle) else {
		log::debug!("Node {node:?} has a singular transform and no bounding box");
		return Ok(None);
	};
	let size = scene_node.geometry.size * decomposed.scale.abs();
	Ok(Some(Obb {
		x: decomposed.translation.x,
		y: decomposed.translation.y,
		width: size.x,
		height: size.y,
		rotation: decomposed.rotation,
		scale_x: decomposed.scale.x.signum(),
		scale_y: decomposed.scale.y.signum(),
	}))
}

/// The transform box of a selection.
///
/// A single node keeps its own oriented box and several nodes that share one rotation are boxed in that rotated frame.
/// Anything else gets the axis aligned union of the node boxes.
pub fn selection_obb(scene: &dyn SceneInterface, nodes: &[NodeId]) -> Result<Option<Obb>, EditorError> {
	let mut boxes = Vec::with_capacity(nodes.len());
	for &node in nodes {
		if let Some(obb) = node_obb(scene, node)? {
			boxes.push(obb);
		}
	}

	let [first, rest @ ..] = boxes.as_slice() else { return Ok(None) };
	if rest.is_empty() {
		return Ok(Some(*first));
	}

	let shared_rotation = rest.iter().all(|obb| normalize_angle(obb.rotation - first.rotation).abs() < 1e-9);
	let rotation = if shared_rotation { first.rotation } else { 0. };
	let to_frame = DAffine2::from_angle(-rotation);
	let Some(bounds) = Rect::point_iter(boxes.iter().flat_map(|obb| obb.quad().0).map(|point| to_frame.transform_point2(point))) else {
		return Ok(None);
	};
	let position = DAffine2::from_angle(rotation).transform_point2(bounds.min());
	Ok(Some(Obb::new(position.x, position.y, bounds.width(), bounds.height(), rotation)))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn manager() -> BoundingBoxManager {
		BoundingBoxManager::new(Obb::new(100., 100., 200., 100., 0.), DAffine2::IDENTITY)
	}

	#[test]
	fn corner_handles() {
		let manager = manager();
		assert_eq!(manager.anchor_hit_test(DVec2::new(101., 102.)), Some(AnchorHit::Resize(ResizeAnchor::TopLeft)));
		assert_eq!(manager.anchor_hit_test(DVec2::new(298., 199.)), Some(AnchorHit::Resize(ResizeAnchor::BottomRight)));
		assert_eq!(manager.anchor_hit_test(DVec2::new(305., 95.)), Some(AnchorHit::Resize(ResizeAnchor::TopRight)));
	}

	#[test]
	fn edge_handles() {
		let manager = manager();
		assert_eq!(manager.anchor_hit_test(DVec2::new(200., 104.)), Some(AnchorHit::Resize(ResizeAnchor::Top)));
		assert_eq!(manager.anchor_hit_test(DVec2::new(95., 150.)), Some(AnchorHit::Resize(ResizeAnchor::Left)));
	}

	#[test]
	fn rotate_zone_and_interior() {
		let manager = manager();
		assert_eq!(manager.anchor_hit_test(DVec2::new(85., 85.)), Some(AnchorHit::Rotate));
		assert_eq!(manager.anchor_hit_test(DVec2::new(200., 150.)), Some(AnchorHit::Interior));
		assert_eq!(manager.anchor_hit_test(DVec2::new(50., 50.)), None);
	}

	#[test]
	fn thresholds_are_in_viewport_pixels() {
		// Zoomed in 4x, the 10px handle threshold covers only 2.5 canvas units
		let manager = BoundingBoxManager::new(Obb::new(0., 0., 100., 100., 0.), DAffine2::from_scale(DVec2::splat(4.)));
		assert_eq!(manager.anchor_hit_test(DVec2::new(200., 8.)), Some(AnchorHit::Resize(ResizeAnchor::Top)));
		assert_eq!(manager.anchor_hit_test(DVec2::new(200., 12.)), Some(AnchorHit::Interior));
	}

	#[test]
	fn rotated_box_handles() {
		let manager = BoundingBoxManager::new(Obb::new(0., 0., 100., 50., std::f64::consts::FRAC_PI_2), DAffine2::IDENTITY);
		// The local bottom right corner (100, 50) lands at (-50, 100) on the canvas
		assert_eq!(manager.anchor_hit_test(DVec2::new(-49., 99.)), Some(AnchorHit::Resize(ResizeAnchor::BottomRight)));
		let handles = manager.evaluate_transform_handle_positions();
		assert!(handles[4].abs_diff_eq(DVec2::new(-50., 100.), 1e-9));
	}

	#[test]
	fn thin_box_picks_nearest_edge() {
		let manager = BoundingBoxManager::new(Obb::new(0., 0., 100., 4., 0.), DAffine2::IDENTITY);
		assert_eq!(manager.check_selected_edges(DVec2::new(50., 3.)), Some((false, true, false, false)));
		assert_eq!(manager.check_selected_edges(DVec2::new(50., 1.)), Some((true, false, false, false)));
	}

	#[test]
	fn anchors_round_trip_edges() {
		for anchor in ResizeAnchor::ALL {
			let (top, bottom, left, right) = anchor.edges();
			assert_eq!(ResizeAnchor::from_edges(top, bottom, left, right), Some(anchor));
		}
		assert_eq!(ResizeAnchor::from_edges(true, true, false, false), None);
	}
}
