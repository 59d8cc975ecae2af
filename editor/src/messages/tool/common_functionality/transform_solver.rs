use super::transformation_cage::ResizeAnchor;
use crate::consts::{ASPECT_EPSILON, MIN_NODE_SIZE, MIN_OBB_EXTENT, OBB_TRANSFORM_BASE};
use crate::messages::scene::utility_types::{NodeGeometry, NodeId, NodeTransform};
use crate::messages::scene::SceneInterface;
use crate::misc::EditorError;

use canvas_math::{decompose_near, Obb, GEOMETRY_EPSILON};
use glam::{DAffine2, DMat2, DVec2};

/// A selected node as it was when the gesture started.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
	pub id: NodeId,
	/// Absolute transform of the node's parent
	pub parent_transform: DAffine2,
	pub geometry: NodeGeometry,
}

/// How a resize derives the new box from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeOptions {
	/// Keep the width to height ratio of the box at gesture start.
	pub lock_aspect_ratio: bool,
	/// Resize symmetrically about the center of the box.
	pub from_center: bool,
}

/// The state frozen when a move, resize or rotate begins and discarded when it ends.
///
/// The box, its mask matrix and the node snapshots are never refreshed mid-gesture. Every frame derives the new
/// geometry from this snapshot rather than from the nodes it has already moved, so the box cannot chase itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
	pub obb: Obb,
	/// `(cos, sin)` of the box diagonal, which encodes the aspect ratio at gesture start
	pub aspect: (f64, f64),
	/// The box's own frame to canvas
	pub mask: DAffine2,
	pub mask_inverse: DAffine2,
	pub snapshots: Vec<NodeSnapshot>,
	/// Whether any of the selected nodes asks for its aspect ratio to be kept
	pub lock_aspect_ratio: bool,
}

impl GestureSession {
	/// Snapshots the box and the selected nodes. This must happen exactly once, on the frame the gesture begins.
	pub fn save_selected_obb(scene: &dyn SceneInterface, selected: &[NodeId], obb: Obb) -> Result<Self, EditorError> {
		let mut snapshots = Vec::with_capacity(selected.len());
		let mut lock_aspect_ratio = false;
		for &id in selected {
			let node = scene.node(id).ok_or(EditorError::MissingNode(id))?;
			lock_aspect_ratio |= node.lock_aspect_ratio;
			snapshots.push(NodeSnapshot {
				id,
				parent_transform: scene.parent_transform(id),
				geometry: node.geometry,
			});
		}

		let mask = obb.mask_transform();
		let mask_inverse = if mask.matrix2.determinant().abs() > GEOMETRY_EPSILON { mask.inverse() } else { DAffine2::IDENTITY };
		log::trace!("Saved gesture box {obb:?} for {} nodes", snapshots.len());

		Ok(Self {
			obb,
			aspect: obb.aspect_cos_sin(),
			mask,
			mask_inverse,
			snapshots,
			lock_aspect_ratio,
		})
	}

	pub fn ids(&self) -> Vec<NodeId> {
		self.snapshots.iter().map(|snapshot| snapshot.id).collect()
	}

	/// Derives the resized box from a canvas cursor position through the frozen mask.
	///
	/// Returns `None` when the result would be degenerate: both sides under [`MIN_OBB_EXTENT`], or an aspect locked
	/// edge resize of a box whose ratio cannot be kept.
	pub fn compute_obb_from_saved_mask(&self, anchor: ResizeAnchor, cursor: DVec2, options: ResizeOptions) -> Option<Obb> {
		let local = self.mask_inverse.transform_point2(cursor);
		let size = self.obb.size();
		let center = size / 2.;
		let (cos, sin) = self.aspect;
		let (top, bottom, left, right) = anchor.edges();

		// Where the local corners (0, 0) and (width, height) end up
		let mut start = DVec2::ZERO;
		let mut end = size;

		if options.lock_aspect_ratio && anchor.is_corner() {
			let anchor_position = anchor.local_position(size);
			let fixed = if options.from_center { center } else { size - anchor_position };
			let direction = (anchor_position - fixed).signum();
			let hypotenuse = local.distance(fixed);
			let corner = fixed + hypotenuse * DVec2::new(cos, sin) * direction;
			let opposite = if options.from_center { 2. * center - corner } else { fixed };
			start = corner.min(opposite);
			end = corner.max(opposite);
		} else if options.lock_aspect_ratio {
			if left || right {
				if cos < ASPECT_EPSILON {
					return None;
				}
				let (new_start, new_end) = Self::drag_edge(left, local.x, 0., size.x, options.from_center);
				start.x = new_start;
				end.x = new_end;
				let height = (end.x - start.x).abs() * sin / cos;
				start.y = center.y - height / 2.;
				end.y = center.y + height / 2.;
			} else {
				if sin < ASPECT_EPSILON {
					return None;
				}
				let (new_start, new_end) = Self::drag_edge(top, local.y, 0., size.y, options.from_center);
				start.y = new_start;
				end.y = new_end;
				let width = (end.y - start.y).abs() * cos / sin;
				start.x = center.x - width / 2.;
				end.x = center.x + width / 2.;
			}
		} else {
			if left || right {
				(start.x, end.x) = Self::drag_edge(left, local.x, 0., size.x, options.from_center);
			}
			if top || bottom {
				(start.y, end.y) = Self::drag_edge(top, local.y, 0., size.y, options.from_center);
			}
		}

		let new_size = end - start;
		if new_size.x.abs() < MIN_OBB_EXTENT && new_size.y.abs() < MIN_OBB_EXTENT {
			log::debug!("Skipping resize to a degenerate box of size {new_size}");
			return None;
		}

		// Dragging past the opposite edge flips the box along that axis
		let flip = DVec2::new(if new_size.x < 0. { -1. } else { 1. }, if new_size.y < 0. { -1. } else { 1. });
		let position = self.mask.transform_point2(start);
		let extent = new_size.abs().max(DVec2::splat(MIN_OBB_EXTENT));
		Some(Obb {
			x: position.x,
			y: position.y,
			width: extent.x,
			height: extent.y,
			rotation: self.obb.rotation,
			scale_x: self.obb.scale_x * flip.x,
			scale_y: self.obb.scale_y * flip.y,
		})
	}

	/// Moves one edge of the span `[min, max]` to `cursor`, returning the new `(start, end)` of the span.
	/// Resizing from the center mirrors the opposite edge about the middle of the span.
	fn drag_edge(start_edge: bool, cursor: f64, min: f64, max: f64, from_center: bool) -> (f64, f64) {
		let mirrored = min + max - cursor;
		match (start_edge, from_center) {
			(true, false) => (cursor, max),
			(false, false) => (min, cursor),
			(true, true) => (cursor, mirrored),
			(false, true) => (mirrored, cursor),
		}
	}

	/// The single transform that carries the saved box onto `new_obb`.
	pub fn delta_transform(&self, new_obb: &Obb) -> Option<DAffine2> {
		let old = &self.obb;
		let unchanged_shape = old.width == new_obb.width && old.height == new_obb.height && old.rotation == new_obb.rotation && old.scale() == new_obb.scale();
		if unchanged_shape {
			// Exact, so moves never accumulate floating point noise in rotation or scale
			return Some(DAffine2::from_translation(new_obb.position() - old.position()));
		}

		// An axis the saved box has no extent along cannot be scaled, so both boxes keep a unit factor there
		let flat = old.size().abs().cmplt(DVec2::splat(GEOMETRY_EPSILON));
		let base_transform = |obb: &Obb| {
			let size = DVec2::select(flat, DVec2::splat(OBB_TRANSFORM_BASE), obb.size());
			Obb { width: size.x, height: size.y, ..*obb }.transform(OBB_TRANSFORM_BASE)
		};

		let old_transform = base_transform(old);
		if old_transform.matrix2.determinant().abs() < GEOMETRY_EPSILON {
			log::debug!("The saved box {old:?} is degenerate and cannot be transformed");
			return None;
		}
		Some(base_transform(new_obb) * old_transform.inverse())
	}

	/// Applies the delta between the saved box and `new_obb` to every snapshotted node, each in its own parent space.
	///
	/// Nodes are always written from their snapshot, so calling this every frame with the latest box is idempotent.
	/// Returns whether any node geometry was written.
	pub fn fit_selected(&self, scene: &mut dyn SceneInterface, new_obb: &Obb) -> bool {
		let Some(delta) = self.delta_transform(new_obb) else { return false };
		if delta == DAffine2::IDENTITY && self.nodes_match_snapshots(scene) {
			return false;
		}
		let rotation_delta = new_obb.rotation - self.obb.rotation;

		let updates: Vec<_> = self
			.snapshots
			.iter()
			.filter_map(|snapshot| Self::fit_node(snapshot, delta, rotation_delta).map(|geometry| (snapshot.id, geometry)))
			.collect();
		if updates.is_empty() {
			return false;
		}
		scene.replace_nodes(updates);
		true
	}

	fn fit_node(snapshot: &NodeSnapshot, delta: DAffine2, rotation_delta: f64) -> Option<NodeGeometry> {
		let parent = snapshot.parent_transform;
		if parent.matrix2.determinant().abs() < GEOMETRY_EPSILON {
			log::debug!("Node {:?} has a singular parent transform and is left in place", snapshot.id);
			return None;
		}
		let parent_inverse = parent.inverse();
		let old = snapshot.geometry;

		if delta.matrix2 == DMat2::IDENTITY {
			let translation = old.transform.translation + parent_inverse.transform_vector2(delta.translation);
			return Some(NodeGeometry {
				transform: NodeTransform { translation, ..old.transform },
				size: old.size,
			});
		}

		let new_local = parent_inverse * delta * parent * old.transform.to_affine();
		let Some(decomposed) = decompose_near(new_local, old.transform.rotation + rotation_delta) else {
			log::debug!("Node {:?} would get a singular transform and is left in place", snapshot.id);
			return None;
		};
		if old.transform.scale.x.abs() < GEOMETRY_EPSILON || old.transform.scale.y.abs() < GEOMETRY_EPSILON {
			return None;
		}

		// Fold the scale into the size, keeping only the sign in the transform so flips survive
		let factor = decomposed.scale / old.transform.scale;
		// Lines stay lines
		let floor = DVec2::select(old.size.abs().cmplt(DVec2::splat(GEOMETRY_EPSILON)), DVec2::ZERO, DVec2::splat(MIN_NODE_SIZE));
		Some(NodeGeometry {
			transform: NodeTransform {
				translation: decomposed.translation,
				rotation: decomposed.rotation,
				scale: old.transform.scale * factor.signum(),
			},
			size: (old.size * factor.abs()).max(floor),
		})
	}

	/// Whether any node differs from the way it was when the gesture started.
	pub fn changed(&self, scene: &dyn SceneInterface) -> bool {
		!self.nodes_match_snapshots(scene)
	}

	fn nodes_match_snapshots(&self, scene: &dyn SceneInterface) -> bool {
		self.snapshots.iter().all(|snapshot| scene.node(snapshot.id).is_some_and(|node| node.geometry == snapshot.geometry))
	}

	/// Puts every node back the way it was when the gesture started.
	pub fn restore(&self, scene: &mut dyn SceneInterface) {
		scene.replace_nodes(self.snapshots.iter().map(|snapshot| (snapshot.id, snapshot.geometry)).collect());
	}
}

/// The signed angle swept from `start` to `end` about `center`, optionally snapped to whole increments (both in radians).
pub fn rotation_angle(center: DVec2, start: DVec2, end: DVec2, snap_increment: Option<f64>) -> f64 {
	let from = start - center;
	let to = end - center;
	if from.length_squared() < GEOMETRY_EPSILON || to.length_squared() < GEOMETRY_EPSILON {
		return 0.;
	}
	let angle = from.perp_dot(to).atan2(from.dot(to));
	match snap_increment {
		Some(increment) if increment > 0. => (angle / increment).round() * increment,
		_ => angle,
	}
}
