use crate::messages::scene::utility_types::{NodeId, ViewportId};
use crate::messages::scene::SceneInterface;

use canvas_math::{Quad, Rect};
use glam::{DAffine2, DVec2};

/// The marquee spanned by the pointer-down position and the current cursor, in viewport space.
pub fn brush_rect(start: DVec2, current: DVec2) -> Rect {
	Rect::from_box([start, current])
}

/// The top level, non-interface nodes of the viewport whose bounds touch the marquee, bottom to top.
pub fn nodes_in_brush(scene: &dyn SceneInterface, viewport: ViewportId, viewport_transform: DAffine2, marquee: Rect) -> Vec<NodeId> {
	if viewport_transform.matrix2.determinant().abs() < canvas_math::GEOMETRY_EPSILON {
		return Vec::new();
	}
	let marquee = viewport_transform.inverse() * marquee;

	scene
		.child_nodes(viewport, None)
		.into_iter()
		.filter(|&id| scene.node(id).is_some_and(|node| node.is_selectable()))
		.filter(|&id| scene.node_bounds(id).is_some_and(|bounds| marquee.intersects(Quad::from(bounds))))
		.collect()
}

/// Whether two selections hold the same nodes, ignoring order.
pub fn same_nodes(a: &[NodeId], b: &[NodeId]) -> bool {
	let mut a = a.to_vec();
	let mut b = b.to_vec();
	a.sort_unstable();
	b.sort_unstable();
	a == b
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::messages::scene::utility_types::{NodeGeometry, NodeTransform, SceneNode};
	use crate::test_utils::MockScene;

	fn add(scene: &mut MockScene, id: u64, parent: Option<u64>, position: DVec2) -> NodeId {
		let geometry = NodeGeometry {
			transform: NodeTransform::from_translation(position),
			size: DVec2::splat(20.),
		};
		let mut node = SceneNode::new(NodeId(id), geometry);
		node.parent = parent.map(NodeId);
		scene.add_node(ViewportId(1), node);
		NodeId(id)
	}

	#[test]
	fn brush_selects_top_level_nodes_only() {
		let mut scene = MockScene::default();
		let group = add(&mut scene, 1, None, DVec2::ZERO);
		add(&mut scene, 2, Some(1), DVec2::splat(5.));
		let other = add(&mut scene, 3, None, DVec2::new(50., 0.));
		add(&mut scene, 4, None, DVec2::new(200., 0.));

		let marquee = brush_rect(DVec2::new(60., 30.), DVec2::new(10., 10.));
		assert_eq!(nodes_in_brush(&scene, ViewportId(1), DAffine2::IDENTITY, marquee), vec![group, other]);
	}

	#[test]
	fn marquee_is_mapped_through_the_camera() {
		let mut scene = MockScene::default();
		let node = add(&mut scene, 1, None, DVec2::new(100., 100.));
		let camera = DAffine2::from_scale(DVec2::splat(0.5));

		// The node sits at (50, 50) to (60, 60) in the viewport
		let marquee = brush_rect(DVec2::new(45., 45.), DVec2::new(52., 52.));
		assert_eq!(nodes_in_brush(&scene, ViewportId(1), camera, marquee), vec![node]);
		assert!(nodes_in_brush(&scene, ViewportId(1), DAffine2::IDENTITY, marquee).is_empty());
	}

	#[test]
	fn selections_compare_as_sets() {
		assert!(same_nodes(&[NodeId(1), NodeId(2)], &[NodeId(2), NodeId(1)]));
		assert!(!same_nodes(&[NodeId(1)], &[NodeId(1), NodeId(2)]));
	}
}
