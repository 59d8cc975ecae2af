use crate::consts::MAX_NESTING_DEPTH;
use crate::messages::scene::utility_types::{NodeId, SceneNode, ViewportId};
use crate::messages::scene::SceneInterface;

use canvas_math::Rect;
use glam::DVec2;

/// Finds the topmost node under a canvas point that satisfies `predicate`.
///
/// The scene's spatial index narrows the search to nodes whose bounding box touches the point, then each candidate's
/// oriented box decides whether the point is actually inside it.
pub fn topmost_entity(scene: &dyn SceneInterface, viewport: ViewportId, canvas_point: DVec2, predicate: impl Fn(&SceneNode) -> bool) -> Option<NodeId> {
	scene.nodes_intersecting(viewport, Rect::from_point(canvas_point)).into_iter().find(|&id| {
		let Some(node) = scene.node(id) else { return false };
		predicate(&node) && scene.node_quad(id).is_some_and(|quad| quad.contains(canvas_point))
	})
}

/// The direct child of the viewport that contains `node`, which is `node` itself for a top level node.
pub fn top_level_ancestor(scene: &dyn SceneInterface, node: NodeId) -> Option<NodeId> {
	let mut current = node;
	for _ in 0..MAX_NESTING_DEPTH {
		match scene.node(current)?.parent {
			Some(parent) => current = parent,
			None => return Some(current),
		}
	}
	log::warn!("The parent chain of {node:?} is deeper than {MAX_NESTING_DEPTH} and may be cyclic");
	None
}

/// The top level node the user selects by clicking at the point.
///
/// The topmost non-interface node under the point is resolved to its top level ancestor, so a click inside a group picks the group.
pub fn topmost_selectable(scene: &dyn SceneInterface, viewport: ViewportId, canvas_point: DVec2) -> Option<NodeId> {
	let hit = topmost_entity(scene, viewport, canvas_point, SceneNode::is_selectable)?;
	top_level_ancestor(scene, hit).filter(|&ancestor| scene.node(ancestor).is_some_and(|node| node.is_selectable()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::messages::scene::utility_types::{NodeGeometry, NodeTransform};
	use crate::test_utils::MockScene;

	const VIEWPORT: ViewportId = ViewportId(1);

	fn add(scene: &mut MockScene, id: u64, parent: Option<u64>, position: DVec2, size: DVec2) -> NodeId {
		let geometry = NodeGeometry {
			transform: NodeTransform::from_translation(position),
			size,
		};
		let mut node = SceneNode::new(NodeId(id), geometry);
		node.parent = parent.map(NodeId);
		scene.add_node(VIEWPORT, node);
		NodeId(id)
	}

	#[test]
	fn topmost_node_wins() {
		let mut scene = MockScene::default();
		let bottom = add(&mut scene, 1, None, DVec2::ZERO, DVec2::splat(100.));
		let top = add(&mut scene, 2, None, DVec2::splat(50.), DVec2::splat(100.));

		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::splat(75.)), Some(top));
		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::splat(25.)), Some(bottom));
		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::splat(-25.)), None);
		assert_eq!(topmost_selectable(&scene, ViewportId(2), DVec2::splat(25.)), None);
	}

	#[test]
	fn rotated_nodes_use_their_oriented_box() {
		let mut scene = MockScene::default();
		let node = add(&mut scene, 1, None, DVec2::ZERO, DVec2::splat(100.));
		scene.node_mut(node).geometry.transform.rotation = std::f64::consts::FRAC_PI_4;

		// Inside the axis aligned bounds but outside the diamond
		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::new(60., 10.)), None);
		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::new(0., 70.)), Some(node));
	}

	#[test]
	fn interface_nodes_are_skipped() {
		let mut scene = MockScene::default();
		let content = add(&mut scene, 1, None, DVec2::ZERO, DVec2::splat(100.));
		let handle = add(&mut scene, 2, None, DVec2::ZERO, DVec2::splat(100.));
		scene.node_mut(handle).ui = true;

		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::splat(50.)), Some(content));
		assert_eq!(topmost_entity(&scene, VIEWPORT, DVec2::splat(50.), |_| true), Some(handle));
	}

	#[test]
	fn nested_hits_resolve_to_the_top_level_group() {
		let mut scene = MockScene::default();
		let group = add(&mut scene, 1, None, DVec2::ZERO, DVec2::splat(200.));
		let inner = add(&mut scene, 2, Some(1), DVec2::splat(10.), DVec2::splat(100.));
		let leaf = add(&mut scene, 3, Some(2), DVec2::splat(10.), DVec2::splat(20.));

		assert_eq!(top_level_ancestor(&scene, leaf), Some(group));
		assert_eq!(top_level_ancestor(&scene, inner), Some(group));
		assert_eq!(top_level_ancestor(&scene, group), Some(group));
		assert_eq!(topmost_selectable(&scene, VIEWPORT, DVec2::splat(25.)), Some(group));
	}

	#[test]
	fn cyclic_parents_have_no_ancestor() {
		let mut scene = MockScene::default();
		let a = add(&mut scene, 1, Some(2), DVec2::ZERO, DVec2::splat(10.));
		add(&mut scene, 2, Some(1), DVec2::ZERO, DVec2::splat(10.));

		assert_eq!(top_level_ancestor(&scene, a), None);
		assert_eq!(top_level_ancestor(&scene, NodeId(99)), None);
	}
}
