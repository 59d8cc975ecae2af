use super::utility_types::*;

use canvas_math::{Quad, Rect};
use glam::DAffine2;

/// The narrow capability the select tool needs from the scene that owns the nodes.
///
/// Implementors own node storage, spatial indexing, selection and highlight sets, overlays and the undo history. The
/// select tool never creates or destroys nodes; it only reads and writes their transform and size.
pub trait SceneInterface {
	// Camera

	/// The transform from canvas space to the viewport's pixel space, or `None` if the viewport has no camera.
	fn viewport_transform(&self, viewport: ViewportId) -> Option<DAffine2>;

	// Nodes

	/// The direct children of `parent` in the viewport (or the viewport's own top level nodes if `parent` is `None`), bottom to top.
	fn child_nodes(&self, viewport: ViewportId, parent: Option<NodeId>) -> Vec<NodeId>;

	fn node(&self, node: NodeId) -> Option<SceneNode>;

	/// The absolute transform of the node's parent in canvas space. Top level nodes have the identity.
	fn parent_transform(&self, node: NodeId) -> DAffine2;

	fn update_node(&mut self, node: NodeId, geometry: NodeGeometry);

	/// Writes many nodes at once.
	fn replace_nodes(&mut self, nodes: Vec<(NodeId, NodeGeometry)>) {
		for (node, geometry) in nodes {
			self.update_node(node, geometry);
		}
	}

	// Spatial queries

	/// Nodes of the viewport (at any depth) whose canvas bounding box intersects `bounds`, ordered from top to bottom.
	fn nodes_intersecting(&self, viewport: ViewportId, bounds: Rect) -> Vec<NodeId>;

	// Selection and highlight

	fn selected(&self, viewport: ViewportId) -> Vec<NodeId>;

	/// Selects `nodes`, keeping the existing selection if `additive` or replacing it otherwise.
	fn select(&mut self, viewport: ViewportId, nodes: &[NodeId], additive: bool);

	fn deselect(&mut self, viewport: ViewportId, nodes: &[NodeId]);

	fn highlight(&mut self, viewport: ViewportId, nodes: &[NodeId], style: HighlightStyle);

	// Application state

	fn app_state(&self) -> AppState;

	/// Commits the current node state as one undo history entry.
	fn record(&mut self);

	// Overlays

	fn overlay_create(&mut self, viewport: ViewportId, kind: OverlayKind) -> OverlayId;

	fn overlay_update(&mut self, overlay: OverlayId, content: OverlayContent);

	fn overlay_remove(&mut self, overlay: OverlayId);

	// Provided transform utilities

	/// The transform from the node's own frame to canvas space.
	fn absolute_transform(&self, node: NodeId) -> Option<DAffine2> {
		let local = self.node(node)?.geometry.transform.to_affine();
		Some(self.parent_transform(node) * local)
	}

	/// The node's box in canvas space.
	fn node_quad(&self, node: NodeId) -> Option<Quad> {
		let scene_node = self.node(node)?;
		Some(self.parent_transform(node) * scene_node.geometry.transform.to_affine() * scene_node.geometry.local_bounds())
	}

	fn node_bounds(&self, node: NodeId) -> Option<Rect> {
		self.node_quad(node).map(|quad| quad.bounding_box())
	}
}
