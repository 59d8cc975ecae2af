use crate::application::SelectSystem;
use crate::messages::input::{FrameInput, Key, ModifierKeys, PointerEvent};
use crate::messages::scene::utility_types::*;
use crate::messages::scene::SceneInterface;
use crate::messages::tool::tool_messages::select_tool::SelectToolFsmState;
use crate::misc::EditorError;

use canvas_math::Rect;
use glam::{DAffine2, DVec2};
use std::collections::HashMap;

/// An in-memory scene for driving the select tool in tests.
#[derive(Debug, Default)]
pub struct MockScene {
	/// Every node with its viewport, bottom to top
	pub nodes: Vec<(ViewportId, SceneNode)>,
	pub cameras: HashMap<ViewportId, DAffine2>,
	pub selection: HashMap<ViewportId, Vec<NodeId>>,
	pub highlight: HashMap<ViewportId, Vec<NodeId>>,
	pub overlays: HashMap<OverlayId, (ViewportId, OverlayKind, OverlayContent)>,
	next_overlay: u64,
	/// How many history entries were committed
	pub records: usize,
	pub app_state: AppState,
}

impl MockScene {
	pub fn add_node(&mut self, viewport: ViewportId, node: SceneNode) {
		self.nodes.push((viewport, node));
	}

	pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
		self.nodes.iter_mut().map(|(_, node)| node).find(|node| node.id == id).expect("the node should exist")
	}

	pub fn set_camera(&mut self, viewport: ViewportId, transform: DAffine2) {
		self.cameras.insert(viewport, transform);
	}

	pub fn set_selection(&mut self, viewport: ViewportId, nodes: &[NodeId]) {
		self.selection.insert(viewport, nodes.to_vec());
	}

	pub fn highlighted(&self, viewport: ViewportId) -> Vec<NodeId> {
		let mut highlighted = self.highlight.get(&viewport).cloned().unwrap_or_default();
		highlighted.sort_unstable();
		highlighted
	}

	/// The content of the one overlay of the given kind, if it was ever created.
	pub fn overlay(&self, kind: OverlayKind) -> Option<&OverlayContent> {
		self.overlays.values().find(|(_, overlay_kind, _)| *overlay_kind == kind).map(|(_, _, content)| content)
	}
}

impl SceneInterface for MockScene {
	fn viewport_transform(&self, viewport: ViewportId) -> Option<DAffine2> {
		self.cameras.get(&viewport).copied()
	}

	fn child_nodes(&self, viewport: ViewportId, parent: Option<NodeId>) -> Vec<NodeId> {
		self.nodes.iter().filter(|(node_viewport, node)| *node_viewport == viewport && node.parent == parent).map(|(_, node)| node.id).collect()
	}

	fn node(&self, node: NodeId) -> Option<SceneNode> {
		self.nodes.iter().map(|(_, scene_node)| scene_node).find(|scene_node| scene_node.id == node).cloned()
	}

	fn parent_transform(&self, node: NodeId) -> DAffine2 {
		let Some(parent) = self.node(node).and_then(|node| node.parent) else { return DAffine2::IDENTITY };
		self.absolute_transform(parent).unwrap_or(DAffine2::IDENTITY)
	}

	fn update_node(&mut self, node: NodeId, geometry: NodeGeometry) {
		self.node_mut(node).geometry = geometry;
	}

	fn nodes_intersecting(&self, viewport: ViewportId, bounds: Rect) -> Vec<NodeId> {
		let mut nodes: Vec<_> = self
			.nodes
			.iter()
			.filter(|(node_viewport, _)| *node_viewport == viewport)
			.map(|(_, node)| node.id)
			.filter(|&id| self.node_bounds(id).is_some_and(|node_bounds| node_bounds.intersects(bounds)))
			.collect();
		nodes.reverse();
		nodes
	}

	fn selected(&self, viewport: ViewportId) -> Vec<NodeId> {
		self.selection.get(&viewport).cloned().unwrap_or_default()
	}

	fn select(&mut self, viewport: ViewportId, nodes: &[NodeId], additive: bool) {
		let selection = self.selection.entry(viewport).or_default();
		if !additive {
			selection.clear();
		}
		for &node in nodes {
			if !selection.contains(&node) {
				selection.push(node);
			}
		}
	}

	fn deselect(&mut self, viewport: ViewportId, nodes: &[NodeId]) {
		if let Some(selection) = self.selection.get_mut(&viewport) {
			selection.retain(|node| !nodes.contains(node));
		}
	}

	fn highlight(&mut self, viewport: ViewportId, nodes: &[NodeId], style: HighlightStyle) {
		let highlight = self.highlight.entry(viewport).or_default();
		if style.exclusive {
			highlight.clear();
		}
		for &node in nodes {
			if !highlight.contains(&node) {
				highlight.push(node);
			}
		}
	}

	fn app_state(&self) -> AppState {
		self.app_state.clone()
	}

	fn record(&mut self) {
		self.records += 1;
	}

	fn overlay_create(&mut self, viewport: ViewportId, kind: OverlayKind) -> OverlayId {
		self.next_overlay += 1;
		let overlay = OverlayId(self.next_overlay);
		self.overlays.insert(overlay, (viewport, kind, OverlayContent::Hidden));
		overlay
	}

	fn overlay_update(&mut self, overlay: OverlayId, content: OverlayContent) {
		if let Some((_, _, current)) = self.overlays.get_mut(&overlay) {
			*current = content;
		}
	}

	fn overlay_remove(&mut self, overlay: OverlayId) {
		self.overlays.remove(&overlay);
	}
}

/// A set of utility functions to make the writing of select tool tests more declarative
pub struct EditorTestUtils {
	pub system: SelectSystem,
	pub scene: MockScene,
	pub viewport: ViewportId,
	pub cursor: DVec2,
	pub modifiers: ModifierKeys,
	pressed: bool,
}

impl EditorTestUtils {
	/// A scene with one viewport whose camera is the identity.
	pub fn new() -> Self {
		let _ = env_logger::builder().is_test(true).try_init();

		let viewport = ViewportId(1);
		let mut scene = MockScene::default();
		scene.set_camera(viewport, DAffine2::IDENTITY);

		Self {
			system: SelectSystem::default(),
			scene,
			viewport,
			cursor: DVec2::ZERO,
			modifiers: ModifierKeys::empty(),
			pressed: false,
		}
	}

	pub fn add_node(&mut self, id: u64, position: DVec2, size: DVec2) -> NodeId {
		let geometry = NodeGeometry {
			transform: NodeTransform::from_translation(position),
			size,
		};
		self.scene.add_node(self.viewport, SceneNode::new(NodeId(id), geometry));
		NodeId(id)
	}

	/// Adds a node placed at `position` in the frame of `parent`.
	pub fn add_child(&mut self, id: u64, parent: NodeId, position: DVec2, size: DVec2) -> NodeId {
		let node = self.add_node(id, position, size);
		self.scene.node_mut(node).parent = Some(parent);
		node
	}

	pub fn geometry(&self, node: NodeId) -> NodeGeometry {
		self.scene.node(node).expect("the node should exist").geometry
	}

	/// The selection of the test viewport, sorted.
	pub fn selected(&self) -> Vec<NodeId> {
		let mut selected = self.scene.selected(self.viewport);
		selected.sort_unstable();
		selected
	}

	pub fn state(&self) -> &SelectToolFsmState {
		self.system.state(self.viewport).expect("the viewport should have a selection context")
	}

	pub fn try_frame(&mut self, input: FrameInput) -> Result<(), EditorError> {
		self.system.execute(&mut self.scene, self.viewport, &input)
	}

	pub fn frame(&mut self, input: FrameInput) {
		self.try_frame(input).expect("the frame should succeed");
	}

	/// Input for a frame where nothing new happened.
	fn input(&self) -> FrameInput {
		FrameInput {
			active_pointers: if self.pressed { vec![PointerEvent::primary(self.cursor)] } else { Vec::new() },
			cursor: self.cursor,
			modifiers: self.modifiers,
			..Default::default()
		}
	}

	pub fn idle_frame(&mut self) {
		self.frame(self.input());
	}

	pub fn move_pointer(&mut self, position: DVec2) {
		self.cursor = position;
		let input = FrameInput { cursor_moved: true, ..self.input() };
		self.frame(input);
	}

	pub fn press(&mut self) {
		self.pressed = true;
		let input = FrameInput {
			pointer_down: Some(PointerEvent::primary(self.cursor)),
			..self.input()
		};
		self.frame(input);
	}

	pub fn drag_to(&mut self, position: DVec2) {
		self.move_pointer(position);
	}

	/// Releases the pointer. The release frame still reports the pointer as held, as a browser does for the up event.
	pub fn release(&mut self) {
		let input = FrameInput {
			pointer_up: Some(PointerEvent::primary(self.cursor)),
			..self.input()
		};
		self.pressed = false;
		self.frame(input);
	}

	pub fn click(&mut self, position: DVec2) {
		self.move_pointer(position);
		self.press();
		self.release();
	}

	pub fn drag(&mut self, from: DVec2, to: DVec2) {
		self.move_pointer(from);
		self.press();
		self.drag_to(to);
		self.release();
	}

	pub fn key(&mut self, key: Key) {
		let input = FrameInput { keys: vec![key], ..self.input() };
		self.frame(input);
	}
}
