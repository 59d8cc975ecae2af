use crate::consts::HIGHLIGHT_WIDTH;
use crate::messages::input::{FrameInput, Key, PointerEvent, PointerId};
use crate::messages::preferences::SelectPreferences;
use crate::messages::scene::utility_types::{HighlightStyle, NodeId, ViewportId};
use crate::messages::scene::SceneInterface;
use crate::messages::tool::common_functionality::brush_selection::{brush_rect, nodes_in_brush, same_nodes};
use crate::messages::tool::common_functionality::hit_test::topmost_selectable;
use crate::messages::tool::common_functionality::overlays::OverlaySurfaces;
use crate::messages::tool::common_functionality::snapping::{GridSnapper, SnapData, SnapManager};
use crate::messages::tool::common_functionality::transform_solver::{rotation_angle, GestureSession, ResizeOptions};
use crate::messages::tool::common_functionality::transformation_cage::{selection_obb, AnchorHit, BoundingBoxManager, ResizeAnchor};
use crate::messages::tool::utility_types::{Fsm, ToolActionHandlerData, ToolType};
use crate::misc::EditorError;

use canvas_math::Rect;
use glam::DVec2;
use std::collections::BTreeSet;

/// The selection context of one viewport.
#[derive(Default, Debug)]
pub struct SelectTool {
	fsm_state: SelectToolFsmState,
	tool_data: SelectToolData,
}

/// One step of a frame. A frame is processed as pointer-down, hover, one drag per held pointer, keys, then pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectToolEvent {
	PointerDown(PointerEvent),
	/// Only sent while no pointer is held.
	Hover,
	Drag(PointerEvent),
	Key(Key),
	PointerUp(PointerEvent),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectToolFsmState {
	#[default]
	Idle,
	ReadyToBrush,
	Brush {
		selected: Vec<NodeId>,
	},
	ReadyToSelect,
	Select,
	ReadyToMove,
	Move {
		session: GestureSession,
		/// The click already changed the selection on pointer-down
		resolved_on_down: bool,
		dragged: bool,
	},
	ReadyToResize {
		anchor: ResizeAnchor,
	},
	Resize {
		anchor: ResizeAnchor,
		session: GestureSession,
		/// Canvas offset from the pointer to the grabbed handle
		grab_offset: DVec2,
		dragged: bool,
	},
	ReadyToRotate,
	Rotate {
		session: GestureSession,
		dragged: bool,
	},
	// Reserved for moving the control points of a path
	ReadyToMoveControlPoint,
	MoveControlPoint,
	Editing {
		node: NodeId,
	},
}

impl SelectToolFsmState {
	/// A move, resize or rotate gesture is in progress.
	pub fn is_manipulating(&self) -> bool {
		matches!(self, Self::Move { .. } | Self::Resize { .. } | Self::Rotate { .. })
	}

	/// Waiting for a pointer-down, with nothing held.
	pub fn is_ready(&self) -> bool {
		matches!(
			self,
			Self::Idle | Self::ReadyToSelect | Self::ReadyToMove | Self::ReadyToResize { .. } | Self::ReadyToRotate | Self::ReadyToMoveControlPoint
		)
	}

	fn session(&self) -> Option<&GestureSession> {
		match self {
			Self::Move { session, .. } | Self::Resize { session, .. } | Self::Rotate { session, .. } => Some(session),
			_ => None,
		}
	}

	fn skips_hover(&self) -> bool {
		!self.is_ready()
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Idle => "Idle",
			Self::ReadyToBrush => "ReadyToBrush",
			Self::Brush { .. } => "Brush",
			Self::ReadyToSelect => "ReadyToSelect",
			Self::Select => "Select",
			Self::ReadyToMove => "ReadyToMove",
			Self::Move { .. } => "Move",
			Self::ReadyToResize { .. } => "ReadyToResize",
			Self::Resize { .. } => "Resize",
			Self::ReadyToRotate => "ReadyToRotate",
			Self::Rotate { .. } => "Rotate",
			Self::ReadyToMoveControlPoint => "ReadyToMoveControlPoint",
			Self::MoveControlPoint => "MoveControlPoint",
			Self::Editing { .. } => "Editing",
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct SelectToolData {
	/// Viewport position of the last pointer-down
	drag_start: DVec2,
	/// The pointer that started the current press
	pointer: Option<PointerId>,
	hovered: Option<NodeId>,
	hover_refresh: bool,
	/// What the scene was last told to highlight
	highlighted: Vec<NodeId>,
	bounding_box_manager: Option<BoundingBoxManager>,
	overlays: OverlaySurfaces,
	snap_manager: SnapManager,
}

impl SelectToolData {
	fn press(&mut self, pointer: PointerEvent) {
		self.drag_start = pointer.position;
		self.pointer = Some(pointer.pointer);
	}

	fn past_drag_threshold(&self, position: DVec2, data: &ToolActionHandlerData) -> bool {
		position.distance(self.drag_start) > data.preferences.drag_threshold
	}

	/// Rebuilds the transform box from the selection. While a gesture runs, the box is frozen and only follows the camera.
	fn refresh_bounding_box(&mut self, data: &ToolActionHandlerData, manipulating: bool) -> Result<(), EditorError> {
		if manipulating {
			if let Some(bounding_box_manager) = &mut self.bounding_box_manager {
				bounding_box_manager.transform = data.viewport_transform;
			}
			return Ok(());
		}

		let selected = data.scene.selected(data.viewport);
		let obb = selection_obb(&*data.scene, &selected)?;
		self.bounding_box_manager = obb.map(|obb| {
			BoundingBoxManager::new(obb, data.viewport_transform).with_thresholds(data.preferences.resize_handle_threshold, data.preferences.rotate_zone_threshold)
		});
		Ok(())
	}

	fn set_highlight(&mut self, data: &mut ToolActionHandlerData, nodes: Vec<NodeId>) {
		if same_nodes(&nodes, &self.highlighted) {
			return;
		}
		let style = HighlightStyle {
			width: Some(HIGHLIGHT_WIDTH),
			..HighlightStyle::exclusive()
		};
		data.scene.highlight(data.viewport, &nodes, style);
		self.highlighted = nodes;
	}

	/// Highlights the selection plus the hovered node.
	fn sync_highlight(&mut self, data: &mut ToolActionHandlerData) {
		let mut nodes = data.scene.selected(data.viewport);
		if let Some(hovered) = self.hovered.filter(|hovered| !nodes.contains(hovered)) {
			nodes.push(hovered);
		}
		self.set_highlight(data, nodes);
	}

	fn deselect_all(&mut self, data: &mut ToolActionHandlerData) {
		let selected = data.scene.selected(data.viewport);
		if !selected.is_empty() {
			data.scene.deselect(data.viewport, &selected);
		}
		self.hovered = None;
		self.set_highlight(data, Vec::new());
	}

	/// Snapshots the selection for a gesture, or `None` if nothing selected has a usable box.
	fn start_session(&self, data: &ToolActionHandlerData) -> Result<Option<GestureSession>, EditorError> {
		let selected = data.scene.selected(data.viewport);
		let Some(obb) = selection_obb(&*data.scene, &selected)? else {
			log::debug!("Nothing to transform in {:?}", data.viewport);
			return Ok(None);
		};
		GestureSession::save_selected_obb(&*data.scene, &selected, obb).map(Some)
	}

	/// Changes the selection for a click at the viewport position.
	///
	/// With `extend`, the node under the pointer is toggled in or out of the selection. Without it, the node replaces the
	/// selection, and a click on empty canvas clears it.
	fn click_select(&mut self, data: &mut ToolActionHandlerData, position: DVec2, extend: bool) {
		let hit = topmost_selectable(&*data.scene, data.viewport, data.viewport_to_canvas(position));
		let selected = data.scene.selected(data.viewport);
		match hit {
			Some(node) if extend && selected.contains(&node) => data.scene.deselect(data.viewport, &[node]),
			Some(node) => data.scene.select(data.viewport, &[node], extend),
			None if !extend && !selected.is_empty() => data.scene.deselect(data.viewport, &selected),
			None => {}
		}
		log::debug!("Clicked {hit:?}, selection is now {:?}", data.scene.selected(data.viewport));
		self.sync_highlight(data);
		self.hover_refresh = true;
	}

	/// Resolves the click on pointer-down. A non-empty selection primes a move so a drag in the same press moves it.
	fn resolve_select(&mut self, data: &mut ToolActionHandlerData, position: DVec2) -> Result<SelectToolFsmState, EditorError> {
		let extend = data.input.modifiers.shift();
		self.click_select(data, position, extend);
		Ok(match self.start_session(data)? {
			Some(session) => SelectToolFsmState::Move {
				session,
				resolved_on_down: true,
				dragged: false,
			},
			None => SelectToolFsmState::Select,
		})
	}

	/// Picks the hovered node and derives the ready mode from where the cursor is on the transform box.
	fn hover(&mut self, state: SelectToolFsmState, data: &mut ToolActionHandlerData) -> SelectToolFsmState {
		if !(data.input.cursor_moved || data.input.refresh_hover || self.hover_refresh) {
			return state;
		}
		self.hover_refresh = false;

		let cursor = data.input.cursor;
		let hovered = topmost_selectable(&*data.scene, data.viewport, data.viewport_to_canvas(cursor));
		if hovered != self.hovered {
			log::trace!("Hovering {hovered:?}");
			self.hovered = hovered;
			self.sync_highlight(data);
		}

		let shift = data.input.modifiers.shift();
		match self.bounding_box_manager.as_ref().and_then(|bounding_box_manager| bounding_box_manager.anchor_hit_test(cursor)) {
			Some(AnchorHit::Rotate) => SelectToolFsmState::ReadyToRotate,
			Some(AnchorHit::Resize(anchor)) => SelectToolFsmState::ReadyToResize { anchor },
			Some(AnchorHit::Interior) if hovered.is_some() && !shift => SelectToolFsmState::ReadyToMove,
			Some(AnchorHit::Interior) => SelectToolFsmState::ReadyToSelect,
			None if hovered.is_some() => SelectToolFsmState::ReadyToSelect,
			None => SelectToolFsmState::Idle,
		}
	}

	/// Draws the marquee and selects what it touches, returning the new brush selection.
	fn update_brush(&mut self, data: &mut ToolActionHandlerData, position: DVec2, selected: Vec<NodeId>) -> Vec<NodeId> {
		let marquee = brush_rect(self.drag_start, position);
		self.overlays.show_brush(data.scene, data.viewport, marquee);

		let nodes = nodes_in_brush(&*data.scene, data.viewport, data.viewport_transform, marquee);
		if same_nodes(&nodes, &selected) {
			return selected;
		}

		if nodes.is_empty() {
			let current = data.scene.selected(data.viewport);
			data.scene.deselect(data.viewport, &current);
		} else {
			data.scene.select(data.viewport, &nodes, false);
		}
		log::trace!("Brush selected {nodes:?}");
		self.set_highlight(data, nodes.clone());
		nodes
	}

	/// Moves the selection by the drag, quantized to the grid or snapped to its siblings.
	fn apply_move(&mut self, data: &mut ToolActionHandlerData, session: &GestureSession, position: DVec2) {
		let start = data.viewport_to_canvas(self.drag_start);
		let current = data.viewport_to_canvas(position);
		let snapping = data.app_state.snapping;

		let mut delta = current - start;
		let mut lines = Vec::new();
		if let Some(grid) = snapping.grid_pitch().and_then(GridSnapper::new) {
			delta = grid.snapped_offset(start, current);
		} else if snapping.objects_enabled {
			let candidates = sibling_bounds(&*data.scene, data.viewport, session);
			let snap_data = SnapData {
				bounds: session.obb.bounding_box().translate(delta),
				candidates: &candidates,
				tolerance: data.viewport_distance_to_canvas(data.preferences.snap_tolerance),
			};
			let correction = self.snap_manager.snap_bounds(&snap_data);
			delta += correction.offset;
			lines = correction.lines;
		}

		let style = data.app_state.snap_line_style.clone();
		self.overlays.show_snap_lines(data.scene, data.viewport, lines, style);

		log::trace!("Moving {} nodes by {delta}", session.snapshots.len());
		session.fit_selected(data.scene, &session.obb.translate(delta));
	}

	fn apply_resize(&self, data: &mut ToolActionHandlerData, anchor: ResizeAnchor, session: &GestureSession, grab_offset: DVec2, position: DVec2) {
		let mut cursor = data.viewport_to_canvas(position) + grab_offset;
		if let Some(grid) = data.app_state.snapping.grid_pitch().and_then(GridSnapper::new) {
			cursor = grid.snap_point(cursor);
		}
		let options = ResizeOptions {
			lock_aspect_ratio: data.input.modifiers.shift() || session.lock_aspect_ratio,
			from_center: data.input.modifiers.alt(),
		};

		if let Some(obb) = session.compute_obb_from_saved_mask(anchor, cursor, options) {
			log::trace!("Resizing to {obb:?}");
			session.fit_selected(data.scene, &obb);
		}
	}

	/// Rotates the selection about the center of the saved box by the angle the pointer swept, returning that angle.
	fn apply_rotation(&self, data: &mut ToolActionHandlerData, session: &GestureSession, position: DVec2) -> f64 {
		let snap_increment = data.input.modifiers.shift().then(|| data.preferences.rotate_snap_angle.to_radians());
		let angle = rotation_angle(session.obb.center(), data.viewport_to_canvas(self.drag_start), data.viewport_to_canvas(position), snap_increment);
		let obb = if angle == 0. { session.obb } else { session.obb.rotate_about_center(angle) };
		session.fit_selected(data.scene, &obb);
		angle
	}

	/// Translates the selection by one arrow key press and records it when anything moved.
	fn nudge(&mut self, data: &mut ToolActionHandlerData, direction: DVec2) -> Result<(), EditorError> {
		let amount = if data.input.modifiers.shift() { data.preferences.big_nudge_amount } else { data.preferences.nudge_amount };
		let Some(session) = self.start_session(data)? else { return Ok(()) };

		let offset = direction * amount;
		log::debug!("Nudging {} nodes by {offset}", session.snapshots.len());
		if session.fit_selected(data.scene, &session.obb.translate(offset)) {
			data.scene.record();
		}
		self.hover_refresh = true;
		Ok(())
	}

	/// Reverts any gesture in progress and drops the selection.
	fn cancel(&mut self, state: &SelectToolFsmState, data: &mut ToolActionHandlerData) {
		if let Some(session) = state.session() {
			log::debug!("Reverting {} nodes", session.snapshots.len());
			session.restore(data.scene);
		}
		self.overlays.hide_brush(data.scene);
		self.overlays.clear_snap_lines(data.scene);
		self.deselect_all(data);
		self.pointer = None;
		self.hover_refresh = true;
	}
}

/// Canvas bounds of the nodes sharing a parent with the moved nodes, excluding the moved nodes themselves.
fn sibling_bounds(scene: &dyn SceneInterface, viewport: ViewportId, session: &GestureSession) -> Vec<Rect> {
	let moving: BTreeSet<NodeId> = session.snapshots.iter().map(|snapshot| snapshot.id).collect();
	let parents: BTreeSet<Option<NodeId>> = session.snapshots.iter().filter_map(|snapshot| scene.node(snapshot.id)).map(|node| node.parent).collect();

	parents
		.into_iter()
		.flat_map(|parent| scene.child_nodes(viewport, parent))
		.filter(|id| !moving.contains(id))
		.filter(|&id| scene.node(id).is_some_and(|node| node.is_selectable()))
		.filter_map(|id| scene.node_bounds(id))
		.collect()
}

impl Fsm for SelectToolFsmState {
	type ToolData = SelectToolData;
	type Event = SelectToolEvent;

	fn transition(self, event: SelectToolEvent, tool_data: &mut Self::ToolData, data: &mut ToolActionHandlerData) -> Result<Self, EditorError> {
		let state = match (self, event) {
			// Only the pointer that started the press drives it
			(state, SelectToolEvent::Drag(pointer) | SelectToolEvent::PointerUp(pointer)) if tool_data.pointer != Some(pointer.pointer) => state,

			(SelectToolFsmState::Idle, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				tool_data.deselect_all(data);
				SelectToolFsmState::ReadyToBrush
			}
			(SelectToolFsmState::ReadyToSelect, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				let over_box = tool_data.bounding_box_manager.as_ref().is_some_and(|bounding_box_manager| bounding_box_manager.check_interior(pointer.position));
				let session = if over_box { tool_data.start_session(data)? } else { None };
				match session {
					Some(session) => SelectToolFsmState::Move {
						session,
						resolved_on_down: false,
						dragged: false,
					},
					None => tool_data.resolve_select(data, pointer.position)?,
				}
			}
			(SelectToolFsmState::ReadyToMove, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				let hit = topmost_selectable(&*data.scene, data.viewport, data.viewport_to_canvas(pointer.position));
				let selected = data.scene.selected(data.viewport);
				// Pressing an unselected node inside the box picks it before moving
				if hit.is_some_and(|hit| !selected.contains(&hit)) {
					tool_data.resolve_select(data, pointer.position)?
				} else {
					match tool_data.start_session(data)? {
						Some(session) => SelectToolFsmState::Move {
							session,
							resolved_on_down: false,
							dragged: false,
						},
						None => SelectToolFsmState::Select,
					}
				}
			}
			(SelectToolFsmState::ReadyToResize { anchor }, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				match tool_data.start_session(data)? {
					Some(session) => {
						let handle = session.mask.transform_point2(anchor.local_position(session.obb.size()));
						let grab_offset = handle - data.viewport_to_canvas(pointer.position);
						SelectToolFsmState::Resize {
							anchor,
							session,
							grab_offset,
							dragged: false,
						}
					}
					None => SelectToolFsmState::Idle,
				}
			}
			(SelectToolFsmState::ReadyToRotate, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				match tool_data.start_session(data)? {
					Some(session) => SelectToolFsmState::Rotate { session, dragged: false },
					None => SelectToolFsmState::Idle,
				}
			}
			(SelectToolFsmState::ReadyToMoveControlPoint, SelectToolEvent::PointerDown(pointer)) => {
				tool_data.press(pointer);
				SelectToolFsmState::MoveControlPoint
			}
			(SelectToolFsmState::Editing { node }, SelectToolEvent::PointerDown(pointer)) => {
				let hit = topmost_selectable(&*data.scene, data.viewport, data.viewport_to_canvas(pointer.position));
				if hit == Some(node) {
					SelectToolFsmState::Editing { node }
				} else {
					tool_data.hover_refresh = true;
					SelectToolFsmState::Idle
				}
			}
			// A second pointer during a press is ignored
			(state, SelectToolEvent::PointerDown(_)) => state,

			(state, SelectToolEvent::Hover) if state.skips_hover() => state,
			(state, SelectToolEvent::Hover) => tool_data.hover(state, data),

			(SelectToolFsmState::ReadyToBrush, SelectToolEvent::Drag(pointer)) => {
				if pointer.position.distance(tool_data.drag_start) > data.preferences.brush_threshold {
					let selected = tool_data.update_brush(data, pointer.position, Vec::new());
					SelectToolFsmState::Brush { selected }
				} else {
					SelectToolFsmState::ReadyToBrush
				}
			}
			(SelectToolFsmState::Brush { selected }, SelectToolEvent::Drag(pointer)) => {
				let selected = tool_data.update_brush(data, pointer.position, selected);
				SelectToolFsmState::Brush { selected }
			}
			(SelectToolFsmState::Move { session, resolved_on_down, dragged }, SelectToolEvent::Drag(pointer)) => {
				let dragged = dragged || tool_data.past_drag_threshold(pointer.position, data);
				if dragged {
					tool_data.apply_move(data, &session, pointer.position);
				}
				SelectToolFsmState::Move { session, resolved_on_down, dragged }
			}
			(
				SelectToolFsmState::Resize {
					anchor,
					session,
					grab_offset,
					dragged,
				},
				SelectToolEvent::Drag(pointer),
			) => {
				let dragged = dragged || tool_data.past_drag_threshold(pointer.position, data);
				if dragged {
					tool_data.apply_resize(data, anchor, &session, grab_offset, pointer.position);
				}
				SelectToolFsmState::Resize {
					anchor,
					session,
					grab_offset,
					dragged,
				}
			}
			(SelectToolFsmState::Rotate { session, dragged }, SelectToolEvent::Drag(pointer)) => {
				let dragged = dragged || tool_data.past_drag_threshold(pointer.position, data);
				// Without live rotation the nodes only turn when the pointer is released
				if dragged && data.preferences.live_rotation {
					tool_data.apply_rotation(data, &session, pointer.position);
				}
				SelectToolFsmState::Rotate { session, dragged }
			}
			(state, SelectToolEvent::Drag(_)) => state,

			(state, SelectToolEvent::Key(Key::Escape)) => {
				tool_data.cancel(&state, data);
				SelectToolFsmState::Idle
			}
			(state, SelectToolEvent::Key(Key::Enter)) if state.is_ready() => match data.scene.selected(data.viewport)[..] {
				[node] => {
					log::debug!("Editing {node:?}");
					SelectToolFsmState::Editing { node }
				}
				_ => state,
			},
			(state, SelectToolEvent::Key(Key::Shift | Key::Alt)) => {
				tool_data.hover_refresh = true;
				state
			}
			(state, SelectToolEvent::Key(key)) => {
				if let Some(direction) = key.arrow_direction().filter(|_| state.is_ready()) {
					tool_data.nudge(data, direction)?;
				}
				state
			}

			(SelectToolFsmState::ReadyToBrush | SelectToolFsmState::Select, SelectToolEvent::PointerUp(_)) => {
				tool_data.pointer = None;
				tool_data.hover_refresh = true;
				SelectToolFsmState::Idle
			}
			(SelectToolFsmState::Brush { selected }, SelectToolEvent::PointerUp(pointer)) => {
				let selected = tool_data.update_brush(data, pointer.position, selected);
				tool_data.overlays.hide_brush(data.scene);
				log::debug!("Brush committed {selected:?}");
				tool_data.pointer = None;
				tool_data.hover_refresh = true;
				SelectToolFsmState::Idle
			}
			(SelectToolFsmState::Move { session, resolved_on_down, dragged }, SelectToolEvent::PointerUp(pointer)) => {
				if dragged {
					tool_data.apply_move(data, &session, pointer.position);
					tool_data.overlays.clear_snap_lines(data.scene);
					if session.changed(&*data.scene) {
						data.scene.record();
						log::debug!("Committed move of {:?}", session.ids());
					}
				} else if !resolved_on_down {
					let extend = data.input.modifiers.shift();
					tool_data.click_select(data, pointer.position, extend);
				}
				tool_data.pointer = None;
				tool_data.hover_refresh = true;
				SelectToolFsmState::ReadyToMove
			}
			(
				SelectToolFsmState::Resize {
					anchor,
					session,
					grab_offset,
					dragged,
				},
				SelectToolEvent::PointerUp(pointer),
			) => {
				if dragged && pointer.position != tool_data.drag_start {
					tool_data.apply_resize(data, anchor, &session, grab_offset, pointer.position);
					if session.changed(&*data.scene) {
						data.scene.record();
						log::debug!("Committed resize of {:?} from {anchor:?}", session.ids());
					}
				} else if dragged {
					session.restore(data.scene);
				}
				tool_data.pointer = None;
				tool_data.hover_refresh = true;
				SelectToolFsmState::ReadyToResize { anchor }
			}
			(SelectToolFsmState::Rotate { session, dragged }, SelectToolEvent::PointerUp(pointer)) => {
				let angle = if dragged { tool_data.apply_rotation(data, &session, pointer.position) } else { 0. };
				if angle != 0. && session.changed(&*data.scene) {
					data.scene.record();
					log::debug!("Committed rotation of {:?} by {:.2} degrees", session.ids(), angle.to_degrees());
				}
				tool_data.pointer = None;
				tool_data.hover_refresh = true;
				SelectToolFsmState::ReadyToRotate
			}
			(SelectToolFsmState::MoveControlPoint, SelectToolEvent::PointerUp(_)) => {
				tool_data.pointer = None;
				SelectToolFsmState::ReadyToMoveControlPoint
			}
			(state, SelectToolEvent::PointerUp(_)) => state,
		};

		Ok(state)
	}
}

impl SelectTool {
	pub fn state(&self) -> &SelectToolFsmState {
		&self.fsm_state
	}

	pub fn bounding_box(&self) -> Option<&BoundingBoxManager> {
		self.tool_data.bounding_box_manager.as_ref()
	}

	/// Runs one frame of input through the state machine.
	///
	/// A failed frame leaves the context idle with its overlays hidden, and the error is handed back to the caller.
	pub fn execute(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, input: &FrameInput, preferences: &SelectPreferences) -> Result<(), EditorError> {
		let tool = scene.app_state().tool;
		if tool != ToolType::Select {
			self.step_aside(scene, viewport, tool);
			return Ok(());
		}

		let result = self.process_frame(scene, viewport, input, preferences);
		if let Err(error) = &result {
			log::debug!("Select tool frame failed in {viewport:?}: {error}");
			self.fsm_state = SelectToolFsmState::Idle;
			self.tool_data.pointer = None;
			self.tool_data.overlays.hide_brush(scene);
			self.tool_data.overlays.clear_snap_lines(scene);
		}
		result
	}

	fn process_frame(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, input: &FrameInput, preferences: &SelectPreferences) -> Result<(), EditorError> {
		let mut data = ToolActionHandlerData::new(scene, viewport, input, preferences)?;
		self.tool_data.refresh_bounding_box(&data, self.fsm_state.is_manipulating())?;

		let mut events = Vec::with_capacity(input.active_pointers.len() + input.keys.len() + 3);
		events.extend(input.pointer_down.map(SelectToolEvent::PointerDown));
		if !input.pointer_active() {
			events.push(SelectToolEvent::Hover);
		}
		events.extend(input.active_pointers.iter().copied().map(SelectToolEvent::Drag));
		events.extend(input.keys.iter().copied().map(SelectToolEvent::Key));
		events.extend(input.pointer_up.map(SelectToolEvent::PointerUp));

		let mut state = std::mem::take(&mut self.fsm_state);
		for event in events {
			let previous = state.name();
			state = state.transition(event, &mut self.tool_data, &mut data)?;
			if state.name() != previous {
				log::debug!("Select tool in {viewport:?}: {previous} -> {}", state.name());
			}
		}
		self.fsm_state = state;
		Ok(())
	}

	/// Skips the frame for another tool. Tools that share the selection keep it, any other tool clears it.
	fn step_aside(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, tool: ToolType) {
		if let Some(session) = self.fsm_state.session() {
			session.restore(scene);
		}
		self.fsm_state = SelectToolFsmState::Idle;
		self.tool_data.pointer = None;
		self.tool_data.hovered = None;
		self.tool_data.hover_refresh = true;
		self.tool_data.overlays.hide_brush(scene);
		self.tool_data.overlays.clear_snap_lines(scene);

		if tool.shares_selection() {
			return;
		}
		let selected = scene.selected(viewport);
		if !selected.is_empty() {
			log::debug!("{tool:?} is active, clearing the selection of {viewport:?}");
			scene.deselect(viewport, &selected);
		}
		if !self.tool_data.highlighted.is_empty() {
			scene.highlight(viewport, &[], HighlightStyle::exclusive());
			self.tool_data.highlighted.clear();
		}
	}

	/// Reverts any gesture in progress and removes the overlay surfaces from the scene.
	pub fn detach(&mut self, scene: &mut dyn SceneInterface) {
		if let Some(session) = self.fsm_state.session() {
			session.restore(scene);
		}
		self.tool_data.overlays.detach(scene);
		*self = Self::default();
	}
}
