use crate::messages::input::FrameInput;
use crate::messages::preferences::SelectPreferences;
use crate::messages::scene::utility_types::{AppState, ViewportId};
use crate::messages::scene::SceneInterface;
use crate::misc::EditorError;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// Everything a tool can see and touch while it handles one event.
pub struct ToolActionHandlerData<'a> {
	pub scene: &'a mut dyn SceneInterface,
	pub viewport: ViewportId,
	pub input: &'a FrameInput,
	pub preferences: &'a SelectPreferences,
	pub app_state: AppState,
	/// Canvas to viewport
	pub viewport_transform: DAffine2,
	viewport_transform_inverse: DAffine2,
}

impl<'a> ToolActionHandlerData<'a> {
	/// Gathers the per-frame data, failing if the viewport has no usable camera.
	pub fn new(scene: &'a mut dyn SceneInterface, viewport: ViewportId, input: &'a FrameInput, preferences: &'a SelectPreferences) -> Result<Self, EditorError> {
		let viewport_transform = scene.viewport_transform(viewport).ok_or(EditorError::MissingViewport(viewport))?;
		if viewport_transform.matrix2.determinant().abs() < canvas_math::GEOMETRY_EPSILON {
			return Err(EditorError::Misc(format!("The camera of viewport {viewport:?} is not invertible")));
		}
		let app_state = scene.app_state();
		Ok(Self {
			scene,
			viewport,
			input,
			preferences,
			app_state,
			viewport_transform,
			viewport_transform_inverse: viewport_transform.inverse(),
		})
	}

	pub fn viewport_to_canvas(&self, point: DVec2) -> DVec2 {
		self.viewport_transform_inverse.transform_point2(point)
	}

	/// Converts a distance in viewport pixels into canvas units.
	pub fn viewport_distance_to_canvas(&self, distance: f64) -> f64 {
		self.viewport_transform_inverse.transform_vector2(DVec2::new(distance, 0.)).length()
	}
}

/// The FSM (finite state machine) is a flowchart between different operating states that a specific tool might be in.
/// It is the central "core" logic area of each tool which is in charge of maintaining the state of the tool and responding to events coming from outside (like user input).
/// Every tool, which implements this trait, must implement the `transition()` function.
/// That is where new events are sent, and where the flowchart transition logic occurs to respond to events and end in a new state.
pub trait Fsm: Sized {
	/// The implementing tool must set this to a struct designed to store the internal values stored in the tool.
	/// For example, it might be used to store the starting location of a point when a drag began so the displacement distance can be calculated.
	type ToolData;
	type Event;

	/// Based on its current state, and what the event is, the FSM should direct the tool to an appropriate outcome and end in a new state.
	/// Errors are reserved for a scene that contradicts itself, such as a selection referencing nodes that do not exist.
	fn transition(self, event: Self::Event, tool_data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData) -> Result<Self, EditorError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
	#[default]
	Select,
	Navigate,
	Path,
	Pen,
	Freehand,
	Rectangle,
	Ellipse,
	Text,
	VectorNetwork,
	Eraser,
}

impl ToolType {
	/// Tools that work on the current selection themselves, so the select tool steps aside without clearing it.
	pub fn shares_selection(self) -> bool {
		matches!(self, ToolType::VectorNetwork | ToolType::Eraser)
	}
}
