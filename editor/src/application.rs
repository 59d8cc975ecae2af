use crate::messages::input::FrameInput;
use crate::messages::preferences::SelectPreferences;
use crate::messages::scene::utility_types::ViewportId;
use crate::messages::scene::SceneInterface;
use crate::messages::tool::tool_messages::select_tool::{SelectTool, SelectToolFsmState};
use crate::misc::EditorError;

use std::collections::HashMap;

/// The select tool for every viewport of a scene.
///
/// Each viewport gets its own selection context the first time it is executed. Contexts live until their viewport is
/// removed or the system is finalized.
#[derive(Debug, Default)]
pub struct SelectSystem {
	contexts: HashMap<ViewportId, SelectTool>,
	pub preferences: SelectPreferences,
}

impl SelectSystem {
	/// Construct the system, failing if the preferences are unusable.
	pub fn new(preferences: SelectPreferences) -> Result<Self, EditorError> {
		preferences.validate()?;
		Ok(Self {
			contexts: HashMap::new(),
			preferences,
		})
	}

	/// Runs one frame of input for the viewport. Call once per viewport per animation frame.
	pub fn execute(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, input: &FrameInput) -> Result<(), EditorError> {
		let context = self.contexts.entry(viewport).or_insert_with(|| {
			log::debug!("Creating a selection context for {viewport:?}");
			SelectTool::default()
		});
		context.execute(scene, viewport, input, &self.preferences)
	}

	/// Drops the selection context of a viewport that no longer exists, detaching its overlays.
	pub fn remove_viewport(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId) {
		if let Some(mut context) = self.contexts.remove(&viewport) {
			context.detach(scene);
		}
	}

	/// Detaches every overlay surface and clears all per-viewport state.
	pub fn finalize(&mut self, scene: &mut dyn SceneInterface) {
		for (viewport, mut context) in self.contexts.drain() {
			log::debug!("Finalizing the selection context of {viewport:?}");
			context.detach(scene);
		}
	}

	pub fn state(&self, viewport: ViewportId) -> Option<&SelectToolFsmState> {
		self.contexts.get(&viewport).map(SelectTool::state)
	}
}
