use crate::messages::tool::common_functionality::snapping::SnapLine;
use crate::messages::tool::utility_types::ToolType;

use canvas_math::{Decomposed, Rect};
use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewportId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// The placement of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
	pub translation: DVec2,
	/// Radians
	pub rotation: f64,
	pub scale: DVec2,
}

impl Default for NodeTransform {
	fn default() -> Self {
		Self {
			translation: DVec2::ZERO,
			rotation: 0.,
			scale: DVec2::ONE,
		}
	}
}

impl NodeTransform {
	pub fn from_translation(translation: DVec2) -> Self {
		Self { translation, ..Default::default() }
	}

	pub fn to_affine(&self) -> DAffine2 {
		DAffine2::from_scale_angle_translation(self.scale, self.rotation, self.translation)
	}
}

impl From<Decomposed> for NodeTransform {
	fn from(decomposed: Decomposed) -> Self {
		Self {
			translation: decomposed.translation,
			rotation: decomposed.rotation,
			scale: decomposed.scale,
		}
	}
}

/// The geometry of a node that the select tool reads and writes. The node occupies `[0, size]` in its own frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeGeometry {
	pub transform: NodeTransform,
	pub size: DVec2,
}

impl NodeGeometry {
	pub fn local_bounds(&self) -> Rect {
		Rect::from_position_size(DVec2::ZERO, self.size)
	}
}

/// A read-only view of a scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
	pub id: NodeId,
	pub parent: Option<NodeId>,
	/// Interface elements are never selected, hovered or brushed.
	pub ui: bool,
	pub lock_aspect_ratio: bool,
	pub geometry: NodeGeometry,
}

impl SceneNode {
	pub fn new(id: NodeId, geometry: NodeGeometry) -> Self {
		Self {
			id,
			parent: None,
			ui: false,
			lock_aspect_ratio: false,
			geometry,
		}
	}

	pub fn is_selectable(&self) -> bool {
		!self.ui
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnappingState {
	pub grid_enabled: bool,
	/// Pitch of the grid in canvas units
	pub grid_size: f64,
	pub objects_enabled: bool,
}

impl SnappingState {
	/// The grid pitch, if grid snapping is on and has a usable pitch.
	pub fn grid_pitch(&self) -> Option<f64> {
		(self.grid_enabled && self.grid_size.is_finite() && self.grid_size > 0.).then_some(self.grid_size)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapLineStyle {
	/// CSS color
	pub color: String,
	pub width: f64,
	pub dashed: bool,
}

impl Default for SnapLineStyle {
	fn default() -> Self {
		Self {
			color: "#00a8ff".into(),
			width: crate::consts::SNAP_LINE_WIDTH,
			dashed: false,
		}
	}
}

/// Application state the select tool reads every frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
	pub tool: ToolType,
	pub snapping: SnappingState,
	pub snap_line_style: SnapLineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighlightStyle {
	/// Replace the highlight set instead of adding to it.
	pub exclusive: bool,
	pub thick: bool,
	pub width: Option<f64>,
}

impl HighlightStyle {
	pub fn exclusive() -> Self {
		Self {
			exclusive: true,
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
	Brush,
	SnapGuides,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum OverlayContent {
	#[default]
	Hidden,
	/// The marquee, in viewport space
	Brush { rect: Rect },
	/// Guides in canvas space
	SnapGuides { lines: Vec<SnapLine>, style: SnapLineStyle },
}
