use super::snapping::SnapLine;
use crate::messages::scene::utility_types::{OverlayContent, OverlayId, OverlayKind, SnapLineStyle, ViewportId};
use crate::messages::scene::SceneInterface;

use canvas_math::Rect;

/// The two transient overlay surfaces a selection context draws: the brush marquee and the snap guides.
///
/// Surfaces are created on first use and stay attached, hidden when idle, until [`OverlaySurfaces::detach`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySurfaces {
	brush: Option<OverlayId>,
	snap_guides: Option<OverlayId>,
	brush_visible: bool,
	guides_visible: bool,
}

impl OverlaySurfaces {
	fn surface(slot: &mut Option<OverlayId>, scene: &mut dyn SceneInterface, viewport: ViewportId, kind: OverlayKind) -> OverlayId {
		*slot.get_or_insert_with(|| scene.overlay_create(viewport, kind))
	}

	pub fn show_brush(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, rect: Rect) {
		let overlay = Self::surface(&mut self.brush, scene, viewport, OverlayKind::Brush);
		scene.overlay_update(overlay, OverlayContent::Brush { rect });
		self.brush_visible = true;
	}

	pub fn hide_brush(&mut self, scene: &mut dyn SceneInterface) {
		if let Some(overlay) = self.brush.filter(|_| self.brush_visible) {
			scene.overlay_update(overlay, OverlayContent::Hidden);
		}
		self.brush_visible = false;
	}

	pub fn show_snap_lines(&mut self, scene: &mut dyn SceneInterface, viewport: ViewportId, lines: Vec<SnapLine>, style: SnapLineStyle) {
		if lines.is_empty() {
			self.clear_snap_lines(scene);
			return;
		}
		let overlay = Self::surface(&mut self.snap_guides, scene, viewport, OverlayKind::SnapGuides);
		scene.overlay_update(overlay, OverlayContent::SnapGuides { lines, style });
		self.guides_visible = true;
	}

	pub fn clear_snap_lines(&mut self, scene: &mut dyn SceneInterface) {
		if let Some(overlay) = self.snap_guides.filter(|_| self.guides_visible) {
			scene.overlay_update(overlay, OverlayContent::Hidden);
		}
		self.guides_visible = false;
	}

	/// Removes both surfaces from the scene.
	pub fn detach(&mut self, scene: &mut dyn SceneInterface) {
		for overlay in [self.brush.take(), self.snap_guides.take()].into_iter().flatten() {
			scene.overlay_remove(overlay);
		}
		self.brush_visible = false;
		self.guides_visible = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::messages::tool::common_functionality::snapping::SnapLineKind;
	use crate::test_utils::MockScene;

	use glam::DVec2;

	#[test]
	fn surfaces_are_created_once_and_detached() {
		let mut scene = MockScene::default();
		let mut overlays = OverlaySurfaces::default();
		let viewport = ViewportId(1);
		let rect = Rect::from_box([DVec2::ZERO, DVec2::splat(10.)]);

		overlays.hide_brush(&mut scene);
		assert!(scene.overlays.is_empty());

		overlays.show_brush(&mut scene, viewport, rect);
		overlays.show_brush(&mut scene, viewport, rect.translate(DVec2::ONE));
		assert_eq!(scene.overlays.len(), 1);
		assert_eq!(scene.overlay(OverlayKind::Brush), Some(&OverlayContent::Brush { rect: rect.translate(DVec2::ONE) }));

		overlays.hide_brush(&mut scene);
		assert_eq!(scene.overlay(OverlayKind::Brush), Some(&OverlayContent::Hidden));

		overlays.detach(&mut scene);
		assert!(scene.overlays.is_empty());
	}

	#[test]
	fn empty_snap_lines_hide_the_guides() {
		let mut scene = MockScene::default();
		let mut overlays = OverlaySurfaces::default();
		let line = SnapLine {
			kind: SnapLineKind::Point,
			points: vec![DVec2::ZERO, DVec2::new(0., 100.)],
			direction: None,
		};

		overlays.show_snap_lines(&mut scene, ViewportId(1), vec![line.clone()], SnapLineStyle::default());
		assert_eq!(
			scene.overlay(OverlayKind::SnapGuides),
			Some(&OverlayContent::SnapGuides {
				lines: vec![line],
				style: SnapLineStyle::default(),
			})
		);

		overlays.show_snap_lines(&mut scene, ViewportId(1), Vec::new(), SnapLineStyle::default());
		assert_eq!(scene.overlay(OverlayKind::SnapGuides), Some(&OverlayContent::Hidden));
	}
}
