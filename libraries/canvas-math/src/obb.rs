use crate::quad::Quad;
use crate::rect::Rect;
use crate::GEOMETRY_EPSILON;
use glam::{DAffine2, DVec2};

/// An oriented bounding box.
///
/// The box spans `[0, width] x [0, height]` in its own local frame. That frame is placed on the canvas by
/// translating to `(x, y)`, rotating by `rotation` (radians) and applying the sign-only scale `(scale_x, scale_y)`,
/// which records whether the box has been flipped along either local axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub rotation: f64,
	pub scale_x: f64,
	pub scale_y: f64,
}

impl Default for Obb {
	fn default() -> Self {
		Self {
			x: 0.,
			y: 0.,
			width: 0.,
			height: 0.,
			rotation: 0.,
			scale_x: 1.,
			scale_y: 1.,
		}
	}
}

impl Obb {
	pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
			rotation,
			..Default::default()
		}
	}

	/// An unrotated box covering the rect.
	pub fn from_rect(rect: Rect) -> Self {
		let min = rect.min();
		let size = rect.size();
		Self::new(min.x, min.y, size.x, size.y, 0.)
	}

	pub fn position(&self) -> DVec2 {
		DVec2::new(self.x, self.y)
	}

	pub fn size(&self) -> DVec2 {
		DVec2::new(self.width, self.height)
	}

	pub fn scale(&self) -> DVec2 {
		DVec2::new(self.scale_x, self.scale_y)
	}

	/// Maps the local frame of the box (where it spans `[0, width] x [0, height]`) onto the canvas.
	pub fn mask_transform(&self) -> DAffine2 {
		DAffine2::from_scale_angle_translation(self.scale(), self.rotation, self.position())
	}

	/// Maps a `base x base` square onto the box.
	///
	/// Deltas between two boxes are derived from these transforms. Normalizing by a large base keeps the scale
	/// factors well away from the unit box, where tiny boxes would otherwise lose precision.
	pub fn transform(&self, base: f64) -> DAffine2 {
		DAffine2::from_scale_angle_translation(self.scale() * self.size() / base, self.rotation, self.position())
	}

	/// The box in its own local frame.
	pub fn local_bounds(&self) -> Rect {
		Rect::from_box([DVec2::ZERO, self.size()])
	}

	pub fn quad(&self) -> Quad {
		self.mask_transform() * self.local_bounds()
	}

	pub fn center(&self) -> DVec2 {
		self.mask_transform().transform_point2(self.size() / 2.)
	}

	/// The axis aligned bounds of the box on the canvas.
	pub fn bounding_box(&self) -> Rect {
		self.quad().bounding_box()
	}

	#[must_use]
	pub fn translate(&self, offset: DVec2) -> Self {
		Self {
			x: self.x + offset.x,
			y: self.y + offset.y,
			..*self
		}
	}

	/// Rotates the box by `angle` radians about its own center.
	#[must_use]
	pub fn rotate_about_center(&self, angle: f64) -> Self {
		let center = self.center();
		let position = center + DVec2::from_angle(angle).rotate(self.position() - center);
		Self {
			x: position.x,
			y: position.y,
			rotation: self.rotation + angle,
			..*self
		}
	}

	/// The diagonal length of the box.
	pub fn hypotenuse(&self) -> f64 {
		self.width.hypot(self.height)
	}

	/// The `(cos, sin)` of the angle the diagonal makes with the width, which encodes the aspect ratio.
	///
	/// A degenerate box with no diagonal falls back to `(1, 0)`.
	pub fn aspect_cos_sin(&self) -> (f64, f64) {
		let hypotenuse = self.hypotenuse();
		if hypotenuse < GEOMETRY_EPSILON {
			return (1., 0.);
		}
		((self.width / hypotenuse).abs(), (self.height / hypotenuse).abs())
	}

	pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
		[
			(self.x, other.x),
			(self.y, other.y),
			(self.width, other.width),
			(self.height, other.height),
			(self.rotation, other.rotation),
			(self.scale_x, other.scale_x),
			(self.scale_y, other.scale_y),
		]
		.into_iter()
		.all(|(a, b)| (a - b).abs() <= max_abs_diff)
	}
}
