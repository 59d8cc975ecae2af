use crate::quad::Quad;
use glam::{DAffine2, DVec2};

#[derive(Debug, Clone, Default, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// An axis aligned rect defined by two vertices.
pub struct Rect(pub [DVec2; 2]);

impl Rect {
	/// Create a zero sized rect at the point
	#[must_use]
	pub fn from_point(point: DVec2) -> Self {
		Self([point; 2])
	}

	/// Convert a box defined by two corner points to a rect with ordered corners.
	#[must_use]
	pub fn from_box(bbox: [DVec2; 2]) -> Self {
		Self([bbox[0].min(bbox[1]), bbox[0].max(bbox[1])])
	}

	/// Create a rect from the center and offset (distance from center to middle of an edge)
	#[must_use]
	pub fn from_square(center: DVec2, offset: f64) -> Self {
		Self::from_box([center - offset, center + offset])
	}

	/// Create a rect from its top left corner and size.
	#[must_use]
	pub fn from_position_size(position: DVec2, size: DVec2) -> Self {
		Self::from_box([position, position + size])
	}

	/// Create an AABB from an iter of points, returning None if empty.
	#[must_use]
	pub fn point_iter(points: impl Iterator<Item = DVec2>) -> Option<Self> {
		let mut bounds = None;
		for point in points {
			let bounds = bounds.get_or_insert(Self::from_point(point));
			bounds[0] = bounds[0].min(point);
			bounds[1] = bounds[1].max(point);
		}
		bounds
	}

	/// Gets the center of a rect
	#[must_use]
	pub fn center(&self) -> DVec2 {
		self.0.iter().sum::<DVec2>() / 2.
	}

	#[must_use]
	pub fn size(&self) -> DVec2 {
		self.max() - self.min()
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.size().x
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.size().y
	}

	/// Take the outside bounds of two axis aligned rectangles, which are defined by two corner points.
	#[must_use]
	pub fn combine_bounds(a: Self, b: Self) -> Self {
		Self::from_box([a.min().min(b.min()), a.max().max(b.max())])
	}

	/// Checks if two rects intersect (touching edges count)
	#[must_use]
	pub fn intersects(&self, other: Self) -> bool {
		let [mina, maxa] = [self.min(), self.max()];
		let [minb, maxb] = [other.min(), other.max()];
		mina.x <= maxb.x && minb.x <= maxa.x && mina.y <= maxb.y && minb.y <= maxa.y
	}

	/// Does this rect contain a point (strictly inside)
	#[must_use]
	pub fn contains(&self, p: DVec2) -> bool {
		let [min, max] = [self.min(), self.max()];
		(min.x < p.x && p.x < max.x) && (min.y < p.y && p.y < max.y)
	}

	/// Does this rect contain a point, including its edges
	#[must_use]
	pub fn contains_inclusive(&self, p: DVec2) -> bool {
		let [min, max] = [self.min(), self.max()];
		(min.x <= p.x && p.x <= max.x) && (min.y <= p.y && p.y <= max.y)
	}

	#[must_use]
	pub fn min(&self) -> DVec2 {
		self.0[0].min(self.0[1])
	}

	#[must_use]
	pub fn max(&self) -> DVec2 {
		self.0[0].max(self.0[1])
	}

	#[must_use]
	pub fn translate(&self, offset: DVec2) -> Self {
		Self([self.0[0] + offset, self.0[1] + offset])
	}
}

impl std::ops::Mul<Rect> for DAffine2 {
	type Output = Quad;

	fn mul(self, rhs: Rect) -> Self::Output {
		self * Quad::from_box(rhs.0)
	}
}

impl std::ops::Index<usize> for Rect {
	type Output = DVec2;
	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}
impl std::ops::IndexMut<usize> for Rect {
	fn index_mut(&mut self, index: usize) -> &mut Self::Output {
		&mut self.0[index]
	}
}

impl From<Rect> for Quad {
	fn from(val: Rect) -> Self {
		Quad::from_box(val.0)
	}
}
