//! Geometry shared by the canvas select engine: axis aligned rects, quads, oriented bounding boxes and affine decomposition.

pub mod decompose;
pub mod obb;
pub mod quad;
pub mod rect;

pub use decompose::{Decomposed, decompose_near, normalize_angle};
pub use obb::Obb;
pub use quad::Quad;
pub use rect::Rect;

/// Below this magnitude, lengths, ratios and determinants are treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-10;
