// SELECT TOOL
/// Viewport pixels the pointer must travel from pointer-down before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.;
/// Viewport pixels the pointer must travel from pointer-down on empty canvas before the marquee appears.
pub const BRUSH_THRESHOLD: f64 = 10.;
pub const ROTATE_SNAP_ANGLE: f64 = 15.;
pub const NUDGE_AMOUNT: f64 = 1.;
pub const BIG_NUDGE_AMOUNT: f64 = 10.;
/// Parent chains deeper than this are treated as malformed when resolving a hit to its top level node.
pub const MAX_NESTING_DEPTH: usize = 256;

// TRANSFORM CAGE
pub const BOUNDS_SELECT_THRESHOLD: f64 = 10.;
pub const BOUNDS_ROTATE_THRESHOLD: f64 = 20.;

// TRANSFORM SOLVER
/// Side length of the square that box transforms are normalized against when deriving the delta between two boxes.
pub const OBB_TRANSFORM_BASE: f64 = 1000.;
/// A resize is skipped when both sides of the new box fall below this extent.
pub const MIN_OBB_EXTENT: f64 = 0.01;
pub const MIN_NODE_SIZE: f64 = 0.01;
/// Below this, the aspect ratio of a box is treated as degenerate.
pub const ASPECT_EPSILON: f64 = 1e-10;

// SNAPPING
pub const SNAP_POINT_TOLERANCE: f64 = 5.;
/// These are sibling nodes whose bounding boxes are used for alignment.
pub const MAX_ALIGNMENT_CANDIDATES: usize = 100;
/// Gap distances closer together than this are treated as equal when chaining distribution matches.
pub const DISTRIBUTION_EQUALITY_TOLERANCE: f64 = 5e-5;

// OVERLAYS
pub const SNAP_LINE_WIDTH: f64 = 1.;
pub const HIGHLIGHT_WIDTH: f64 = 1.;
