pub mod brush_selection;
pub mod hit_test;
pub mod overlays;
pub mod snapping;
pub mod transform_solver;
pub mod transformation_cage;
