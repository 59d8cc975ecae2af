pub mod scene_interface;
pub mod utility_types;

pub use scene_interface::SceneInterface;
