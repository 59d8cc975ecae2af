//! The inputs, scene capability, preferences and tools the select core is built from.

pub mod input;
pub mod preferences;
pub mod scene;
pub mod tool;
