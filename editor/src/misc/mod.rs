pub mod error;

pub use error::EditorError;
