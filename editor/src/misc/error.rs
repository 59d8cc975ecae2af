use crate::messages::scene::utility_types::{NodeId, ViewportId};

use thiserror::Error;

/// The error type used by the select core.
///
/// Only violations of the scene state reach the caller. Degenerate geometry and the other documented edge cases are
/// skipped silently and never produce an error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EditorError {
	#[error("The selection references node {0:?}, which does not exist in the scene")]
	MissingNode(NodeId),

	#[error("Viewport {0:?} has no camera")]
	MissingViewport(ViewportId),

	#[error("Invalid select preferences:\n{0}")]
	InvalidPreferences(String),

	#[error("{0}")]
	Misc(String),
}

macro_rules! derive_from {
	($type:ty, $kind:ident) => {
		impl From<$type> for EditorError {
			fn from(error: $type) -> Self {
				EditorError::$kind(format!("{error}"))
			}
		}
	};
}

derive_from!(&str, Misc);
derive_from!(String, Misc);
derive_from!(serde_json::Error, InvalidPreferences);
