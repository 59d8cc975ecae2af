pub mod common_functionality;
pub mod tool_messages;
pub mod utility_types;
