pub mod select_tool;
