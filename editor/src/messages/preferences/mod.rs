pub mod select_preferences;

pub use select_preferences::SelectPreferences;
