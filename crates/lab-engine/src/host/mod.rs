pub mod binder;
pub mod driver;
pub mod overlay;
pub mod prefs;
pub mod registry;
