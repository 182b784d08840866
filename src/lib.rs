pub mod actions;
pub mod app;
pub mod inspector;
pub mod loader;
pub mod notifier;
pub mod registry;
pub mod render;
pub mod search;
pub mod store;
