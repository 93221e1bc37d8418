pub mod discovery;
pub mod manifest;

pub use manifest::{BoundPlugin, PluginDescriptor, PluginId};
