pub mod fs;
pub mod installer;
pub mod prompt;
pub mod registry;
pub mod runtime;
pub mod setup;

pub use registry::EnvironmentRegistry;
pub use runtime::{PluginEnvironment, RuntimeEnvironment};
pub use setup::{SetupContext, setup};
