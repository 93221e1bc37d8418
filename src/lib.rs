//! Keeps plugin runtimes (Python, Node.js, ...) resolved across upgrades,
//! reinstalls and portable/roaming data-root switches.

pub mod environment;
pub mod error;
pub mod migration;
pub mod model;
pub mod plugin;

pub use environment::{EnvironmentRegistry, PluginEnvironment, RuntimeEnvironment, SetupContext};
pub use error::{EnvError, Result};
pub use model::settings::{EnvironmentSettings, RuntimeTag};
