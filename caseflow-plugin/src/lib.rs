pub mod api;
pub mod config;
pub mod error;
pub mod payload;
pub mod plugin;
pub mod registry;
pub mod runner;
pub mod schema;

// Re-export commonly used types
pub use api::{ApiPlugin, ApiPluginParams, SkipRule};
pub use config::{ApiPluginEnv, HttpConfig};
pub use error::{PluginError, Result};
pub use payload::resolve_payload_properties;
pub use plugin::Plugin;
pub use registry::PluginRegistry;
pub use runner::{Debouncer, PluginRunner, PluginRunnerSet, ResultSink, TimerHandle};
pub use schema::SchemaValidator;
