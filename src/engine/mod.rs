mod config;
mod engine;
mod errors;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineBuilder, Outcome};
pub use errors::Error;
