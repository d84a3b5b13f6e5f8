//! Configuration loading for the rate engine service.
//!
//! This module loads the YAML service configuration: where the rate chart
//! lives, which address the HTTP server binds to, and the default log filter.
//!
//! # Example
//!
//! ```no_run
//! use milk_rate_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/rate-engine.yaml").unwrap();
//! println!("Serving on {}", config.bind_address());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_BIND_ADDRESS, DEFAULT_LOG_FILTER, GridConfig, LoggingConfig, ServerConfig,
    ServiceConfig,
};
