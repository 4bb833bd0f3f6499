//! Configuration system
//!
//! TOML-backed configuration with defaults embedded in the schema definitions.

mod macros;
mod schemas;
mod utils;

pub use schemas::{Config, DatabaseConfig, ImportConfig, ValidationConfig, WebserverConfig};
pub use utils::{
    get_config_clone, load_config_from_path, parse_config, with_config, write_config, CONFIG,
};
