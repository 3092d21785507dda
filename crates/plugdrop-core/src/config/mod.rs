//! Tool configuration (`plugdrop.toml`).
//!
//! Holds the catalog location, the settings store location, and the
//! target profile naming the application being provisioned.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config, parse_config_str, to_toml};
pub use schema::{CatalogConfig, PlugdropConfig, StoreBackend, StoreConfig, TargetProfile};
pub use store::ConfigStore;
