pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, save_config, LoadedConfig};
pub use schema::{RedisConfig, SyncConfig, ValueBinding, DEFAULT_CONFIG_FILE};
