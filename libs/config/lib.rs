mod config;
mod load_config;

pub use config::{ApiConfig, Config, StoreConfig};
pub use load_config::{default_config_path, load, load_or_default};
