mod config;
mod publisher;

pub use config::{init_default_config, CliOverrides, PublishConfig};
pub use publisher::Publisher;
