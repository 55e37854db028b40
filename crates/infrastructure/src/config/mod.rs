pub mod loader;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource, LoadedConfig};
pub use validator::ConfigValidator;
