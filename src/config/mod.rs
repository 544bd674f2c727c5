//! API descriptions loaded from TOML or JSON, and the targets built from them.
mod loader;
mod target;
mod template;
pub mod types;


pub use loader::{DEFAULT_CONFIG_FILES, load_config};
pub use target::ConfigTarget;

#[cfg(test)]
pub(crate) use loader::load_config_file;
