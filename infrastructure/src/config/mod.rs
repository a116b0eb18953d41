//! Configuration file loading for termagent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. CLI flags (applied by the binary)
//! 2. `AGENT_*` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./termagent.toml` or `./.termagent.toml`
//! 5. Global: `$XDG_CONFIG_HOME/termagent/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{AgentConfig, ConfigValidationError};
pub use loader::{ConfigLoader, ConfigSource};
