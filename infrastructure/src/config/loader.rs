//! Configuration file loader with multi-source merging

use super::file_config::AgentConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for environment overrides (`AGENT_MODEL` → `model`)
pub const ENV_PREFIX: &str = "AGENT_";

const PROJECT_FILES: [&str; 2] = ["termagent.toml", ".termagent.toml"];

/// One place configuration may come from, for `--show-config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AGENT_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./termagent.toml` or `./.termagent.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/termagent/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<AgentConfig, Box<figment::Error>> {
        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();
        Self::layered(global.as_deref(), project.as_deref(), config_path)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)
    }

    /// Defaults plus environment, no files (for --no-config)
    pub fn load_without_files() -> Result<AgentConfig, Box<figment::Error>> {
        Self::layered(None, None, None)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> AgentConfig {
        AgentConfig::default()
    }

    /// Defaults overlaid with whichever files are given, lowest first.
    fn layered(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        [global, project, explicit].into_iter().flatten().fold(
            Figment::new().merge(Serialized::defaults(AgentConfig::default())),
            |figment, path| {
                debug!("Merging config file {}", path.display());
                figment.merge(Toml::file(path))
            },
        )
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/termagent/config.toml` (platform equivalent elsewhere)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("termagent").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Every source in priority order, highest first.
    pub fn sources(config_path: Option<&Path>, no_config: bool) -> Vec<ConfigSource> {
        let mut sources = vec![ConfigSource {
            label: "Env",
            location: format!("{}* variables", ENV_PREFIX),
            found: std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX)),
        }];

        if !no_config {
            if let Some(path) = config_path {
                sources.push(ConfigSource {
                    label: "Explicit",
                    location: path.display().to_string(),
                    found: path.exists(),
                });
            }
            sources.push(match Self::project_config_path() {
                Some(path) => ConfigSource {
                    label: "Project",
                    location: path.display().to_string(),
                    found: true,
                },
                None => ConfigSource {
                    label: "Project",
                    location: "./termagent.toml or ./.termagent.toml".to_string(),
                    found: false,
                },
            });
            if let Some(path) = Self::global_config_path() {
                sources.push(ConfigSource {
                    label: "Global",
                    location: path.display().to_string(),
                    found: path.exists(),
                });
            }
        }

        sources.push(ConfigSource {
            label: "Default",
            location: "built-in defaults".to_string(),
            found: true,
        });
        sources
    }
}
