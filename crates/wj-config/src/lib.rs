//! Configuration management for webjson.
//!
//! Parses optional `webjson.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The file only
//! controls site layout conventions; the source and output directories come
//! from the command line via [`CliSettings`].
//!
//! ```toml
//! [layout]
//! templates_dir = "_templates"
//! includes_dir = "_includes"
//! excluded_prefix = "_"
//!
//! [pages]
//! data_extension = "json"
//! output_extension = "html"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Source directory to build from.
    pub source_dir: Option<PathBuf>,
    /// Output directory to build into.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "webjson.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source tree layout conventions.
    pub layout: LayoutConfig,
    /// Page descriptor and output file conventions.
    pub pages: PagesConfig,

    /// Source directory (set from CLI settings).
    #[serde(skip)]
    pub source_dir: PathBuf,
    /// Output directory (set from CLI settings).
    #[serde(skip)]
    pub output_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Source tree layout configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Directory under the source root holding templates.
    pub templates_dir: String,
    /// Directory under the source root holding includes.
    pub includes_dir: String,
    /// Subdirectories whose name starts with this prefix are not traversed.
    pub excluded_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            templates_dir: "_templates".to_owned(),
            includes_dir: "_includes".to_owned(),
            excluded_prefix: "_".to_owned(),
        }
    }
}

/// Page file configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Extension (without dot) marking a page descriptor.
    pub data_extension: String,
    /// Extension (without dot) of rendered pages, templates and includes.
    pub output_extension: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            data_extension: "json".to_owned(),
            output_extension: "html".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a field to be a single path component (no separators, no dots-only).
fn require_plain_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a plain name without path separators"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `webjson.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir.clone_from(output_dir);
        }
    }

    /// Directory holding templates (`<source>/<templates_dir>`).
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.source_dir.join(&self.layout.templates_dir)
    }

    /// Directory holding includes (`<source>/<includes_dir>`).
    #[must_use]
    pub fn includes_dir(&self) -> PathBuf {
        self.source_dir.join(&self.layout.includes_dir)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_layout()?;
        self.validate_pages()?;
        Ok(())
    }

    /// Validate layout configuration.
    fn validate_layout(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        require_non_empty(&layout.excluded_prefix, "layout.excluded_prefix")?;
        require_plain_name(&layout.templates_dir, "layout.templates_dir")?;
        require_plain_name(&layout.includes_dir, "layout.includes_dir")?;

        // Template and include directories must never be mirrored to output
        for (name, field) in [
            (&layout.templates_dir, "layout.templates_dir"),
            (&layout.includes_dir, "layout.includes_dir"),
        ] {
            if !name.starts_with(layout.excluded_prefix.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "{field} must start with layout.excluded_prefix ({:?})",
                    layout.excluded_prefix
                )));
            }
        }

        Ok(())
    }

    /// Validate pages configuration.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        for (value, field) in [
            (&self.pages.data_extension, "pages.data_extension"),
            (&self.pages.output_extension, "pages.output_extension"),
        ] {
            require_plain_name(value, field)?;
            if value.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "{field} must not start with a dot"
                )));
            }
        }

        if self.pages.data_extension == self.pages.output_extension {
            return Err(ConfigError::Validation(
                "pages.data_extension and pages.output_extension must differ".to_owned(),
            ));
        }

        Ok(())
    }
}
