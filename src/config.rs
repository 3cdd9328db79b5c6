//! Config directory management and the `config.toml` application config.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use teledash_cli::ChartFormat;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub file_loading: FileLoadingConfig,
    pub analysis: AnalysisConfig,
    pub export: ExportFileConfig,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            file_loading: FileLoadingConfig::default(),
            analysis: AnalysisConfig::default(),
            export: ExportFileConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLoadingConfig {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target column whose distribution is compared
    pub target: String,
    /// Column the numeric range criterion applies to
    pub age_column: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target: "y".to_string(),
            age_column: "age".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFileConfig {
    pub raw_filename: String,
    pub delimiter: String,
    pub include_header: bool,
}

impl Default for ExportFileConfig {
    fn default() -> Self {
        Self {
            raw_filename: crate::export::RAW_EXPORT_FILENAME.to_string(),
            delimiter: ",".to_string(),
            include_header: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 420,
            format: "png".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config.toml from the config directory; a missing file yields
    /// the defaults.
    pub fn load(manager: &ConfigManager) -> Result<Self> {
        let path = manager.config_path("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| eyre!("invalid config {}: {}", path.display(), e))
    }

    /// Export delimiter as a byte; falls back to comma on an empty setting.
    pub fn export_delimiter(&self) -> u8 {
        self.export.delimiter.bytes().next().unwrap_or(b',')
    }

    /// Configured chart format; unknown values fall back to PNG.
    pub fn chart_format(&self) -> ChartFormat {
        match self.chart.format.to_lowercase().as_str() {
            "eps" => ChartFormat::Eps,
            _ => ChartFormat::Png,
        }
    }
}

/// Default configuration template written by `--init-config`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# teledash configuration
version = "1"

[file_loading]
# Field separator byte for CSV input. Defaults to 59 (';').
# delimiter = 59
# has_header = true
# Excel worksheet, by name or 0-based index.
# sheet = "0"

[analysis]
# Target column whose distribution is compared before and after filtering.
target = "y"
# Column the inclusive age range applies to.
age_column = "age"

[export]
raw_filename = "bank_raw.csv"
delimiter = ","
include_header = true

[chart]
width = 900
height = 420
# png or eps
format = "png"
"#;
