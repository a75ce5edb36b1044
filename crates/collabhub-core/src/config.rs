//! Configuration for collabhub runs.
//!
//! The on-disk file (`collabhub.toml`) maps to [`CollabConfig`]. Every field
//! has a default, so an empty or missing file is valid. A single run is
//! parameterized by an [`AnalysisConfig`], derived from the file config with
//! [`CollabConfig::analysis`] for either the batch or the service path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "collabhub.toml";

pub const DEFAULT_CENTER_AUTHOR: &str = "Sizun Jiang";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Invalid(_) => ErrorCode::ConfigInvalid,
        }
    }
}

/// Which caller drives the pipeline. The presets differ in fetch cap and
/// inter-fetch delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One-shot command over a full id list.
    Batch,
    /// Interactive web request; bounded work per request.
    Service,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollabConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub eigenvector: EigenvectorConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_center_author")]
    pub center_author: String,
    #[serde(default = "default_hub_count")]
    pub hub_count: usize,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            center_author: default_center_author(),
            hub_count: default_hub_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Contact address sent as `mailto` (OpenAlex "polite pool").
    #[serde(default)]
    pub mailto: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    #[serde(default = "default_service_delay_ms")]
    pub service_delay_ms: u64,
    /// `None` means the batch path processes every id.
    #[serde(default)]
    pub batch_max_works: Option<usize>,
    #[serde(default = "default_service_max_works")]
    pub service_max_works: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            mailto: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            batch_delay_ms: default_batch_delay_ms(),
            service_delay_ms: default_service_delay_ms(),
            batch_max_works: None,
            service_max_works: default_service_max_works(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Spring layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_layout_seed")]
    pub seed: u64,
    /// Optimal distance between nodes (`k` in Fruchterman–Reingold).
    #[serde(default = "default_layout_spacing")]
    pub spacing: f64,
    #[serde(default = "default_layout_iterations")]
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: default_layout_seed(),
            spacing: default_layout_spacing(),
            iterations: default_layout_iterations(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    #[serde(default = "default_eigen_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_eigen_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: default_eigen_max_iter(),
            tolerance: default_eigen_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_image_width")]
    pub width: u32,
    #[serde(default = "default_image_height")]
    pub height: u32,
    /// TTF/OTF font used for hub labels. Labels are drawn without text when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_image_width(),
            height: default_image_height(),
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            upload_dir: default_upload_dir(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl ServerConfig {
    /// Return the lowercased extension of `filename` if it is accepted.
    #[must_use]
    pub fn accepted_extension(&self, filename: &str) -> Option<String> {
        let (_, ext) = filename.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            .then_some(ext)
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub center_author: String,
    pub hub_count: usize,
    pub max_works: Option<usize>,
    pub fetch_delay: Duration,
    pub layout: LayoutConfig,
    pub eigenvector: EigenvectorConfig,
    pub render: RenderConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::batch()
    }
}

impl AnalysisConfig {
    /// Defaults for the one-shot command: every id, 1 s between fetches.
    #[must_use]
    pub fn batch() -> Self {
        CollabConfig::default().analysis(RunMode::Batch)
    }

    /// Defaults for web requests: at most 100 ids, 100 ms between fetches.
    #[must_use]
    pub fn service() -> Self {
        CollabConfig::default().analysis(RunMode::Service)
    }

    /// Reject values that would make the pipeline meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub_count == 0 {
            return Err(ConfigError::Invalid("hub_count must be at least 1".into()));
        }
        if !(self.layout.spacing.is_finite() && self.layout.spacing > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "layout.spacing must be positive, got {}",
                self.layout.spacing
            )));
        }
        if !(self.eigenvector.tolerance.is_finite() && self.eigenvector.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "eigenvector.tolerance must be positive, got {}",
                self.eigenvector.tolerance
            )));
        }
        if self.render.width < 64 || self.render.height < 64 {
            return Err(ConfigError::Invalid(format!(
                "render size must be at least 64x64, got {}x{}",
                self.render.width, self.render.height
            )));
        }
        Ok(())
    }
}

impl CollabConfig {
    /// Build the per-run configuration for the given caller.
    #[must_use]
    pub fn analysis(&self, mode: RunMode) -> AnalysisConfig {
        let (max_works, delay_ms) = match mode {
            RunMode::Batch => (self.fetch.batch_max_works, self.fetch.batch_delay_ms),
            RunMode::Service => (
                Some(self.fetch.service_max_works),
                self.fetch.service_delay_ms,
            ),
        };

        AnalysisConfig {
            center_author: self.analysis.center_author.clone(),
            hub_count: self.analysis.hub_count,
            max_works,
            fetch_delay: Duration::from_millis(delay_ms),
            layout: self.layout,
            eigenvector: self.eigenvector,
            render: self.render.clone(),
        }
    }
}

/// Load configuration from `explicit`, else `<cwd>/collabhub.toml`, else defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if an
/// explicitly named file is missing.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<CollabConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(CollabConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    parse_config(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Parse a TOML document into a [`CollabConfig`].
///
/// # Errors
///
/// Returns the TOML deserialization error.
pub fn parse_config(content: &str) -> Result<CollabConfig, toml::de::Error> {
    toml::from_str::<CollabConfig>(content)
}

fn default_center_author() -> String {
    DEFAULT_CENTER_AUTHOR.to_string()
}

const fn default_hub_count() -> usize {
    20
}

fn default_api_base() -> String {
    "https://api.openalex.org".to_string()
}

fn default_user_agent() -> String {
    concat!("collabhub/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_batch_delay_ms() -> u64 {
    1000
}

const fn default_service_delay_ms() -> u64 {
    100
}

const fn default_service_max_works() -> usize {
    100
}

const fn default_layout_seed() -> u64 {
    42
}

const fn default_layout_spacing() -> f64 {
    0.5
}

const fn default_layout_iterations() -> usize {
    50
}

const fn default_eigen_max_iter() -> usize {
    1000
}

const fn default_eigen_tolerance() -> f64 {
    1e-6
}

const fn default_image_width() -> u32 {
    2000
}

const fn default_image_height() -> u32 {
    1800
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["csv".to_string(), "txt".to_string()]
}
