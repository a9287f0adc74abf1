use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::generate::Platform;
use crate::transcript::DEFAULT_LANGUAGE;
use crate::ContentError;

/// Environment variable holding the generation API key
pub const API_KEY_ENV: &str = "AI_API_KEY";

/// Environment variable overriding the generation API base URL
pub const BASE_URL_ENV: &str = "AI_BASE_URL";

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "AI_MODEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text-generation service settings
    pub generation: GenerationConfig,

    /// Transcript retrieval settings
    pub transcript: TranscriptConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API key, only ever taken from the environment
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Output token budget per post
    pub max_output_tokens: u32,

    /// Which endpoint family to call
    pub api_style: ApiStyle,
}

/// OpenAI-compatible endpoint family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStyle {
    /// `POST /responses`
    Responses,
    /// `POST /chat/completions`
    ChatCompletions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Caption languages in priority order
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Platforms used when none are selected on the command line
    pub default_platforms: Vec<Platform>,

    /// Default output format
    pub default_output_format: OutputFormat,

    /// Generate all platforms concurrently instead of one after another
    pub parallel_platforms: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_output_tokens: 2500,
            api_style: ApiStyle::Responses,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: vec![DEFAULT_LANGUAGE.to_string()],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_platforms: vec![Platform::LinkedIn],
            default_output_format: OutputFormat::Text,
            parallel_platforms: false,
        }
    }
}

impl GenerationConfig {
    /// API key, or the error explaining how to provide one
    pub fn require_api_key(&self) -> Result<&str, ContentError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ContentError::MissingApiKey {
                env_var: API_KEY_ENV.to_string(),
            })
    }
}

impl Config {
    /// Load configuration from file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file without applying overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-social").join("config.yaml"))
    }

    /// Apply environment-style overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.generation.api_key = Some(key);
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            self.generation.base_url = base_url;
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.generation.model = model;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        crate::utils::validate_and_normalize_url(&self.generation.base_url)
            .context("Invalid generation base URL")?;

        if self.generation.model.trim().is_empty() {
            anyhow::bail!("Generation model must be configured");
        }

        if self.generation.max_output_tokens == 0 {
            anyhow::bail!("max_output_tokens must be greater than zero");
        }

        if self.transcript.languages.is_empty() {
            anyhow::bail!("At least one transcript language must be configured");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  API Base URL: {}", self.generation.base_url);
        println!("  Model: {}", self.generation.model);
        println!("  API Style: {:?}", self.generation.api_style);
        println!("  Max Output Tokens: {}", self.generation.max_output_tokens);
        println!(
            "  API Key: {}",
            if self.generation.require_api_key().is_ok() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  Transcript Languages: {}", self.transcript.languages.join(", "));
        let platforms: Vec<&str> = self
            .app
            .default_platforms
            .iter()
            .map(|p| p.label())
            .collect();
        println!("  Default Platforms: {}", platforms.join(", "));
        println!("  Default Format: {}", self.app.default_output_format);
        println!("  Parallel Platforms: {}", self.app.parallel_platforms);
    }
}
