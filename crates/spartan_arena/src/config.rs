//! Arena configuration loaded from TOML.
//!
//! ```toml
//! human_side = "spartan"
//! think_delay_ms = 500
//! request_timeout_secs = 15
//!
//! [opponent]
//! kind = "llm"
//! llm_provider = "gemini"
//! llm_model = "gemini-2.5-flash"
//!
//! [[objectives]]
//! id = 1
//! description = "Win 1 Game as Spartan"
//! target = 1
//! required_side = "spartan"
//! required_outcome = "win"
//! ```

use crate::llm_client::{LlmClient, LlmConfig, LlmProvider};
use crate::provider::{FirstEmptyProvider, LlmMoveProvider, MinimaxProvider, MoveProvider};
use crate::runtime::RuntimeSettings;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use spartan_tictactoe::{Objective, ObjectiveTracker, Outcome, Side, daily_orders};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Which move provider plays the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// Hosted language model.
    Llm,
    /// Local perfect play.
    Minimax,
    /// Local first free cell.
    FirstEmpty,
}

/// Opponent settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct OpponentConfig {
    /// Provider kind.
    #[serde(default = "default_kind")]
    kind: OpponentKind,

    /// LLM vendor (when `kind = "llm"`).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for the move reply.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Endpoint root override.
    #[serde(default)]
    llm_base_url: Option<String>,
}

fn default_kind() -> OpponentKind {
    OpponentKind::Llm
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    16
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_base_url: None,
        }
    }
}

/// Top-level arena configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// The human's side.
    #[serde(default = "default_human_side")]
    human_side: Side,

    /// Pacing delay before the opponent is asked, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Upper bound on one opponent request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Opponent settings.
    #[serde(default)]
    opponent: OpponentConfig,

    /// Daily orders issued at session start.
    #[serde(default = "daily_orders")]
    objectives: Vec<Objective>,
}

fn default_human_side() -> Side {
    Side::Spartan
}

fn default_think_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            human_side: default_human_side(),
            think_delay_ms: default_think_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            opponent: OpponentConfig::default(),
            objectives: daily_orders(),
        }
    }
}

impl ArenaConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            human_side = %config.human_side,
            opponent = ?config.opponent.kind,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides the human's side.
    pub fn with_human_side(mut self, side: Side) -> Self {
        self.human_side = side;
        self
    }

    /// Overrides the opponent kind.
    pub fn with_opponent_kind(mut self, kind: OpponentKind) -> Self {
        self.opponent.kind = kind;
        self
    }

    /// Checks the daily orders for definitions that can never behave.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for objective in &self.objectives {
            let id = *objective.id();
            if !seen.insert(id) {
                return Err(ConfigError::new(format!("Duplicate objective id {id}")));
            }
            if *objective.target() == 0 {
                return Err(ConfigError::new(format!("Objective {id} has target 0")));
            }
            if objective.progress() > objective.target() {
                return Err(ConfigError::new(format!(
                    "Objective {id} starts above its target"
                )));
            }
            if objective.required_side().is_some()
                && *objective.required_outcome() != Some(Outcome::Win)
            {
                return Err(ConfigError::new(format!(
                    "Objective {id} requires a side but not a win"
                )));
            }
        }
        Ok(())
    }

    /// Fresh tracker for the configured orders.
    pub fn tracker(&self) -> ObjectiveTracker {
        ObjectiveTracker::new(self.objectives.clone())
    }

    /// Opponent timing.
    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings::new(
            Duration::from_millis(self.think_delay_ms),
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    /// Creates LLM configuration, reading the vendor's API key from the
    /// environment.
    #[instrument(skip(self), fields(provider = ?self.opponent.llm_provider, model = %self.opponent.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        let provider = self.opponent.llm_provider;
        let var = provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{var} environment variable not set")))?;

        let config = LlmConfig::new(
            provider,
            api_key,
            self.opponent.llm_model.clone(),
            self.opponent.llm_max_tokens,
        );
        Ok(match &self.opponent.llm_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        })
    }

    /// Builds the configured move provider.
    #[instrument(skip(self), fields(kind = ?self.opponent.kind))]
    pub fn build_provider(&self) -> Result<Arc<dyn MoveProvider>, ConfigError> {
        let provider: Arc<dyn MoveProvider> = match self.opponent.kind {
            OpponentKind::Llm => Arc::new(LlmMoveProvider::new(LlmClient::new(
                self.create_llm_config()?,
            ))),
            OpponentKind::Minimax => Arc::new(MinimaxProvider),
            OpponentKind::FirstEmpty => Arc::new(FirstEmptyProvider),
        };
        info!(provider = provider.name(), "Move provider ready");
        Ok(provider)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
