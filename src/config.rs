// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration, loaded from an optional JSON file.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interpreter::{RuleInterpreter, DEFAULT_MATCH_THRESHOLD};
use crate::llm::{HttpLlmClient, LlmConfig, LlmDecider};
use crate::model::{Position, DEFAULT_INSERT_POSITION, DEFAULT_INSERT_SPACING};
use crate::orchestrator::{DecisionFn, OrchestratorConfig, DEFAULT_MAX_TURNS};
use crate::tracker::{TrackerSettings, DEFAULT_DIRECTION_OFFSET, DEFAULT_RELATIVE_OFFSET};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Every field is optional in the file; missing ones take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    pub max_turns: usize,
    pub voice_ack_enabled: bool,
    pub direction_offset: f64,
    pub relative_offset: f64,
    pub insert_spacing: f64,
    pub default_position: Position,
    /// Fuzzy-match threshold used by the rule interpreter when resolving node phrases.
    pub match_threshold: f64,
    /// Language-model backend; the rule interpreter decides when this is absent.
    pub llm: Option<LlmConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            voice_ack_enabled: false,
            direction_offset: DEFAULT_DIRECTION_OFFSET,
            relative_offset: DEFAULT_RELATIVE_OFFSET,
            insert_spacing: DEFAULT_INSERT_SPACING,
            default_position: DEFAULT_INSERT_POSITION,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            llm: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid("maxTurns must be > 0".to_owned()));
        }
        for (name, value) in [
            ("directionOffset", self.direction_offset),
            ("relativeOffset", self.relative_offset),
            ("insertSpacing", self.insert_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a finite, non-negative number")));
            }
        }
        if !self.default_position.is_finite() {
            return Err(ConfigError::Invalid("defaultPosition must be finite".to_owned()));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(ConfigError::Invalid("matchThreshold must be within 0..=1".to_owned()));
        }
        if let Some(llm) = &self.llm {
            if !(llm.endpoint.starts_with("http://") || llm.endpoint.starts_with("https://")) {
                return Err(ConfigError::Invalid("llm.endpoint must be an http(s) URL".to_owned()));
            }
            if llm.model.trim().is_empty() {
                return Err(ConfigError::Invalid("llm.model must not be empty".to_owned()));
            }
            if !(0.0..=2.0).contains(&llm.temperature) {
                return Err(ConfigError::Invalid("llm.temperature must be within 0..=2".to_owned()));
            }
            if llm.timeout_secs == 0 {
                return Err(ConfigError::Invalid("llm.timeoutSecs must be > 0".to_owned()));
            }
        }
        Ok(())
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            direction_offset: self.direction_offset,
            relative_offset: self.relative_offset,
            insert_spacing: self.insert_spacing,
            default_position: self.default_position,
            voice_ack_enabled: self.voice_ack_enabled,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig { max_turns: self.max_turns, tracker: self.tracker_settings() }
    }

    pub fn interpreter(&self) -> RuleInterpreter {
        RuleInterpreter::new()
            .with_relative_offset(self.relative_offset)
            .with_match_threshold(self.match_threshold)
    }

    /// Decision backend for command sessions: the configured language model, or the rule
    /// interpreter. Fails when the model's API key variable is named but unset.
    pub fn decider(&self) -> Result<Arc<dyn DecisionFn>, ConfigError> {
        let Some(llm) = &self.llm else {
            return Ok(Arc::new(self.interpreter()));
        };
        let api_key = match &llm.api_key_env {
            Some(name) => Some(std::env::var(name).map_err(|_| {
                ConfigError::Invalid(format!("llm.apiKeyEnv: environment variable {name} is not set"))
            })?),
            None => None,
        };
        let client = HttpLlmClient::new(llm, api_key)
            .map_err(|err| ConfigError::Invalid(format!("llm client: {err}")))?;
        tracing::info!(model = %llm.model, endpoint = %llm.endpoint, "using language-model decisions");
        Ok(Arc::new(LlmDecider::new(client, llm.clone())))
    }
}
