//! Application State
//!
//! Loaded configuration plus per-invocation overrides, and the factory for
//! the services built from it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::analysis::{AnalysisClient, AnalysisClientConfig, AnalysisOrchestrator};
use crate::storage::ConfigService;
use crate::utils::error::{AppError, AppResult};

/// Application state for one CLI invocation
#[derive(Debug)]
pub struct AppState {
    /// Configuration service for app settings
    config: ConfigService,
    /// Backend URL given on the command line, wins over the config file
    backend_override: Option<String>,
}

impl AppState {
    /// Load configuration from `config_path`, or the default location
    pub fn initialize(config_path: Option<PathBuf>) -> AppResult<Self> {
        let config = match config_path {
            Some(path) => ConfigService::open(path)?,
            None => ConfigService::new()?,
        };
        Ok(Self {
            config,
            backend_override: None,
        })
    }

    /// Use `url` instead of the configured backend for this invocation
    pub fn with_backend_override(mut self, url: impl Into<String>) -> AppResult<Self> {
        let url = url.into();
        let mut candidate = self.config.get_config_clone();
        candidate.backend_url = url.clone();
        candidate.validate().map_err(AppError::validation)?;
        self.backend_override = Some(url);
        Ok(self)
    }

    pub fn config_service(&self) -> &ConfigService {
        &self.config
    }

    /// Persist a partial settings update and return the stored config
    pub fn update_settings(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        self.config.update_config(update)
    }

    /// Overwrite the config file with defaults
    pub fn reset_settings(&mut self) -> AppResult<AppConfig> {
        self.config.reset()?;
        Ok(self.config.get_config_clone())
    }

    /// Configuration with overrides applied
    pub fn effective_config(&self) -> AppConfig {
        let mut config = self.config.get_config_clone();
        if let Some(url) = &self.backend_override {
            config.backend_url = url.clone();
        }
        config
    }

    /// HTTP client for the effective backend
    pub fn analysis_client(&self) -> AppResult<AnalysisClient> {
        let config = AnalysisClientConfig::from(&self.effective_config());
        Ok(AnalysisClient::with_config(config)?)
    }

    /// Orchestrator driving the HTTP client
    pub fn orchestrator(&self) -> AppResult<AnalysisOrchestrator> {
        Ok(AnalysisOrchestrator::new(Arc::new(self.analysis_client()?)))
    }
}
