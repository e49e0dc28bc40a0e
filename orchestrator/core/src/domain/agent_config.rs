// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Agent Configuration Types
//
// Defines the configuration manifest for a Sentio agent:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Memory and learning tunables (owned by the cortex crate)
// - Reasoning, uncertainty and decision thresholds and weights
// - Background history pruning
// - Logging and event bus settings

use anyhow::{bail, Context};
use sentio_cortex::domain::{LearningConfig, MemoryConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "sentio.dev/v1";
pub const KIND: &str = "AgentConfig";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SENTIO_CONFIG_PATH";

/// Top-level Kubernetes-style agent configuration manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigManifest {
    /// API version (must be "sentio.dev/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "AgentConfig")
    pub kind: String,

    /// Agent metadata (name, labels, version)
    pub metadata: ManifestMetadata,

    /// Agent configuration specification
    #[serde(default)]
    pub spec: AgentConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable agent name
    pub name: String,

    /// Optional: Configuration version for tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Optional: Labels for categorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Agent configuration specification (content under spec:)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigSpec {
    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub reasoning: ReasoningConfig,

    #[serde(default)]
    pub uncertainty: UncertaintyConfig,

    #[serde(default)]
    pub decision: DecisionConfig,

    #[serde(default)]
    pub learning: LearningConfig,

    #[serde(default)]
    pub pruner: PrunerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Weights of the context relevance score. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceWeights {
    #[serde(default = "default_history_weight")]
    pub history: f64,
    #[serde(default = "default_preferences_weight")]
    pub preferences: f64,
    #[serde(default = "default_health_weight")]
    pub healthy_system: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            history: default_history_weight(),
            preferences: default_preferences_weight(),
            healthy_system: default_health_weight(),
        }
    }
}

/// Weights of the validation confidence. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWeights {
    #[serde(default = "default_valid_weight")]
    pub valid: f64,
    #[serde(default = "default_check_weight")]
    pub constraints: f64,
    #[serde(default = "default_check_weight")]
    pub risks: f64,
    #[serde(default = "default_check_weight")]
    pub resources: f64,
}

impl Default for ValidationWeights {
    fn default() -> Self {
        Self {
            valid: default_valid_weight(),
            constraints: default_check_weight(),
            risks: default_check_weight(),
            resources: default_check_weight(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Understanding confidence below this asks the user to clarify
    #[serde(default = "default_confidence_threshold")]
    pub understanding_threshold: f64,

    /// Hypothesis confidence at or above this is valid and low-risk
    #[serde(default = "default_confidence_threshold")]
    pub validation_threshold: f64,

    /// Confidence multiplier for the history-based alternative hypothesis
    #[serde(default = "default_alternative_discount")]
    pub alternative_discount: f64,

    /// Confidence multiplier for the fallback plan
    #[serde(default = "default_fallback_discount")]
    pub fallback_discount: f64,

    #[serde(default = "default_clarification_success")]
    pub clarification_success: f64,

    #[serde(default = "default_fallback_success")]
    pub fallback_success: f64,

    /// Subtracted from estimated success per identified risk
    #[serde(default = "default_risk_penalty")]
    pub risk_penalty: f64,

    /// Resource fraction at or above which the host is unhealthy
    #[serde(default = "default_health_limit")]
    pub health_limit: f64,

    /// Resource fraction at or above which execution resources are short
    #[serde(default = "default_resource_limit")]
    pub resource_limit: f64,

    #[serde(default)]
    pub relevance_weights: RelevanceWeights,

    #[serde(default)]
    pub validation_weights: ValidationWeights,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            understanding_threshold: default_confidence_threshold(),
            validation_threshold: default_confidence_threshold(),
            alternative_discount: default_alternative_discount(),
            fallback_discount: default_fallback_discount(),
            clarification_success: default_clarification_success(),
            fallback_success: default_fallback_success(),
            risk_penalty: default_risk_penalty(),
            health_limit: default_health_limit(),
            resource_limit: default_resource_limit(),
            relevance_weights: RelevanceWeights::default(),
            validation_weights: ValidationWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    #[serde(default = "default_model_weight")]
    pub model_weight: f64,
    #[serde(default = "default_data_weight")]
    pub data_weight: f64,
    #[serde(default = "default_context_weight")]
    pub context_weight: f64,

    /// Share of evidence strength in data certainty (the rest is validation confidence)
    #[serde(default = "default_evidence_strength_weight")]
    pub evidence_strength_weight: f64,

    /// Share of context relevance in context certainty (the rest is recency)
    #[serde(default = "default_context_relevance_weight")]
    pub context_relevance_weight: f64,

    /// Age at which relevant history stops counting as recent
    #[serde(default = "default_recency_horizon_hours")]
    pub recency_horizon_hours: f64,

    /// Per-source level above which mitigations are proposed
    #[serde(default = "default_max_uncertainty")]
    pub mitigation_threshold: f64,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            model_weight: default_model_weight(),
            data_weight: default_data_weight(),
            context_weight: default_context_weight(),
            evidence_strength_weight: default_evidence_strength_weight(),
            context_relevance_weight: default_context_relevance_weight(),
            recency_horizon_hours: default_recency_horizon_hours(),
            mitigation_threshold: default_max_uncertainty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Total uncertainty above which alternatives are offered and
    /// mitigations applied
    #[serde(default = "default_max_uncertainty")]
    pub max_uncertainty: f64,

    #[serde(default = "default_alternative_discount")]
    pub historical_discount: f64,

    #[serde(default = "default_safe_discount")]
    pub safe_discount: f64,

    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    #[serde(default = "default_retries")]
    pub default_retries: u32,

    /// Timeout multiplier applied by conservative parameters
    #[serde(default = "default_timeout_factor")]
    pub conservative_timeout_factor: u64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_uncertainty: default_max_uncertainty(),
            historical_discount: default_alternative_discount(),
            safe_discount: default_safe_discount(),
            default_timeout_ms: default_timeout_ms(),
            default_retries: default_retries(),
            conservative_timeout_factor: default_timeout_factor(),
        }
    }
}

/// Configuration for the background history pruner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrunerConfig {
    /// Whether pruning is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How often to run the pruner (in seconds)
    #[serde(default = "default_pruner_interval")]
    pub interval_seconds: u64,
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_pruner_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Events buffered per subscriber before the oldest are dropped
    #[serde(default = "default_event_capacity")]
    pub event_bus_capacity: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            event_bus_capacity: default_event_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_confidence_threshold() -> f64 {
    0.8
}

fn default_alternative_discount() -> f64 {
    0.8
}

fn default_fallback_discount() -> f64 {
    0.7
}

fn default_clarification_success() -> f64 {
    0.5
}

fn default_fallback_success() -> f64 {
    0.7
}

fn default_risk_penalty() -> f64 {
    0.1
}

fn default_health_limit() -> f64 {
    0.9
}

fn default_resource_limit() -> f64 {
    0.8
}

fn default_history_weight() -> f64 {
    0.4
}

fn default_preferences_weight() -> f64 {
    0.3
}

fn default_health_weight() -> f64 {
    0.3
}

fn default_valid_weight() -> f64 {
    0.4
}

fn default_check_weight() -> f64 {
    0.2
}

fn default_model_weight() -> f64 {
    0.4
}

fn default_data_weight() -> f64 {
    0.3
}

fn default_context_weight() -> f64 {
    0.3
}

fn default_evidence_strength_weight() -> f64 {
    0.6
}

fn default_context_relevance_weight() -> f64 {
    0.7
}

fn default_recency_horizon_hours() -> f64 {
    24.0
}

fn default_max_uncertainty() -> f64 {
    0.3
}

fn default_safe_discount() -> f64 {
    0.9
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retries() -> u32 {
    1
}

fn default_timeout_factor() -> u64 {
    2
}

fn default_pruner_interval() -> u64 {
    3600
}

fn default_event_capacity() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for AgentConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "sentio-agent".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: AgentConfigSpec::default(),
        }
    }
}

impl AgentConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SENTIO_CONFIG_PATH environment variable
    /// 2. ./sentio-config.yaml (working directory)
    /// 3. ~/.sentio/config.yaml (user home)
    /// 4. /etc/sentio/config.yaml (system, Unix) or C:\ProgramData\Sentio\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./sentio-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sentio").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/sentio/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\Sentio\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path: fail if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    /// This allows container deployments to override thresholds via env vars
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let spec = &mut self.spec;
        override_f64(&lookup, "SENTIO_RELEVANCE_THRESHOLD", &mut spec.memory.relevance_threshold);
        override_f64(&lookup, "SENTIO_CONFIDENCE_THRESHOLD", &mut spec.reasoning.understanding_threshold);
        override_f64(&lookup, "SENTIO_VALIDATION_THRESHOLD", &mut spec.reasoning.validation_threshold);
        override_f64(&lookup, "SENTIO_MAX_UNCERTAINTY", &mut spec.decision.max_uncertainty);
        override_f64(&lookup, "SENTIO_DRIFT_THRESHOLD", &mut spec.learning.drift_threshold);

        if let Some(val) = lookup("SENTIO_PRUNER_ENABLED") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => {
                    tracing::info!("Environment override: SENTIO_PRUNER_ENABLED=true");
                    spec.pruner.enabled = true;
                }
                "false" | "0" | "no" | "off" => {
                    tracing::info!("Environment override: SENTIO_PRUNER_ENABLED=false");
                    spec.pruner.enabled = false;
                }
                _ => {
                    tracing::warn!(
                        "Invalid value for SENTIO_PRUNER_ENABLED: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Some(val) = lookup("SENTIO_LOG_FORMAT") {
            tracing::info!("Environment override: SENTIO_LOG_FORMAT={}", val);
            spec.observability.logging.format = val;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            bail!("metadata.name cannot be empty");
        }

        let spec = &self.spec;
        spec.memory.validate()?;
        spec.learning.validate()?;

        let reasoning = &spec.reasoning;
        for (name, value) in [
            ("reasoning.understanding_threshold", reasoning.understanding_threshold),
            ("reasoning.validation_threshold", reasoning.validation_threshold),
            ("reasoning.alternative_discount", reasoning.alternative_discount),
            ("reasoning.fallback_discount", reasoning.fallback_discount),
            ("reasoning.health_limit", reasoning.health_limit),
            ("reasoning.resource_limit", reasoning.resource_limit),
            ("decision.max_uncertainty", spec.decision.max_uncertainty),
            ("decision.historical_discount", spec.decision.historical_discount),
            ("decision.safe_discount", spec.decision.safe_discount),
            ("uncertainty.mitigation_threshold", spec.uncertainty.mitigation_threshold),
            ("uncertainty.evidence_strength_weight", spec.uncertainty.evidence_strength_weight),
            ("uncertainty.context_relevance_weight", spec.uncertainty.context_relevance_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1] (got {})", name, value);
            }
        }

        let rw = &reasoning.relevance_weights;
        check_weights(
            "reasoning.relevance_weights",
            &[rw.history, rw.preferences, rw.healthy_system],
        )?;
        let vw = &reasoning.validation_weights;
        check_weights(
            "reasoning.validation_weights",
            &[vw.valid, vw.constraints, vw.risks, vw.resources],
        )?;
        let u = &spec.uncertainty;
        check_weights(
            "uncertainty weights",
            &[u.model_weight, u.data_weight, u.context_weight],
        )?;

        if u.recency_horizon_hours <= 0.0 {
            bail!("uncertainty.recency_horizon_hours must be positive");
        }

        if spec.decision.conservative_timeout_factor == 0 {
            bail!("decision.conservative_timeout_factor must be at least 1");
        }

        if spec.pruner.enabled && spec.pruner.interval_seconds == 0 {
            bail!("pruner.interval_seconds must be greater than 0 when the pruner is enabled");
        }

        if spec.observability.event_bus_capacity == 0 {
            bail!("observability.event_bus_capacity must be greater than 0");
        }

        match spec.observability.logging.format.as_str() {
            "json" | "text" => {}
            other => bail!("observability.logging.format must be 'json' or 'text' (got '{}')", other),
        }

        Ok(())
    }
}

fn override_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut f64) {
    if let Some(val) = lookup(key) {
        match val.parse::<f64>() {
            Ok(parsed) => {
                tracing::info!("Environment override: {}={}", key, parsed);
                *target = parsed;
            }
            Err(_) => {
                tracing::warn!("Invalid value for {}: '{}'. Expected a number. Ignoring.", key, val);
            }
        }
    }
}

fn check_weights(name: &str, weights: &[f64]) -> anyhow::Result<()> {
    if weights.iter().any(|w| *w < 0.0) {
        bail!("{} must not be negative", name);
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
        bail!("{} must sum to 1 (got {})", name, sum);
    }
    Ok(())
}
