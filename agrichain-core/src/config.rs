//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{AgriError, AgriResult};
use crate::policy::{SimulatedFaults, SimulatedLatency};

/// Configuration for the data-layer engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Database file path. None = in-memory store.
    pub db_path: Option<PathBuf>,
    /// Artificial latency settings.
    pub latency: LatencyConfig,
    /// Transient-fault injection settings.
    pub faults: FaultConfig,
}

/// Per-class artificial delay ranges, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Disable to run with zero delay (tests, production ports).
    pub enabled: bool,
    pub read_ms: (u64, u64),
    pub write_ms: (u64, u64),
    pub aggregate_ms: (u64, u64),
}

impl Default for LatencyConfig {
    fn default() -> Self {
        let sim = SimulatedLatency::default();
        Self {
            enabled: true,
            read_ms: sim.read_ms,
            write_ms: sim.write_ms,
            aggregate_ms: sim.aggregate_ms,
        }
    }
}

/// Transient-failure injection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Disable to never inject failures.
    pub enabled: bool,
    /// Independent per-call failure probability.
    pub probability: f64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probability: SimulatedFaults::default().probability,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> AgriResult<Self> {
        toml::from_str(text).map_err(|e| AgriError::Config(e.to_string()))
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> AgriResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AgriError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Config with latency and faults disabled (tests, production ports).
    pub fn quiet() -> Self {
        Self {
            db_path: None,
            latency: LatencyConfig {
                enabled: false,
                ..LatencyConfig::default()
            },
            faults: FaultConfig {
                enabled: false,
                ..FaultConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_conditions() {
        let cfg = EngineConfig::default();
        assert!(cfg.db_path.is_none());
        assert!(cfg.latency.enabled);
        assert_eq!(cfg.latency.read_ms, (100, 300));
        assert_eq!(cfg.latency.write_ms, (400, 1200));
        assert_eq!(cfg.latency.aggregate_ms, (800, 1400));
        assert!((cfg.faults.probability - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [faults]
            probability = 0.25
            "#,
        )
        .unwrap();
        assert!((cfg.faults.probability - 0.25).abs() < f64::EPSILON);
        assert_eq!(cfg.latency.read_ms, (100, 300));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("latency = ").unwrap_err();
        assert!(matches!(err, AgriError::Config(_)));
    }
}
