use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Order in which one step's pending authoritative reports are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOrder {
    /// Process reports in the order they arrived. An older report arriving after
    /// a newer one rewinds again to the older tick; the replay ends on the same
    /// tick either way, so the jitter is visible but self-correcting.
    #[default]
    Arrival,
    /// Stable-sort the pending batch by tick id before processing.
    SortById,
}

/// Client-side prediction settings.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Simulation steps per second.
    pub tick_rate: u32,
    /// Slots in each ring buffer. Bounds the round trip the client can absorb
    /// before history is overwritten.
    pub buffer_capacity: usize,
    /// Squared planar distance tolerated before a report triggers a rewind.
    pub reconciliation_epsilon: f32,
    /// Apply fresh input to the live entity immediately.
    pub predict_locally: bool,
    /// Send the unacknowledged input window every step.
    pub send_inputs: bool,
    /// Drain and reconcile authoritative reports every step.
    pub reconcile: bool,
    /// Most simulation steps one `advance` call may run.
    pub max_steps_per_advance: u32,
    pub report_order: ReportOrder,
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Camera yaw speed in degrees per second.
    pub rotation_speed: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            buffer_capacity: 128,
            reconciliation_epsilon: 0.004,
            predict_locally: true,
            send_inputs: true,
            reconcile: true,
            max_steps_per_advance: 8,
            report_order: ReportOrder::Arrival,
            move_speed: 8.0,
            rotation_speed: 180.0,
            attack_cooldown: 0.1,
        }
    }
}

impl ClientConfig {
    /// Load a config from a `.yaml`/`.yml` or `.json` file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate",
                reason: "must be at least 1 Hz",
            });
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "buffer_capacity",
                reason: "must hold at least one slot",
            });
        }
        if self.max_steps_per_advance == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps_per_advance",
                reason: "must allow at least one step",
            });
        }
        let non_negative = [
            ("reconciliation_epsilon", self.reconciliation_epsilon),
            ("move_speed", self.move_speed),
            ("rotation_speed", self.rotation_speed),
            ("attack_cooldown", self.attack_cooldown),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and non-negative",
                });
            }
        }
        Ok(())
    }

    pub fn units_per_tick(&self) -> f32 {
        self.move_speed / self.tick_rate as f32
    }

    pub fn degrees_per_tick(&self) -> f32 {
        self.rotation_speed / self.tick_rate as f32
    }
}
