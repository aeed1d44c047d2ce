use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::control::correction::HardLimits;
use crate::error::ConfigError;
use crate::snapshot::SnapshotCell;

// ---------------------------------------------------------------------------
// Live control configuration
// ---------------------------------------------------------------------------

/// Tunables the host may change at runtime. The control core reads one
/// immutable snapshot per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub allow_relaxed_actuators: bool, // non-dedicated actuators may be used
    pub max_pitch_deg: f64,            // hard pitch limit, deg
    pub max_roll_deg: f64,             // hard roll limit, deg
    pub correction_speed: f64,         // cap on the PID output multiplier
    pub min_turn_speed: f64,           // m/s, forward speed needed to yaw
    pub max_yaw_rate: f64,             // yaw command at full stick, full modifier
    pub min_yaw_modifier: f64,
    pub max_yaw_modifier: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            allow_relaxed_actuators: true,
            max_pitch_deg: 15.0,
            max_roll_deg: 7.0,
            correction_speed: 0.15,
            min_turn_speed: 2.0,
            max_yaw_rate: 0.2,
            min_yaw_modifier: 0.2,
            max_yaw_modifier: 1.0,
        }
    }
}

/// Inclusive range a numeric setting must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Limit {
    const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    pub fn check(&self, value: f64) -> Result<(), ConfigError> {
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { name: self.name, value, min: self.min, max: self.max })
        }
    }
}

impl ControlConfig {
    pub const LIMITS: [Limit; 7] = [
        Limit::new("max_pitch_deg", 0.0, 45.0),
        Limit::new("max_roll_deg", 0.0, 45.0),
        Limit::new("correction_speed", 0.01, 0.5),
        Limit::new("min_turn_speed", 1.0, 105.0),
        Limit::new("max_yaw_rate", 0.01, 0.5),
        Limit::new("min_yaw_modifier", 0.01, 1.0),
        Limit::new("max_yaw_modifier", 0.01, 1.0),
    ];

    pub fn limits() -> &'static [Limit] {
        &Self::LIMITS
    }

    fn values(&self) -> [f64; 7] {
        [
            self.max_pitch_deg,
            self.max_roll_deg,
            self.correction_speed,
            self.min_turn_speed,
            self.max_yaw_rate,
            self.min_yaw_modifier,
            self.max_yaw_modifier,
        ]
    }

    /// Check every numeric field against its limit; reports the first miss.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::LIMITS
            .iter()
            .zip(self.values())
            .try_for_each(|(limit, value)| limit.check(value))
    }

    /// Parse a JSON config; missing fields take their defaults. The result
    /// is validated.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn hard_limits(&self) -> HardLimits {
        HardLimits { pitch_deg: self.max_pitch_deg, roll_deg: self.max_roll_deg }
    }
}

// ---------------------------------------------------------------------------
// Shared handle: whole-snapshot replacement
// ---------------------------------------------------------------------------

/// Cloneable handle to the live config. Readers get an `Arc` snapshot that
/// never changes under them; writers swap in a whole new value.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    cell: Arc<SnapshotCell<ControlConfig>>,
}

impl ConfigHandle {
    pub fn new(config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { cell: Arc::new(SnapshotCell::new(config)) })
    }

    pub fn load(&self) -> Arc<ControlConfig> {
        self.cell.load()
    }

    /// Validate and publish. A rejected config leaves the current one live.
    pub fn store(&self, config: ControlConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.cell.store(config);
        Ok(())
    }

    pub fn reset(&self) {
        self.cell.store(ControlConfig::default());
    }
}
