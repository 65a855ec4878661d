#[cfg(feature = "cli")]
pub mod cli;

use crate::device::touchpad::Config as ConfigTouchpad;
use crate::device::Config as ConfigDevice;
use crate::motion::BiAx;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[cfg(feature = "cli")]
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[cfg(feature = "cli")]
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPadMouse {
    pub touchpad: ConfigTouchpad,
    pub device: ConfigDevice,
    pub user: ConfigUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUser {
    pub sensitivity_x: f64,
    pub sensitivity_y: f64,
    /// [-] threshold on each component of the normalized direction
    pub deadzone: f64,
    /// [ms] sleep between ticks, 0 to run on measured time only
    pub poll_interval_ms: u64,
    /// [s] upper bound on the time step fed to the integrator
    pub max_delta: f64,
}

impl Default for ConfigUser {
    fn default() -> Self {
        Self {
            sensitivity_x: 0.08,
            sensitivity_y: 0.08,
            deadzone: 0.1,
            // ~60 Hz
            poll_interval_ms: 16,
            max_delta: 0.1,
        }
    }
}

impl ConfigUser {
    pub fn sensitivity(&self) -> BiAx<f64> {
        BiAx {
            x: self.sensitivity_x,
            y: self.sensitivity_y,
        }
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        match self.poll_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl ConfigPadMouse {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let u = &self.user;
        for (field, v) in [("sensitivity_x", u.sensitivity_x), ("sensitivity_y", u.sensitivity_y)] {
            if !v.is_finite() || v < 0. {
                return Err(invalid(field, format!("{v} is not a finite, non-negative gain")));
            }
        }
        if !(0. ..1.).contains(&u.deadzone) {
            return Err(invalid("deadzone", format!("{} is outside [0, 1)", u.deadzone)));
        }
        if !u.max_delta.is_finite() || u.max_delta <= 0. {
            return Err(invalid("max_delta", format!("{} is not a positive time step", u.max_delta)));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
