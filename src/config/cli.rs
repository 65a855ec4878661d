#![allow(clippy::upper_case_acronyms)]
use crate::config::*;
use clap::{Args, Parser};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[group(required = false)]
struct Touchpad {
    /// touchpad evdev node [default: first multitouch device]
    #[arg(short = 'd', long, value_name = "PATH")]
    device: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = false)]
struct Device {
    /// virtual mouse name [default: padmouse]
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct User {
    /// [-] horizontal motion gain [default: 0.08]
    #[arg(short = 'x', long)]
    sensitivity_x: Option<f64>,
    /// [-] vertical motion gain [default: 0.08]
    #[arg(short = 'y', long)]
    sensitivity_y: Option<f64>,
    /// [-] direction component below which an axis stays still [default: 0.1]
    #[arg(short = 'z', long)]
    deadzone: Option<f64>,
    /// [ms] sleep between ticks, 0 for none [default: 16]
    #[arg(short = 'i', long, value_name = "MS")]
    poll_interval: Option<u64>,
    /// [s] largest time step fed to the integrator [default: 0.1]
    #[arg(short = 'm', long, value_name = "SECONDS")]
    max_delta: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CLI {
    /// JSON config file; flags override its values
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    touchpad: Touchpad,
    #[command(flatten)]
    device: Device,
    #[command(flatten)]
    user: User,
}

impl ConfigPadMouse {
    /// Load a JSON config; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_cli() -> Result<Self, ConfigError> {
        Self::from_args(CLI::parse())
    }

    fn from_args(args: CLI) -> Result<Self, ConfigError> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(device) = args.touchpad.device {
            cfg.touchpad.device = Some(device);
        }
        if let Some(name) = args.device.name {
            cfg.device.name = name;
        }
        let user = args.user;
        let u = &mut cfg.user;
        u.sensitivity_x = user.sensitivity_x.unwrap_or(u.sensitivity_x);
        u.sensitivity_y = user.sensitivity_y.unwrap_or(u.sensitivity_y);
        u.deadzone = user.deadzone.unwrap_or(u.deadzone);
        u.poll_interval_ms = user.poll_interval.unwrap_or(u.poll_interval_ms);
        u.max_delta = user.max_delta.unwrap_or(u.max_delta);
        cfg.validate()?;
        Ok(cfg)
    }
}
