use crate::touch::decoder::Sample;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io;

pub mod touchpad;
pub mod vmouse;

/// Pointer injection.
pub trait VDev {
    fn update(&mut self, x: i32, y: i32) -> Result<()>;
}

/// Outcome of one read from a capture source.
#[derive(Debug)]
pub enum ReadStatus {
    Sample(Sample),
    /// events were dropped by the kernel and the device state is being rebuilt
    Resync,
    /// nothing pending right now
    Empty,
    Error(io::Error),
}

/// Source of decoded multitouch samples. Must not block.
pub trait Capture {
    fn next_event(&mut self) -> ReadStatus;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// name of the virtual mouse
    pub name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::from("padmouse"),
        }
    }
}
