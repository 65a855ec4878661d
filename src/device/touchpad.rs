use super::{Capture, ReadStatus};
use crate::touch::decoder::Sample;
use evdev::{
    raw_stream::RawDevice, AbsoluteAxisType, InputEvent, InputEventKind, Synchronization,
};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    io,
    os::fd::AsRawFd,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(
        "permission denied opening {}; run as root or add the user to the `input` group",
        .path.display()
    )]
    PermissionDenied { path: PathBuf, source: io::Error },
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("{} is not a multitouch device", .path.display())]
    NotMultitouch { path: PathBuf },
    #[error("no multitouch device found under /dev/input")]
    NotFound,
    #[error("failed to make {} non-blocking: {source}", .path.display())]
    NonBlocking { path: PathBuf, source: nix::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// evdev node; discovered when unset
    pub device: Option<PathBuf>,
}

/// Reads the kernel event stream as-is. The synced `evdev::Device` reader
/// swallows `SYN_DROPPED` and keeps no per-slot state, so dropped blocks are
/// surfaced here instead.
pub struct Touchpad {
    device: RawDevice,
    path: PathBuf,
    framer: Framer,
    pending: VecDeque<ReadStatus>,
}

impl Touchpad {
    pub fn new(cfg: &Config) -> Result<Self, StartupError> {
        let (path, device) = match &cfg.device {
            Some(path) => (path.clone(), open(path)?),
            None => discover()?,
        };
        if !is_multitouch(&device) {
            return Err(StartupError::NotMultitouch { path });
        }
        set_nonblocking(&device)
            .map_err(|source| StartupError::NonBlocking { path: path.clone(), source })?;
        Ok(Self {
            device,
            path,
            framer: Framer::default(),
            pending: VecDeque::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.device.name().unwrap_or("unknown")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Capture for Touchpad {
    fn next_event(&mut self) -> ReadStatus {
        if self.pending.is_empty() {
            let framer = &mut self.framer;
            match self.device.fetch_events() {
                Ok(events) => self.pending.extend(events.filter_map(|ev| framer.push(&ev))),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return ReadStatus::Empty,
                Err(e) => return ReadStatus::Error(e),
            }
        }
        self.pending.pop_front().unwrap_or(ReadStatus::Empty)
    }
}

/// Turns raw events into read statuses. After `SYN_DROPPED` the rest of the
/// block up to and including the next `SYN_REPORT` is incomplete and skipped.
#[derive(Debug, Default)]
struct Framer {
    dropping: bool,
}

impl Framer {
    fn push(&mut self, ev: &InputEvent) -> Option<ReadStatus> {
        match ev.kind() {
            InputEventKind::Synchronization(Synchronization::SYN_DROPPED) => {
                self.dropping = true;
                Some(ReadStatus::Resync)
            }
            InputEventKind::Synchronization(Synchronization::SYN_REPORT) if self.dropping => {
                self.dropping = false;
                None
            }
            _ if self.dropping => None,
            _ => Some(ReadStatus::Sample(Sample::from(ev))),
        }
    }
}

fn open(path: &Path) -> Result<RawDevice, StartupError> {
    RawDevice::open(path).map_err(|source| {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => StartupError::PermissionDenied { path, source },
            _ => StartupError::Open { path, source },
        }
    })
}

/// First evdev node that speaks the multitouch slot protocol.
fn discover() -> Result<(PathBuf, RawDevice), StartupError> {
    let entries = std::fs::read_dir("/dev/input").map_err(|_| StartupError::NotFound)?;
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |s| s.starts_with("event"))
        })
        .filter_map(|p| RawDevice::open(&p).ok().map(|dev| (p, dev)))
        .find(|(_, dev)| is_multitouch(dev))
        .ok_or(StartupError::NotFound)
}

fn is_multitouch(device: &RawDevice) -> bool {
    device.supported_absolute_axes().map_or(false, |axes| {
        axes.contains(AbsoluteAxisType::ABS_MT_SLOT)
            && axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X)
            && axes.contains(AbsoluteAxisType::ABS_MT_POSITION_Y)
    })
}

fn set_nonblocking(device: &RawDevice) -> nix::Result<()> {
    let fd = device.as_raw_fd();
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}
