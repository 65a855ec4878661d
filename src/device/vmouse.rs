use super::VDev;
use anyhow::{Context, Result};
use evdev::{
    self,
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, RelativeAxisType,
};
use std::path::PathBuf;

pub struct VMouse {
    device: VirtualDevice,
}

impl VMouse {
    pub fn new(name: &str) -> Result<Self> {
        let device = VirtualDeviceBuilder::new()
            .context("failed to open /dev/uinput")?
            .name(name)
            .with_relative_axes(&AttributeSet::from_iter([
                RelativeAxisType::REL_X,
                RelativeAxisType::REL_Y,
                RelativeAxisType::REL_WHEEL, // convinces libinput it's a mouse
            ]))?
            .build()
            .context("failed to create virtual mouse")?;
        Ok(Self { device })
    }

    /// Device nodes the kernel created for the virtual mouse.
    pub fn dev_nodes(&mut self) -> Result<Vec<PathBuf>> {
        let mut nodes = Vec::new();
        for path in self.device.enumerate_dev_nodes_blocking()? {
            nodes.push(path?);
        }
        Ok(nodes)
    }
}

impl VDev for VMouse {
    fn update(&mut self, x: i32, y: i32) -> Result<()> {
        Ok(self.device.emit(&[
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, x),
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, y),
        ])?)
    }
}
