use super::{Axis, Registry};
use evdev::{AbsoluteAxisType, InputEvent, InputEventKind};

/// Protocol channel of a multitouch sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Code {
    Slot,
    TrackingId,
    PositionX,
    PositionY,
    Pressure,
    Other(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub code: Code,
    pub value: i32,
}

impl Sample {
    pub fn new(code: Code, value: i32) -> Self {
        Self { code, value }
    }
}

impl From<&InputEvent> for Sample {
    fn from(ev: &InputEvent) -> Self {
        let code = match ev.kind() {
            InputEventKind::AbsAxis(axis) => match axis {
                AbsoluteAxisType::ABS_MT_SLOT => Code::Slot,
                AbsoluteAxisType::ABS_MT_TRACKING_ID => Code::TrackingId,
                AbsoluteAxisType::ABS_MT_POSITION_X => Code::PositionX,
                AbsoluteAxisType::ABS_MT_POSITION_Y => Code::PositionY,
                AbsoluteAxisType::ABS_MT_PRESSURE | AbsoluteAxisType::ABS_PRESSURE => {
                    Code::Pressure
                }
                _ => Code::Other(ev.code()),
            },
            _ => Code::Other(ev.code()),
        };
        Self::new(code, ev.value())
    }
}

/// Apply one sample to `registry`, returning the slot that later samples address.
pub fn decode(registry: &mut Registry, current_slot: i32, sample: Sample) -> i32 {
    let Sample { code, value } = sample;
    let axis = match code {
        Code::Slot => return value,
        Code::TrackingId => {
            if value == -1 {
                registry.remove(current_slot);
            } else if let Some(stale) = registry.insert(current_slot, value) {
                log::debug!(
                    "slot {} reassigned: tracking id {} -> {}",
                    current_slot,
                    stale.tracking_id,
                    value
                );
            }
            return current_slot;
        }
        Code::PositionX => Some(Axis::X),
        Code::PositionY => Some(Axis::Y),
        Code::Pressure => None,
        Code::Other(_) => return current_slot,
    };
    match registry.get_mut(current_slot) {
        Some(tp) => match axis {
            Some(axis) => tp.set_position(axis, value),
            None => tp.pressure = Some(value),
        },
        None => log::trace!("dropping {:?} for inactive slot {}", sample, current_slot),
    }
    current_slot
}

/// Holds the currently selected slot between samples.
#[derive(Debug, Default)]
pub struct Decoder {
    current_slot: i32,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_slot(&self) -> i32 {
        self.current_slot
    }

    pub fn feed(&mut self, registry: &mut Registry, sample: Sample) {
        self.current_slot = decode(registry, self.current_slot, sample);
    }
}
