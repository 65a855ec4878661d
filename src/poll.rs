use crate::device::{Capture, ReadStatus, VDev};
use crate::motion::{BiAx, Motion};
use crate::shutdown::Shutdown;
use crate::touch::{decoder::Decoder, Registry};
use std::{
    thread::sleep,
    time::{Duration, Instant},
};

/// Drives the read → integrate → emit cycle.
pub struct Poller<C, V> {
    capture: C,
    vdev: V,
    registry: Registry,
    decoder: Decoder,
    motion: Motion,
    interval: Option<Duration>,
}

impl<C: Capture, V: VDev> Poller<C, V> {
    /// With `interval` unset the loop spins and relies on measured time alone.
    pub fn new(capture: C, vdev: V, motion: Motion, interval: Option<Duration>) -> Self {
        Self {
            capture,
            vdev,
            registry: Registry::new(),
            decoder: Decoder::new(),
            motion,
            interval,
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode everything the capture source has pending. Returns the number of samples applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.capture.next_event() {
                ReadStatus::Sample(sample) => {
                    self.decoder.feed(&mut self.registry, sample);
                    applied += 1;
                }
                ReadStatus::Resync => {
                    // releases may have been lost with the dropped block
                    if !self.registry.is_empty() {
                        log::debug!(
                            "capture resync at slot {}, forgetting {} contacts",
                            self.decoder.current_slot(),
                            self.registry.len()
                        );
                    }
                    self.registry.clear();
                }
                ReadStatus::Empty => break,
                ReadStatus::Error(e) => {
                    log::warn!("read error: {e}");
                    break;
                }
            }
        }
        applied
    }

    /// One cycle with `delta` seconds since the previous one.
    pub fn tick(&mut self, delta: f64) -> BiAx<i32> {
        self.drain();
        let step = self.motion.process(&self.registry, delta);
        if !step.is_zero() {
            log::trace!("move {:?}, carry {:?}", step, self.motion.accumulated());
            if let Err(e) = self.vdev.update(step.x, step.y) {
                log::warn!("failed to inject motion: {e:#}");
            }
        }
        step
    }

    /// Loop until `shutdown` is requested.
    pub fn run(&mut self, shutdown: &Shutdown) {
        // nothing has elapsed before the first tick
        let mut delta = 0.;
        let mut last = Instant::now();
        while !shutdown.is_requested() {
            self.tick(delta);
            if let Some(interval) = self.interval {
                sleep(interval);
            }
            let now = Instant::now();
            delta = now.duration_since(last).as_secs_f64();
            last = now;
        }
        log::info!("shutting down");
    }
}
