use crate::touch::Registry;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BiAx<T> {
    pub x: T,
    pub y: T,
}

impl<T: Default + PartialEq> BiAx<T> {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Turns the displacement of a single contact from its origin into relative
/// pointer motion, like a joystick: the further from the origin, the faster.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    sensitivity: BiAx<f64>,
    deadzone: f64,
    max_delta: f64,
    acc: BiAx<f64>,
}

impl Motion {
    pub fn new(sensitivity: BiAx<f64>, deadzone: f64, max_delta: f64) -> Self {
        Self {
            sensitivity,
            deadzone,
            max_delta,
            acc: BiAx::default(),
        }
    }

    /// Sub-step motion carried over to the next tick.
    pub fn accumulated(&self) -> BiAx<f64> {
        self.acc
    }

    /// Advance by `delta` seconds and return the whole steps to emit.
    pub fn process(&mut self, registry: &Registry, delta: f64) -> BiAx<i32> {
        let Some(tp) = registry.single() else {
            return BiAx::default();
        };
        let delta = delta.clamp(0., self.max_delta);
        let (vx, vy) = tp.displacement();
        let length = vx.hypot(vy);
        let dir = normalize(vx, vy, length);
        // squared length: precise near the origin, fast far from it
        let gain = length * length * delta;

        if dir.x.abs() > self.deadzone {
            self.acc.x += dir.x * gain * self.sensitivity.x;
        }
        if dir.y.abs() > self.deadzone {
            self.acc.y += dir.y * gain * self.sensitivity.y;
        }
        BiAx {
            x: emit(&mut self.acc.x),
            y: emit(&mut self.acc.y),
        }
    }
}

fn normalize(vx: f64, vy: f64, length: f64) -> BiAx<f64> {
    if length == 0. {
        return BiAx::default();
    }
    let finite = |v: f64| if v.is_nan() { 0. } else { v };
    BiAx {
        x: finite(vx / length),
        y: finite(vy / length),
    }
}

fn emit(acc: &mut f64) -> i32 {
    if acc.abs() < 1. {
        return 0;
    }
    let step = acc.trunc() as i32;
    *acc = 0.;
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::Axis;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-9;

    fn motion() -> Motion {
        Motion::new(BiAx { x: 0.08, y: 0.08 }, 0.1, 0.1)
    }

    fn contact(reg: &mut Registry, slot: i32, origin: (i32, i32), at: (i32, i32)) {
        reg.insert(slot, slot + 100);
        let tp = reg.get_mut(slot).unwrap();
        tp.set_position(Axis::X, origin.0);
        tp.set_position(Axis::Y, origin.1);
        tp.set_position(Axis::X, at.0);
        tp.set_position(Axis::Y, at.1);
    }

    #[test]
    fn small_push_accumulates_without_emitting() {
        let mut reg = Registry::new();
        contact(&mut reg, 3, (100, 100), (110, 100));
        let mut m = motion();
        assert_eq!(m.process(&reg, 0.1), BiAx { x: 0, y: 0 });
        assert!((m.accumulated().x - 0.8).abs() < EPS);
        assert_eq!(m.accumulated().y, 0.);
    }

    #[test]
    fn carried_fraction_emits_on_later_tick() {
        let mut reg = Registry::new();
        contact(&mut reg, 3, (100, 100), (110, 100));
        let mut m = motion();
        m.process(&reg, 0.1);
        assert_eq!(m.process(&reg, 0.1), BiAx { x: 1, y: 0 });
        assert_eq!(m.accumulated(), BiAx { x: 0., y: 0. });
    }

    #[test]
    fn negative_motion_truncates_toward_zero() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (500, 500), (500, 470));
        let mut m = motion();
        // 1 * 900 * 0.05 * 0.08 = 3.6
        assert_eq!(m.process(&reg, 0.05), BiAx { x: 0, y: -3 });
        assert_eq!(m.accumulated().y, 0.);
    }

    #[test]
    fn no_motion_unless_exactly_one_contact() {
        let mut reg = Registry::new();
        let mut m = motion();
        assert_eq!(m.process(&reg, 0.1), BiAx::default());

        contact(&mut reg, 0, (0, 0), (400, 0));
        contact(&mut reg, 1, (0, 0), (0, 400));
        m.acc = BiAx { x: 0.5, y: -0.5 };
        assert_eq!(m.process(&reg, 0.1), BiAx::default());
        assert_eq!(m.accumulated(), BiAx { x: 0.5, y: -0.5 });
    }

    #[test]
    fn contact_at_origin_is_still() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (0, 0), (0, 0));
        let mut m = motion();
        assert_eq!(m.process(&reg, 0.1), BiAx::default());
        assert_eq!(m.accumulated(), BiAx::default());
    }

    #[test]
    fn deadzone_is_exclusive() {
        let mut reg = Registry::new();
        // direction (0.6, 0.8); deadzone equal to |dir.x|
        contact(&mut reg, 0, (0, 0), (6, 8));
        let mut m = Motion::new(BiAx { x: 0.08, y: 0.08 }, 0.6, 1.);
        m.process(&reg, 0.01);
        assert_eq!(m.accumulated().x, 0.);
        // 0.8 * 100 * 0.01 * 0.08
        assert!((m.accumulated().y - 0.064).abs() < EPS);
    }

    #[test]
    fn deadzone_suppresses_near_axis_jitter() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (0, 0), (200, 5));
        let mut m = motion();
        let out = m.process(&reg, 0.1);
        assert!(out.x > 0);
        assert_eq!(out.y, 0);
        assert_eq!(m.accumulated().y, 0.);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (10, 10), (27, -3));
        let mut a = motion();
        a.process(&reg, 0.016);
        let mut b = a.clone();
        assert_eq!(a.process(&reg, 0.016), b.process(&reg, 0.016));
        assert_eq!(a, b);
    }

    #[test]
    fn carry_is_exact_across_ticks_without_emission() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (0, 0), (0, 9));
        let mut split = Motion::new(BiAx { x: 0.08, y: 0.08 }, 0.1, 1.);
        let mut whole = split.clone();
        // 81 * 0.08 = 6.48 per second
        let total: i32 = (0..10).map(|_| split.process(&reg, 0.01).y).sum();
        let single = whole.process(&reg, 0.1).y;
        assert_eq!(total, 0);
        assert_eq!(single, 0);
        assert!((split.accumulated().y - whole.accumulated().y).abs() < 1e-6);
    }

    #[test]
    fn emission_discards_remainder_above_whole_step() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (0, 0), (10, 0));
        let mut split = Motion::new(BiAx { x: 0.08, y: 0.08 }, 0.1, 1.);
        let mut whole = split.clone();
        // 0.8 per 0.1 s: 0.8, 1.6 -> emit 1 and drop 0.6, then 0.8 again
        let total: i32 = (0..3).map(|_| split.process(&reg, 0.1).x).sum();
        assert_eq!(total, 1);
        assert!((split.accumulated().x - 0.8).abs() < EPS);
        // 2.4 in one tick -> emit 2 and drop 0.4
        assert_eq!(whole.process(&reg, 0.3).x, 2);
        assert_eq!(whole.accumulated().x, 0.);
    }

    #[test]
    fn delta_is_clamped() {
        let mut reg = Registry::new();
        contact(&mut reg, 0, (0, 0), (10, 0));
        let mut m = motion();
        // a 5 s stall counts as max_delta (0.1 s)
        m.process(&reg, 5.);
        assert!((m.accumulated().x - 0.8).abs() < EPS);
        m.process(&reg, -1.);
        assert!((m.accumulated().x - 0.8).abs() < EPS);
    }
}
