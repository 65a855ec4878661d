use std::collections::BTreeMap;

pub mod decoder;

/// One active contact, keyed by its hardware slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchPoint {
    pub slot: i32,
    pub tracking_id: i32,
    pub pressure: Option<i32>,
    pub abs: Axes,
    /// first reported position, latched once per axis
    pub origin: Axes,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Axes {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl TouchPoint {
    pub fn new(slot: i32, tracking_id: i32) -> Self {
        Self {
            slot,
            tracking_id,
            ..Default::default()
        }
    }

    /// Record a position sample. The first sample on an axis becomes its origin.
    pub fn set_position(&mut self, axis: Axis, value: i32) {
        let (abs, origin) = match axis {
            Axis::X => (&mut self.abs.x, &mut self.origin.x),
            Axis::Y => (&mut self.abs.y, &mut self.origin.y),
        };
        *abs = Some(value);
        origin.get_or_insert(value);
    }

    /// Displacement from origin in surface units; axes without a sample yet count as 0.
    pub fn displacement(&self) -> (f64, f64) {
        let d = |abs: Option<i32>, origin: Option<i32>| match (abs, origin) {
            (Some(a), Some(o)) => f64::from(a) - f64::from(o),
            _ => 0.,
        };
        (
            d(self.abs.x, self.origin.x),
            d(self.abs.y, self.origin.y),
        )
    }
}

/// Active contacts. Keying by slot keeps at most one point per slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    points: BTreeMap<i32, TouchPoint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, slot: i32) -> Option<&TouchPoint> {
        self.points.get(&slot)
    }

    pub fn get_mut(&mut self, slot: i32) -> Option<&mut TouchPoint> {
        self.points.get_mut(&slot)
    }

    /// Start a new contact on `slot`, dropping whatever stale contact was there.
    pub fn insert(&mut self, slot: i32, tracking_id: i32) -> Option<TouchPoint> {
        self.points.insert(slot, TouchPoint::new(slot, tracking_id))
    }

    pub fn remove(&mut self, slot: i32) -> Option<TouchPoint> {
        self.points.remove(&slot)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The contact, if exactly one is active.
    pub fn single(&self) -> Option<&TouchPoint> {
        match self.points.len() {
            1 => self.points.values().next(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &TouchPoint> {
        self.points.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn origin_latches_on_first_sample_only() {
        let mut tp = TouchPoint::new(0, 7);
        tp.set_position(Axis::X, 0);
        tp.set_position(Axis::X, 40);
        tp.set_position(Axis::Y, 12);
        tp.set_position(Axis::Y, 2);
        assert_eq!(tp.origin, Axes { x: Some(0), y: Some(12) });
        assert_eq!(tp.abs, Axes { x: Some(40), y: Some(2) });
        assert_eq!(tp.displacement(), (40., -10.));
    }

    #[test]
    fn displacement_without_samples_is_zero() {
        let mut tp = TouchPoint::new(1, 1);
        assert_eq!(tp.displacement(), (0., 0.));
        tp.set_position(Axis::Y, 300);
        tp.set_position(Axis::Y, 310);
        assert_eq!(tp.displacement(), (0., 10.));
    }

    #[test]
    fn insert_replaces_stale_slot() {
        let mut reg = Registry::new();
        assert!(reg.insert(2, 10).is_none());
        reg.get_mut(2).unwrap().set_position(Axis::X, 5);
        let stale = reg.insert(2, 11).unwrap();
        assert_eq!(stale.tracking_id, 10);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(2), Some(&TouchPoint::new(2, 11)));
    }

    #[test]
    fn single_requires_exactly_one_contact() {
        let mut reg = Registry::new();
        assert!(reg.single().is_none());
        reg.insert(0, 1);
        assert_eq!(reg.single().map(|tp| tp.slot), Some(0));
        reg.insert(1, 2);
        assert!(reg.single().is_none());
        reg.remove(0);
        assert_eq!(reg.single().map(|tp| tp.slot), Some(1));
    }

    #[test]
    fn clear_drops_every_contact() {
        let mut reg = Registry::new();
        reg.insert(0, 1);
        reg.insert(4, 2);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.single().is_none());
    }
}
