/*
Knob Catch-Up
=============

Two physical knobs drive many parameters, one set per UI mode. When the mode
changes, the knob's physical position almost never matches the stored value
of the parameter it now controls. Applying the raw position straight away
would make the parameter jump.

Instead each parameter waits until the knob physically passes near its stored
value, then follows the knob from there on:

    stored value   ────────●──────────────────────   (normalized 0.42)
    knob position  ──╱╲──╱────────                  (not caught: ignored)
                           ↑ |raw - 0.42| < 0.02 → caught, value tracks knob

The tolerance is absolute on the normalized 0..1 scale, not relative to the
parameter range.

Once caught, a knob stays caught until `reset` is called (the mode switch).
*/

/// Normalized distance within which a knob takes over its parameter.
pub const CATCH_THRESHOLD: f32 = 0.02;

/// A continuous parameter driven by a shared physical knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knob {
    value: f32,
    min: f32,
    max: f32,
    caught: bool,
}

impl Knob {
    pub fn new(initial: f32, min: f32, max: f32) -> Self {
        Self {
            value: initial,
            min,
            max,
            caught: false,
        }
    }

    /// Feed one raw knob reading (0.0..=1.0).
    ///
    /// Returns `true` if the value was applied this call. A non-finite
    /// reading is ignored and leaves the catch latch untouched.
    pub fn update(&mut self, raw: f32) -> bool {
        if !raw.is_finite() {
            return false;
        }
        let raw = raw.clamp(0.0, 1.0);

        if !self.caught {
            self.caught = (raw - self.normalized()).abs() < CATCH_THRESHOLD;
        }

        if self.caught {
            self.value = self.min + raw * (self.max - self.min);
        }
        self.caught
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Position of the stored value on the 0..1 knob scale.
    pub fn normalized(&self) -> f32 {
        (self.value - self.min) / (self.max - self.min)
    }

    pub fn reset(&mut self) {
        self.caught = false;
    }

    pub fn is_caught(&self) -> bool {
        self.caught
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_reading_is_ignored() {
        let mut knob = Knob::new(2000.0, 200.0, 10_000.0);
        assert!(!knob.update(0.9));
        assert_eq!(knob.value(), 2000.0);
        assert!(!knob.is_caught());
    }

    #[test]
    fn catches_within_tolerance() {
        // stored 2000 in [200, 10000] sits at ~0.184
        let mut knob = Knob::new(2000.0, 200.0, 10_000.0);
        assert!(knob.update(0.20));
        assert!((knob.value() - 2160.0).abs() < 0.01);
    }

    #[test]
    fn caught_knob_tracks_linearly() {
        let mut knob = Knob::new(0.5, 0.0, 1.0);
        assert!(knob.update(0.5));
        for raw in [0.0, 0.25, 1.0, 0.9] {
            assert!(knob.update(raw));
            assert!((knob.value() - raw).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_requires_recatch() {
        let mut knob = Knob::new(0.5, 0.0, 1.0);
        knob.update(0.5);
        knob.update(0.8);
        knob.reset();

        assert!(!knob.update(0.1));
        assert!((knob.value() - 0.8).abs() < 1e-6);
        assert!(knob.update(0.79));
    }

    #[test]
    fn only_readings_inside_threshold_catch() {
        let mut knob = Knob::new(0.5, 0.0, 1.0);
        assert!(!knob.update(0.53));
        assert!(knob.update(0.515));
    }

    #[test]
    fn threshold_is_two_hundredths_of_the_scale() {
        let mut knob = Knob::new(0.5, 0.0, 1.0);
        assert!(!knob.update(0.525));
        assert_eq!(knob.value(), 0.5);
        assert!(knob.update(0.519));
        assert!((knob.value() - 0.519).abs() < 1e-6);
    }

    #[test]
    fn reading_exactly_at_threshold_does_not_catch() {
        // 0.02 - 0.0 is exactly the threshold, so only a strict compare rejects it
        let mut knob = Knob::new(0.0, 0.0, 1.0);
        assert!(!knob.update(0.02));
        assert_eq!(knob.value(), 0.0);
        assert!(knob.update(0.019));
    }

    #[test]
    fn non_finite_reading_is_ignored() {
        let mut knob = Knob::new(0.5, 0.0, 1.0);
        assert!(knob.update(0.5));
        for raw in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(!knob.update(raw));
            assert_eq!(knob.value(), 0.5);
            assert!(knob.is_caught());
        }

        let mut idle = Knob::new(0.5, 0.0, 1.0);
        assert!(!idle.update(f32::NAN));
        assert!(!idle.is_caught());
    }

    #[test]
    fn out_of_range_reading_is_clamped() {
        let mut knob = Knob::new(1.0, 0.0, 1.0);
        assert!(knob.update(1.5));
        assert_eq!(knob.value(), 1.0);
    }
}
