use std::time::Duration;

/// Per-frame values handed to [`crate::GlPlayground::display`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the window was opened.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    /// True when this frame arrived more than two tick intervals after the
    /// previous one. Never true for a zero interval.
    pub fn is_late(&self, tick_interval: Duration) -> bool {
        !tick_interval.is_zero() && f64::from(self.delta) > tick_interval.as_secs_f64() * 2.0
    }
}

/// Scalar that moves by a fixed step each frame and saturates in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeFactor {
    value: f32,
    step: f32,
}

impl FadeFactor {
    pub fn new(start: f32, step: f32) -> Self {
        FadeFactor {
            value: start.clamp(0.0, 1.0),
            step,
        }
    }

    /// Fade in from black over twenty frames.
    pub fn fade_in() -> Self {
        Self::new(0.0, 0.05)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn advance(&mut self) -> f32 {
        self.value = (self.value + self.step).clamp(0.0, 1.0);
        // f32 accumulation of 0.05 lands a hair under 1.0
        if 1.0 - self.value < f32::EPSILON * 4.0 {
            self.value = 1.0;
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_saturates_after_twenty_ticks() {
        let mut fade = FadeFactor::fade_in();
        assert_eq!(fade.value(), 0.0);
        for tick in 1..20 {
            let value = fade.advance();
            assert!(value < 1.0, "saturated early at tick {tick}");
        }
        assert_eq!(fade.advance(), 1.0);
        for _ in 0..100 {
            assert_eq!(fade.advance(), 1.0);
        }
    }

    #[test]
    fn fade_is_monotonic() {
        let mut fade = FadeFactor::fade_in();
        let mut prev = fade.value();
        for _ in 0..50 {
            let value = fade.advance();
            assert!(value >= prev);
            assert!((0.0..=1.0).contains(&value));
            prev = value;
        }
    }

    #[test]
    fn fade_out_stops_at_zero() {
        let mut fade = FadeFactor::new(1.0, -0.3);
        fade.advance();
        fade.advance();
        fade.advance();
        assert_eq!(fade.advance(), 0.0);
    }

    #[test]
    fn late_frames_are_those_past_two_ticks() {
        let frame = |delta| Frame {
            elapsed: 1.0,
            delta,
            width: 480,
            height: 270,
        };
        let tick = Duration::from_secs(1) / 60;
        assert!(!frame(1.0 / 60.0).is_late(tick));
        assert!(!frame(0.03).is_late(tick));
        assert!(frame(0.05).is_late(tick));
        assert!(!frame(10.0).is_late(Duration::ZERO));
    }
}
