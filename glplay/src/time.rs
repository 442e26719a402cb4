use std::cell::Cell;
use std::time::Instant;

use sdl2::TimerSubsystem;

/// Seconds per tick assumed when the tick source cannot report its rate.
pub const FALLBACK_SECONDS_PER_TICK: f64 = 1.0e-9;

/// A monotonic counter together with its rate.
pub trait TickSource {
    fn ticks(&self) -> u64;
    /// Ticks per second, or 0 when unknown.
    fn frequency(&self) -> u64;
}

impl TickSource for TimerSubsystem {
    fn ticks(&self) -> u64 {
        self.performance_counter()
    }

    fn frequency(&self) -> u64 {
        self.performance_frequency()
    }
}

/// Nanoseconds since the source was created.
#[derive(Debug, Clone, Copy)]
pub struct InstantTicks {
    anchor: Instant,
}

impl InstantTicks {
    pub fn new() -> Self {
        InstantTicks {
            anchor: Instant::now(),
        }
    }
}

impl Default for InstantTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for InstantTicks {
    fn ticks(&self) -> u64 {
        self.anchor.elapsed().as_nanos() as u64
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Stopwatch started at construction.
pub struct Clock<S: TickSource = InstantTicks> {
    source: S,
    start: u64,
    latest: Cell<u64>,
    seconds_per_tick: f64,
}

impl<S: TickSource> Clock<S> {
    pub fn new(source: S) -> Self {
        let frequency = source.frequency();
        let seconds_per_tick = if frequency == 0 {
            log::warn!(
                "high resolution timer reports no frequency, assuming {FALLBACK_SECONDS_PER_TICK} s per tick"
            );
            FALLBACK_SECONDS_PER_TICK
        } else {
            1.0 / frequency as f64
        };
        let start = source.ticks();
        Clock {
            source,
            start,
            latest: Cell::new(start),
            seconds_per_tick,
        }
    }

    /// Seconds since the clock was created. Never decreases.
    pub fn elapsed_seconds(&self) -> f64 {
        let ticks = self.source.ticks().max(self.latest.get());
        self.latest.set(ticks);
        (ticks - self.start) as f64 * self.seconds_per_tick
    }

    pub fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_tick
    }
}

impl Clock<InstantTicks> {
    pub fn start() -> Self {
        Clock::new(InstantTicks::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTicks {
        now: Cell<u64>,
        frequency: u64,
    }

    impl TickSource for FakeTicks {
        fn ticks(&self) -> u64 {
            self.now.get()
        }

        fn frequency(&self) -> u64 {
            self.frequency
        }
    }

    #[test]
    fn elapsed_never_decreases() {
        let clock = Clock::start();
        let mut prev = clock.elapsed_seconds();
        for _ in 0..10_000 {
            let now = clock.elapsed_seconds();
            assert!(now >= prev, "{now} < {prev}");
            prev = now;
        }
    }

    #[test]
    fn elapsed_is_anchored_at_construction() {
        let source = FakeTicks {
            now: Cell::new(5_000),
            frequency: 1_000,
        };
        let clock = Clock::new(source);
        assert_eq!(clock.elapsed_seconds(), 0.0);
        clock.source.now.set(7_500);
        assert!((clock.elapsed_seconds() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn zero_frequency_falls_back_to_nanoseconds() {
        let source = FakeTicks {
            now: Cell::new(0),
            frequency: 0,
        };
        let clock = Clock::new(source);
        assert_eq!(clock.seconds_per_tick(), FALLBACK_SECONDS_PER_TICK);
        clock.source.now.set(2_000_000_000);
        assert!((clock.elapsed_seconds() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn counter_going_backwards_holds_the_last_reading() {
        let source = FakeTicks {
            now: Cell::new(100),
            frequency: 10,
        };
        let clock = Clock::new(source);
        clock.source.now.set(40);
        assert_eq!(clock.elapsed_seconds(), 0.0);
        clock.source.now.set(150);
        let at_150 = clock.elapsed_seconds();
        assert!((at_150 - 5.0).abs() < 1e-12);
        clock.source.now.set(120);
        assert_eq!(clock.elapsed_seconds(), at_150);
    }
}
