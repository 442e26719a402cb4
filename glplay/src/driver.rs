use std::time::{Duration, Instant};

pub const DEFAULT_TICK_RATE: u32 = 60;

/// Fixed cadence timer.
///
/// Every fired tick moves the deadline forward by exactly one interval, so a
/// caller that falls behind gets every missed tick, one per [`Ticker::poll`].
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    deadline: Instant,
    fired: u64,
}

impl Ticker {
    /// First tick is due one interval after `now`.
    pub fn new(rate_hz: u32, now: Instant) -> Self {
        let interval = Duration::from_secs(1) / rate_hz.max(1);
        Ticker {
            interval,
            deadline: now + interval,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// How long until the next tick is due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Fires at most one tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        self.deadline += self.interval;
        self.fired += 1;
        true
    }
}

/// Whether the host has started driving frames yet.
#[derive(Debug)]
pub enum DriverState {
    Idle,
    Running(Ticker),
}

impl DriverState {
    /// Idle -> Running. Calling it again keeps the running ticker.
    pub fn start(&mut self, rate_hz: u32, now: Instant) {
        if let DriverState::Idle = self {
            log::debug!("frame timer started at {rate_hz} Hz");
            *self = DriverState::Running(Ticker::new(rate_hz, now));
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, DriverState::Running(_))
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        match self {
            DriverState::Idle => None,
            DriverState::Running(ticker) => Some(ticker),
        }
    }

    /// Time the event loop may block before the next tick. `None` while idle.
    pub fn wait_budget(&self, now: Instant) -> Option<Duration> {
        match self {
            DriverState::Idle => None,
            DriverState::Running(ticker) => Some(ticker.time_until_due(now)),
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self {
            DriverState::Idle => false,
            DriverState::Running(ticker) => ticker.poll(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hertz_interval() {
        let ticker = Ticker::new(DEFAULT_TICK_RATE, Instant::now());
        assert_eq!(ticker.interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn does_not_fire_before_deadline() {
        let start = Instant::now();
        let mut ticker = Ticker::new(60, start);
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + ticker.interval() / 2));
        assert!(ticker.poll(start + ticker.interval()));
        assert_eq!(ticker.fired(), 1);
    }

    #[test]
    fn late_ticks_are_not_coalesced() {
        let start = Instant::now();
        let mut ticker = Ticker::new(60, start);
        let late = start + ticker.interval() * 3 + Duration::from_micros(10);

        let mut fired = 0;
        while ticker.poll(late) {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(ticker.time_until_due(late), ticker.interval() * 4 - (late - start));
    }

    #[test]
    fn zero_rate_is_clamped() {
        let ticker = Ticker::new(0, Instant::now());
        assert_eq!(ticker.interval(), Duration::from_secs(1));
    }

    #[test]
    fn idle_never_fires() {
        let mut state = DriverState::Idle;
        let now = Instant::now();
        assert!(!state.poll(now + Duration::from_secs(10)));
        assert_eq!(state.wait_budget(now), None);
    }

    #[test]
    fn start_is_one_shot() {
        let now = Instant::now();
        let mut state = DriverState::Idle;
        state.start(60, now);
        assert!(state.is_running());
        assert!(state.poll(now + Duration::from_millis(17)));

        state.start(30, now + Duration::from_secs(5));
        let DriverState::Running(ticker) = &state else {
            panic!("driver stopped");
        };
        assert_eq!(ticker.fired(), 1);
        assert_eq!(ticker.interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn idle_driver_has_no_ticker() {
        let mut state = DriverState::Idle;
        assert!(state.ticker().is_none());
        state.start(120, Instant::now());
        assert_eq!(state.ticker().map(Ticker::interval), Some(Duration::from_secs(1) / 120));
    }
}
