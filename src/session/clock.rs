use std::time::{Duration, Instant};

pub trait Clock {
    /// Monotonic time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
pub mod manual {
    use std::cell::Cell;
    use std::time::Duration;

    use super::Clock;

    #[derive(Default)]
    pub struct ManualClock {
        now: Cell<Duration>,
    }

    impl ManualClock {
        pub fn advance_secs(&self, secs: u64) {
            self.now.set(self.now.get() + Duration::from_secs(secs));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.now.get()
        }
    }
}
