use std::time::Duration;

/// Owned timer handle on the sequencer's virtual clock.
///
/// Cancelling a timer is dropping it; there is no external registry to leak into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    due: Duration,
    period: Option<Duration>,
}

impl Timer {
    pub fn once(now: Duration, delay: Duration) -> Self {
        Self { due: now + delay, period: None }
    }

    /// Periodic timer; first fire one period after `now`.
    pub fn every(now: Duration, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self { due: now + period, period: Some(period) }
    }

    pub fn due(&self) -> Duration {
        self.due
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.due <= now
    }

    /// Schedule the next fire of a periodic timer. Returns `false` for one-shots.
    pub fn rearm(&mut self) -> bool {
        match self.period {
            Some(period) => {
                self.due += period;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_and_every() {
        let ms = Duration::from_millis;
        let mut once = Timer::once(ms(100), ms(50));
        assert!(!once.is_due(ms(149)));
        assert!(once.is_due(ms(150)));
        assert!(!once.rearm());

        let mut tick = Timer::every(ms(0), ms(80));
        assert_eq!(tick.due(), ms(80));
        assert!(tick.rearm());
        assert_eq!(tick.due(), ms(160));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let tick = Timer::every(Duration::ZERO, Duration::ZERO);
        assert_eq!(tick.due(), Duration::from_millis(1));
    }
}
