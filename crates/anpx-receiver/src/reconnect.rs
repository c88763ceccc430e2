use std::time::Duration;

use crate::config::ReconnectConfig;

/// Exponential backoff with a cap: initial 5s, factor 2, capped at
/// 300s by default. A successful dial resets the backoff.
pub struct Backoff {
    initial: Duration,
    factor: u32,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(config: &ReconnectConfig) -> Self {
        let initial = Duration::from_secs(config.initial_secs);
        Self {
            initial,
            factor: config.factor,
            max: Duration::from_secs(config.max_secs),
            current: initial,
        }
    }

    /// The delay to wait before the next dial attempt, then advances
    /// the internal state geometrically toward the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * self.factor).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_up_to_the_cap() {
        let config = ReconnectConfig {
            initial_secs: 5,
            factor: 2,
            max_secs: 300,
        };
        let mut backoff = Backoff::new(&config);
        let delays: Vec<_> = (0..8).map(|_| backoff.next_delay()).collect();
        assert_eq!(
            delays,
            vec![5, 10, 20, 40, 80, 160, 300, 300]
                .into_iter()
                .map(Duration::from_secs)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn reset_returns_to_the_initial_delay() {
        let config = ReconnectConfig {
            initial_secs: 5,
            factor: 2,
            max_secs: 300,
        };
        let mut backoff = Backoff::new(&config);
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }
}
