//! Exponential backoff with jitter and a bounded elapsed time

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

/// Backoff configuration
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Initial delay between attempts
    pub initial_interval: Duration,
    /// Maximum delay between attempts
    pub max_interval: Duration,
    /// Growth factor applied after each attempt
    pub multiplier: f64,
    /// Jitter: each delay is drawn uniformly from
    /// `interval * (1 - factor) ..= interval * (1 + factor)`
    pub randomization_factor: f64,
    /// Total time budget across all attempts; `None` retries forever
    pub max_elapsed: Option<Duration>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            randomization_factor: 0.5,
            // Explicit ceiling so a dead listener cannot block startup forever
            max_elapsed: Some(Duration::from_secs(15 * 60)),
        }
    }
}

/// Backoff state for one retry loop.
pub struct Backoff {
    config: BackoffConfig,
    current_interval: Duration,
    started: Instant,
    attempt: usize,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current_interval: config.initial_interval,
            config,
            started: Instant::now(),
            attempt: 0,
        }
    }

    /// Delay to sleep before the next attempt, or `None` once the elapsed
    /// ceiling has passed.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.config.max_elapsed {
            if self.started.elapsed() >= max_elapsed {
                return None;
            }
        }

        self.attempt += 1;
        let delay = self.randomized(self.current_interval);

        debug!(
            attempt = self.attempt,
            delay_ms = delay.as_millis() as u64,
            "Backing off before retry"
        );

        let next = Duration::from_secs_f64(
            self.current_interval.as_secs_f64() * self.config.multiplier,
        );
        self.current_interval = next.min(self.config.max_interval);

        Some(delay)
    }

    /// Attempts issued so far.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Base interval the next delay will be drawn around.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    fn randomized(&self, interval: Duration) -> Duration {
        let factor = self.config.randomization_factor;
        if factor <= 0.0 {
            return interval;
        }
        let base = interval.as_secs_f64();
        let delta = base * factor;
        let jittered = rand::thread_rng().gen_range((base - delta)..=(base + delta));
        Duration::from_secs_f64(jittered.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_jitter() -> BackoffConfig {
        BackoffConfig {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(40),
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed: None,
        }
    }

    #[test]
    fn test_backoff_growth_and_cap() {
        let mut backoff = Backoff::new(config_without_jitter());

        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(10)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(20)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(40)));
        // capped at max_interval
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(40)));
        assert_eq!(backoff.attempt(), 4);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let config = BackoffConfig {
            initial_interval: Duration::from_millis(100),
            randomization_factor: 0.5,
            max_elapsed: None,
            ..BackoffConfig::default()
        };
        let mut backoff = Backoff::new(config);

        let delay = backoff.next_delay().unwrap();
        assert!(delay >= Duration::from_millis(50));
        assert!(delay <= Duration::from_millis(150));
    }

    #[test]
    fn test_elapsed_ceiling_stops_retries() {
        let config = BackoffConfig {
            max_elapsed: Some(Duration::ZERO),
            ..config_without_jitter()
        };
        let mut backoff = Backoff::new(config);
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.attempt(), 0);
    }
}
