use std::time::Duration;

/// Exponential backoff settings for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
            factor: 2,
        }
    }
}

/// Stateful delay generator: initial, initial * factor, ... capped at max
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Option<Duration>,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let next = match self.current {
            None => self.policy.initial,
            Some(d) => d
                .checked_mul(self.policy.factor.max(1))
                .unwrap_or(self.policy.max)
                .min(self.policy.max),
        };
        self.current = Some(next);
        next
    }

    /// Call after a success
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn is_backing_off(&self) -> bool {
        self.current.is_some()
    }
}
