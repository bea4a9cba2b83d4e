use crate::config::DelayConfig;
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

/// Randomised pause between outbound requests, to stay under site rate limits.
pub struct Throttle {
    range: DelayConfig,
    rng: Mutex<StdRng>,
}

impl Throttle {
    pub fn new(range: DelayConfig, rng: StdRng) -> Self {
        Self { range, rng: Mutex::new(rng) }
    }

    pub fn next_delay(&self) -> Duration {
        let lo = self.range.min_seconds.max(0.0);
        let hi = self.range.max_seconds.max(lo);
        if hi <= lo {
            return Duration::from_secs_f64(lo);
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Duration::from_secs_f64(rng.random_range(lo..=hi))
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
