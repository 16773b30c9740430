use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Logs how long a command took when dropped.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        debug!("⏱  {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("⏱  {} done in {:.2?}", self.label, self.elapsed());
    }
}
