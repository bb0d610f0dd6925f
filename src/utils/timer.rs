//! Stage timing

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Timer with named checkpoints, logged when stopped
#[derive(Debug)]
pub struct Timer {
    name: String,
    start: Instant,
    checkpoints: Vec<(String, Duration)>,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            checkpoints: Vec::new(),
        }
    }

    /// Add a checkpoint
    pub fn checkpoint(&mut self, name: impl Into<String>) {
        self.checkpoints.push((name.into(), self.start.elapsed()));
    }

    pub fn checkpoints(&self) -> &[(String, Duration)] {
        &self.checkpoints
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and log the timer with every checkpoint delta
    pub fn stop(self) -> Duration {
        let elapsed = self.start.elapsed();

        let mut prev = Duration::ZERO;
        for (name, time) in &self.checkpoints {
            debug!(
                timer = %self.name,
                checkpoint = %name,
                at_secs = time.as_secs_f64(),
                delta_secs = (*time - prev).as_secs_f64(),
                "Checkpoint"
            );
            prev = *time;
        }

        info!("{} completed in {:.3}s", self.name, elapsed.as_secs_f64());
        elapsed
    }
}

/// Logs how long a pipeline stage took when dropped, on every exit path.
#[derive(Debug)]
pub struct ScopedTimer {
    stage: &'static str,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        debug!(stage = self.stage, elapsed = ?self.start.elapsed(), "Stage finished");
    }
}

/// Run `f` inside a [`ScopedTimer`] named `stage`.
pub fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let _timer = ScopedTimer::new(stage);
    f()
}
