use std::time::{Duration, Instant};

use tracing::debug;

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Reports the average frame time periodically.
///
/// Rig nudges are fixed steps per rendered frame, which the FIFO present mode paces, so the
/// clock only reports and never feeds a delta into the simulation.
pub struct FrameClock {
    report_start: Instant,
    frames_since_report: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            report_start: now,
            frames_since_report: 0,
        }
    }

    /// Counts a frame and logs the average frame time once per report interval.
    pub fn tick(&mut self) {
        if let Some(average) = self.tick_at(Instant::now()) {
            debug!(
                "Frame time: {:.2} ms ({:.1} fps)",
                average.as_secs_f64() * 1000.0,
                1.0 / average.as_secs_f64().max(f64::EPSILON)
            );
        }
    }

    /// Returns the average frame time when a report interval has elapsed.
    fn tick_at(&mut self, now: Instant) -> Option<Duration> {
        self.frames_since_report += 1;
        let elapsed = now.saturating_duration_since(self.report_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let average = elapsed / self.frames_since_report;
        self.report_start = now;
        self.frames_since_report = 0;
        Some(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_average_once_per_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let frame = Duration::from_millis(250);

        let reports = (1..=8).filter_map(|i| clock.tick_at(start + frame * i)).collect::<Vec<_>>();
        assert_eq!(reports, vec![frame, frame]);
    }

    #[test]
    fn uneven_frames_are_averaged() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_millis(100)), None);
        assert_eq!(clock.tick_at(start + Duration::from_millis(200)), None);
        assert_eq!(
            clock.tick_at(start + Duration::from_millis(1200)),
            Some(Duration::from_millis(400))
        );
    }
}
