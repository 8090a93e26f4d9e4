use std::time::{Duration, Instant};

/// Per-question answer timing with a running average.
#[derive(Clone, Debug, Default)]
pub struct TimingAggregator {
    started_at: Option<Instant>,
    samples: Vec<f64>,
}

impl TimingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, at: Instant) {
        self.started_at = Some(at);
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Stop the running timer and record the elapsed seconds as a sample.
    /// Returns `None` when no question was being timed.
    pub fn stop_and_record(&mut self) -> Option<f64> {
        self.stop_and_record_at(Instant::now())
    }

    pub fn stop_and_record_at(&mut self, now: Instant) -> Option<f64> {
        let started = self.started_at.take()?;
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        self.samples.push(elapsed);
        Some(elapsed)
    }

    /// Stop without recording a sample.
    pub fn cancel(&mut self) {
        self.started_at = None;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|s| s.elapsed())
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.samples.clear();
    }
}

/// `HH:MM:SS` for the timer display.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_start_records_nothing() {
        let mut timing = TimingAggregator::new();
        assert_eq!(timing.stop_and_record(), None);
        assert_eq!(timing.count(), 0);
        assert_eq!(timing.average(), None);
    }

    #[test]
    fn test_average_recomputed_after_each_answer() {
        let mut timing = TimingAggregator::new();
        let t0 = Instant::now();
        let times = [4.0, 10.0, 1.0];
        let mut clock = t0;
        let mut sum = 0.0;

        for (i, secs) in times.iter().enumerate() {
            timing.start_at(clock);
            clock += Duration::from_secs_f64(*secs);
            let elapsed = timing.stop_and_record_at(clock).unwrap();
            assert!((elapsed - secs).abs() < 1e-6);

            sum += secs;
            let expected = sum / (i + 1) as f64;
            assert!((timing.average().unwrap() - expected).abs() < 1e-6);
            assert_eq!(timing.count(), i + 1);
        }
        assert!((timing.average().unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_stop_clears_running_state() {
        let mut timing = TimingAggregator::new();
        timing.start();
        assert!(timing.is_running());
        assert!(timing.elapsed().is_some());
        timing.stop_and_record();
        assert!(!timing.is_running());
        assert!(timing.elapsed().is_none());
        assert_eq!(timing.stop_and_record(), None);
        assert_eq!(timing.count(), 1);
    }

    #[test]
    fn test_cancel_keeps_samples() {
        let mut timing = TimingAggregator::new();
        timing.start();
        timing.stop_and_record();
        timing.start();
        timing.cancel();
        assert!(!timing.is_running());
        assert_eq!(timing.count(), 1);
    }

    #[test]
    fn test_reset_clears_samples() {
        let mut timing = TimingAggregator::new();
        timing.start();
        timing.stop_and_record();
        timing.start();
        timing.reset();
        assert_eq!(timing.count(), 0);
        assert!(!timing.is_running());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_clock(Duration::from_secs(65)), "00:01:05");
        assert_eq!(format_clock(Duration::from_secs(3 * 3600 + 7)), "03:00:07");
    }
}
