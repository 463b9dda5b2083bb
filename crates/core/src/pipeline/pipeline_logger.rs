use std::collections::HashMap;
use std::time::Instant;

/// Observer for pipeline orchestration events.
///
/// Keeps the use case free of any particular output mechanism: the CLI
/// reports through `log`, tests and embedders can stay silent.
pub trait PipelineLogger: Send {
    /// Frames handled so far out of `total` in the current stage.
    fn progress(&mut self, current: usize, total: usize);

    /// How long one unit of a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A sampled value such as an activity score or region count.
    fn metric(&mut self, name: &str, value: f64);

    /// A user-facing notice.
    fn info(&mut self, message: &str);

    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Reports through the `log` facade and keeps enough history for an
/// end-of-run summary.
///
/// Progress lines are emitted every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_frames: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
            messages: Vec::new(),
        }
    }

    /// Formatted summary, or `None` when nothing was measured.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = vec![format!(
            "Analysis summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            lines.push(format!("  {name}: avg {:.1}  max {max:.1}", mean(values)));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Analyzing: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 4);
        logger.timing("detect", 2.0);
        logger.metric("activity", 12.5);
        logger.info("No significant motion detected.");
        logger.summary();
    }

    #[test]
    fn test_timings_are_kept_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("detect", 4.0);
        logger.timing("detect", 6.0);
        logger.timing("encode", 30.0);

        assert_eq!(logger.timings_for("detect").unwrap(), &[4.0, 6.0]);
        assert_eq!(logger.timings_for("encode").unwrap(), &[30.0]);
        assert!(logger.timings_for("decode").is_none());
    }

    #[test]
    fn test_summary_lists_stages_metrics_and_throughput() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(8, 8);
        logger.timing("preprocess", 40.0);
        logger.timing("detect", 3.0);
        logger.metric("activity", 2.0);
        logger.metric("activity", 18.0);
        logger.metric("regions", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Analysis summary (8 frames"));
        assert!(summary.contains("preprocess"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("activity: avg 10.0  max 18.0"));
        assert!(summary.contains("regions: avg 1.0"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_is_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_records_total() {
        let mut logger = StdoutPipelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, 7);
        }
        assert_eq!(logger.total_frames, 7);
    }

    #[test]
    fn test_info_keeps_notices_in_order() {
        let mut logger = StdoutPipelineLogger::default();
        logger.info("first");
        logger.info("second");
        assert_eq!(logger.messages(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_relative_eq!(mean(&[]), 0.0);
        assert_relative_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }
}
