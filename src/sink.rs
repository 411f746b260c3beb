//! Metric sink interface and a local in-memory implementation.
//!
//! The evaluator hands one batch of named samples per call to a sink; the
//! sink owns the samples from that point on. Remote tracking backends
//! implement [`MetricSink`] themselves, the [`InMemorySink`] here keeps the
//! recorded series available for inspection.

use std::collections::HashMap;

use thiserror::Error;

/// Error raised by a metric sink while accepting a batch of samples.
///
/// Sink faults abort the evaluation call that triggered the submission; the
/// training loop owns any retry or crash policy.
#[derive(Debug, Error)]
#[error("metric sink update failed: {reason}")]
pub struct SinkError {
    /// A description of the sink fault.
    pub reason: String,
}

impl SinkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A step-stamped observation forwarded to the tracking sink.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Step label of the emitting call, `"step_<n>"`.
    pub label: String,
    /// Scalar value of the observation.
    pub value: f64,
}

impl MetricSample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Destination for per-component metric samples.
///
/// Called at most once per evaluation with the full batch of samples for
/// that step. Implementations are treated as append-only.
pub trait MetricSink {
    /// Accept one batch of samples, keyed by derived metric name.
    ///
    /// # Errors
    /// Any failure is surfaced to the evaluation call that submitted the batch.
    fn update_metrics(&mut self, metrics: HashMap<String, MetricSample>) -> Result<(), SinkError>;
}

/// Sink that appends every sample to a per-metric series in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    series: HashMap<String, Vec<MetricSample>>,
    updates: usize,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples recorded under `metric`, in submission order.
    pub fn samples(&self, metric: &str) -> &[MetricSample] {
        self.series.get(metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of batched updates received so far.
    pub const fn update_count(&self) -> usize {
        self.updates
    }

    /// Names of all metrics with at least one recorded sample.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl MetricSink for InMemorySink {
    fn update_metrics(&mut self, metrics: HashMap<String, MetricSample>) -> Result<(), SinkError> {
        for (name, sample) in metrics {
            self.series.entry(name).or_default().push(sample);
        }
        self.updates += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sink_appends_samples_per_metric() {
        let mut sink = InMemorySink::new();

        let mut first = HashMap::new();
        first.insert("a_loss".to_owned(), MetricSample::new("step_1", 0.5));
        sink.update_metrics(first).unwrap();

        let mut second = HashMap::new();
        second.insert("a_loss".to_owned(), MetricSample::new("step_2", 0.25));
        second.insert("b_loss".to_owned(), MetricSample::new("step_2", 1.0));
        sink.update_metrics(second).unwrap();

        let a_series = sink.samples("a_loss");
        assert_eq!(a_series.len(), 2);
        assert_eq!(a_series[0], MetricSample::new("step_1", 0.5));
        assert_eq!(a_series[1], MetricSample::new("step_2", 0.25));
        assert_eq!(sink.samples("b_loss").len(), 1);
    }

    #[test]
    fn in_memory_sink_counts_batched_updates() {
        let mut sink = InMemorySink::new();
        assert_eq!(sink.update_count(), 0);

        sink.update_metrics(HashMap::new()).unwrap();
        sink.update_metrics(HashMap::new()).unwrap();

        assert_eq!(sink.update_count(), 2);
    }

    #[test]
    fn in_memory_sink_unknown_metric_yields_empty_series() {
        let sink = InMemorySink::new();
        assert!(sink.samples("never_recorded").is_empty());
        assert_eq!(sink.metric_names().count(), 0);
    }
}
