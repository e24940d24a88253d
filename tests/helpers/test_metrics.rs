//! An in-memory metrics recorder for asserting on dispatch counters.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Records counters under their bare name and under `name{label=value,...}`.
#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl TestMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get_counter(&self, name: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(0)
    }
}

impl Recorder for TestMetrics {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata) -> Counter {
        let labels: Vec<String> = key
            .labels()
            .map(|l| format!("{}={}", l.key(), l.value()))
            .collect();
        Counter::from_arc(Arc::new(MetricCounter {
            name: key.name().to_string(),
            labelled: format!("{}{{{}}}", key.name(), labels.join(",")),
            counters: self.counters.clone(),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata) -> Histogram {
        Histogram::noop()
    }
}

#[derive(Debug)]
struct MetricCounter {
    name: String,
    labelled: String,
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl metrics::CounterFn for MetricCounter {
    fn increment(&self, value: u64) {
        let mut counters = self.counters.lock().unwrap();
        *counters.entry(self.name.clone()).or_insert(0) += value;
        *counters.entry(self.labelled.clone()).or_insert(0) += value;
    }

    fn absolute(&self, _value: u64) {}
}
