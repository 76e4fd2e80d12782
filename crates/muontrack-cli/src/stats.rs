use std::time::{Duration, Instant};

use muontrack::Event;
use serde::Serialize;

/// Running totals for one reconstruction run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatistics {
    pub events: u64,
    pub total_hits: u64,
    pub reconstructed_events: u64,
    pub runtime_seconds: f64,
    /// Events per second; 0 for an empty run.
    pub event_rate: f64,
    /// Hits per second; 0 for an empty run.
    pub hit_rate: f64,
    /// `reconstructed_events / events`; 0 when no events were seen.
    pub reconstruction_efficiency: f64,
}

impl RunStatistics {
    /// Count one processed event (after reconstruction was attempted).
    pub fn record(&mut self, event: &Event) {
        self.events += 1;
        self.total_hits += event.hits.len() as u64;
        if event.reconstruction.is_some() {
            self.reconstructed_events += 1;
        }
        self.reconstruction_efficiency = self.reconstructed_events as f64 / self.events as f64;
    }

    /// Set the runtime and the derived rates.
    pub fn finish(&mut self, runtime: Duration) {
        self.runtime_seconds = runtime.as_secs_f64();
        if self.runtime_seconds > 0.0 {
            self.event_rate = self.events as f64 / self.runtime_seconds;
            self.hit_rate = self.total_hits as f64 / self.runtime_seconds;
        }
    }

    pub fn finish_since(&mut self, start: Instant) {
        self.finish(start.elapsed());
    }
}
