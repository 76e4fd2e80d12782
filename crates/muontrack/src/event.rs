//! Hits and events as delivered by the acquisition side.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geometry::{self, TubeLocation};
use crate::reconstruct::Reconstruction;

/// One tube signal. Derived location fields are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HitRecord")]
pub struct Hit {
    tube_number: u32,
    chamber: u8,
    layer: u8,
    tube_in_layer: u8,
    time_of_flight: f64,
    time_over_threshold: f64,
}

/// Wire form of a hit. Derived fields present in the input are ignored and
/// recomputed from `tube_number`.
#[derive(Debug, Deserialize)]
struct HitRecord {
    tube_number: u32,
    time_of_flight: f64,
    time_over_threshold: f64,
}

impl TryFrom<HitRecord> for Hit {
    type Error = InputError;

    fn try_from(r: HitRecord) -> Result<Self, Self::Error> {
        Hit::new(r.tube_number, r.time_of_flight, r.time_over_threshold)
    }
}

impl Hit {
    /// Build a hit for `tube_number` with timing in nanoseconds.
    pub fn new(tube_number: u32, tof_ns: f64, tot_ns: f64) -> Result<Self, InputError> {
        let loc = geometry::tube_location(tube_number)?;
        Ok(Self {
            tube_number,
            chamber: loc.chamber,
            layer: loc.layer,
            tube_in_layer: loc.tube_in_layer,
            time_of_flight: tof_ns,
            time_over_threshold: tot_ns,
        })
    }

    pub fn tube_number(&self) -> u32 {
        self.tube_number
    }

    pub fn chamber(&self) -> u8 {
        self.chamber
    }

    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub fn tube_in_layer(&self) -> u8 {
        self.tube_in_layer
    }

    /// Time from trigger to tube signal (ns).
    pub fn time_of_flight(&self) -> f64 {
        self.time_of_flight
    }

    /// Duration above threshold (ns).
    pub fn time_over_threshold(&self) -> f64 {
        self.time_over_threshold
    }

    pub fn location(&self) -> TubeLocation {
        TubeLocation {
            tube: self.tube_number,
            chamber: self.chamber,
            layer: self.layer,
            tube_in_layer: self.tube_in_layer,
            row: (self.tube_number / geometry::TUBES_PER_ROW) as u8,
        }
    }

    /// Plane position `[x, y]` of the hit tube.
    pub fn position(&self) -> [f64; 2] {
        geometry::grid_position(self.tube_number)
    }
}

/// One triggered readout of all tubes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: u64,
    /// Acquisition timestamp as supplied by the readout side (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Hits in readout order.
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconstruction: Option<Reconstruction>,
}

impl Event {
    pub fn new(event_id: u64) -> Self {
        Self {
            event_id,
            ..Default::default()
        }
    }

    /// Append a hit in readout order.
    pub fn add_hit(&mut self, tube_number: u32, tof_ns: f64, tot_ns: f64) -> Result<(), InputError> {
        self.hits.push(Hit::new(tube_number, tof_ns, tot_ns)?);
        Ok(())
    }

    /// Hit counts `[chamber0, chamber1]`.
    pub fn chamber_hit_counts(&self) -> [usize; 2] {
        chamber_hit_counts(&self.hits)
    }

    /// One-line description, e.g. `Event 7: 9 hits (C0: 5, C1: 4)`.
    pub fn summary(&self) -> String {
        if self.hits.is_empty() {
            return format!("Event {}: No hits", self.event_id);
        }
        let [c0, c1] = self.chamber_hit_counts();
        format!(
            "Event {}: {} hits (C0: {}, C1: {})",
            self.event_id,
            self.hits.len(),
            c0,
            c1
        )
    }
}

pub(crate) fn chamber_hit_counts(hits: &[Hit]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for h in hits {
        counts[(h.chamber as usize).min(1)] += 1;
    }
    counts
}
