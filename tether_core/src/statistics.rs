// tether_core/src/statistics.rs

//! Reconciliation error samples and the sinks that collect them.

use crate::types::VesselId;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Number of recent samples `DriftStatistics` keeps when none is given.
pub const DEFAULT_RECENT_CAPACITY: usize = 256;

/// How far one reconciliation moved a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    pub vessel_id: VesselId,
    pub distance_error: f64,
    pub velocity_error: f64,
    /// Degrees.
    pub rotation_error: f64,
    pub sample_time: f64,
}

impl ErrorSample {
    fn is_finite(&self) -> bool {
        self.distance_error.is_finite()
            && self.velocity_error.is_finite()
            && self.rotation_error.is_finite()
            && self.sample_time.is_finite()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    #[error("sample rejected: {0}")]
    Rejected(&'static str),
}

/// Receives error samples for diagnostics.
///
/// Recording must not block. A returned error is logged by the caller and
/// otherwise ignored.
pub trait DriftSink: Send + Sync {
    fn record(&mut self, sample: &ErrorSample) -> Result<(), SinkError>;

    /// Allows downcasting to the concrete sink, e.g. to read its statistics.
    fn as_any(&self) -> &dyn Any;
}

/// Discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDriftSink;

impl DriftSink for NullDriftSink {
    fn record(&mut self, _sample: &ErrorSample) -> Result<(), SinkError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// --- Aggregation ---

/// Running aggregate of the error samples of one vessel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DriftSummary {
    pub samples: u64,
    pub mean_distance: f64,
    pub max_distance: f64,
    pub mean_velocity: f64,
    pub max_velocity: f64,
    pub mean_rotation: f64,
    pub max_rotation: f64,
    pub last_sample_time: f64,
}

impl DriftSummary {
    fn accumulate(&mut self, sample: &ErrorSample) {
        self.samples += 1;
        let n = self.samples as f64;
        self.mean_distance += (sample.distance_error - self.mean_distance) / n;
        self.mean_velocity += (sample.velocity_error - self.mean_velocity) / n;
        self.mean_rotation += (sample.rotation_error - self.mean_rotation) / n;
        self.max_distance = self.max_distance.max(sample.distance_error);
        self.max_velocity = self.max_velocity.max(sample.velocity_error);
        self.max_rotation = self.max_rotation.max(sample.rotation_error);
        self.last_sample_time = sample.sample_time;
    }
}

/// In-memory per-vessel drift statistics plus a bounded window of the most
/// recent samples across all vessels.
#[derive(Debug, Clone)]
pub struct DriftStatistics {
    summaries: HashMap<VesselId, DriftSummary>,
    recent: VecDeque<ErrorSample>,
    capacity: usize,
}

impl Default for DriftStatistics {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl DriftStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            summaries: HashMap::new(),
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn summary(&self, vessel_id: VesselId) -> Option<&DriftSummary> {
        self.summaries.get(&vessel_id)
    }

    pub fn summaries(&self) -> impl Iterator<Item = (&VesselId, &DriftSummary)> {
        self.summaries.iter()
    }

    /// Most recent samples, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &ErrorSample> {
        self.recent.iter()
    }

    pub fn total_samples(&self) -> u64 {
        self.summaries.values().map(|s| s.samples).sum()
    }

    /// Drops everything recorded for a vessel, e.g. when it leaves the session.
    pub fn forget(&mut self, vessel_id: VesselId) -> Option<DriftSummary> {
        self.recent.retain(|s| s.vessel_id != vessel_id);
        self.summaries.remove(&vessel_id)
    }
}

impl DriftSink for DriftStatistics {
    fn record(&mut self, sample: &ErrorSample) -> Result<(), SinkError> {
        if !sample.is_finite() {
            return Err(SinkError::Rejected("non-finite error sample"));
        }
        self.summaries
            .entry(sample.vessel_id)
            .or_default()
            .accumulate(sample);

        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(*sample);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
