// tether_sim/src/simulation/core/clock.rs

use bevy::prelude::Resource;

/// The shared universal time of both peers, advanced by a fixed step per frame
/// so that runs are reproducible regardless of wall-clock speed.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    start_time: f64,
    step: f64,
    total_ticks: u64,
    universal_time: f64,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(start_time: f64, duration: f64, tick_hz: f64) -> Self {
        Self {
            start_time,
            step: tick_hz.recip(),
            total_ticks: (duration * tick_hz).round().max(1.0) as u64,
            universal_time: start_time,
            ticks: 0,
        }
    }

    /// Moves time forward by one step, unless the run is already over.
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        self.ticks += 1;
        // Derived from the tick count so long runs do not accumulate rounding.
        self.universal_time = self.start_time + self.ticks as f64 * self.step;
    }

    pub fn universal_time(&self) -> f64 {
        self.universal_time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Seconds since the first step.
    pub fn elapsed(&self) -> f64 {
        self.universal_time - self.start_time
    }

    pub fn is_finished(&self) -> bool {
        self.ticks >= self.total_ticks
    }
}
