// tether_core/src/reconcile/control.rs

use crate::snapshot::FlightControlState;
use crate::types::VesselId;
use std::collections::HashMap;
use tracing::trace;

/// Replays a remote pilot's control input until `expiry`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOverride {
    pub controls: FlightControlState,
    pub expiry: f64,
}

impl ControlOverride {
    pub fn new(controls: FlightControlState, expiry: f64) -> Self {
        Self { controls, expiry }
    }

    pub fn is_active(&self, now: f64) -> bool {
        now < self.expiry
    }
}

/// At most one `ControlOverride` per vessel.
///
/// Expiry is checked whenever an override is consulted; an expired override
/// is removed by the first `update_controls` call that finds it.
#[derive(Debug, Clone, Default)]
pub struct ControlOverrides {
    slots: HashMap<VesselId, ControlOverride>,
}

impl ControlOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `control` for `vessel_id`, returning the override it supersedes.
    pub fn install(
        &mut self,
        vessel_id: VesselId,
        control: ControlOverride,
    ) -> Option<ControlOverride> {
        self.slots.insert(vessel_id, control)
    }

    /// The fly-by-wire hook: the control state the vessel should fly with.
    pub fn update_controls(
        &mut self,
        vessel_id: VesselId,
        requested: FlightControlState,
        now: f64,
    ) -> FlightControlState {
        match self.slots.get(&vessel_id) {
            Some(control) if control.is_active(now) => control.controls,
            Some(control) => {
                trace!(%vessel_id, expiry = control.expiry, now, "control override expired");
                self.slots.remove(&vessel_id);
                requested
            }
            None => requested,
        }
    }

    /// The override in effect for `vessel_id` at `now`, if any.
    pub fn active(&self, vessel_id: VesselId, now: f64) -> Option<&ControlOverride> {
        self.slots.get(&vessel_id).filter(|c| c.is_active(now))
    }

    /// Number of installed overrides, including expired ones not yet consulted.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
