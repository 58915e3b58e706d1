// tether_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::bodies::BodyCatalog;
pub use crate::statistics::DriftSink;
pub use crate::terrain::TerrainSampler;
pub use crate::vessel::{MutableVesselState, VesselView};

// --- Core Data Structures ---
pub use crate::bodies::{BodyTable, ReferenceBody};
pub use crate::config::ReconcilerConfig;
pub use crate::context::SimContext;
pub use crate::orbit::{Orbit, OrbitError, OrbitalElements, StateVector};
pub use crate::snapshot::{
    ActionGroups, AutopilotLock, AutopilotMode, FlightControlState, PositionUpdate, Snapshot,
    SnapshotError, SurfaceState,
};
pub use crate::statistics::{DriftStatistics, DriftSummary, ErrorSample, NullDriftSink, SinkError};
pub use crate::terrain::GroundSample;
pub use crate::types::{Geodetic, VesselId};
pub use crate::vessel::PartState;

// --- Algorithms ---
pub use crate::capture::{CaptureError, SnapshotCapture};
pub use crate::reconcile::{ControlOverride, ControlOverrides, ReconcileError, StateReconciler};
pub use crate::track::SnapshotTrack;

// --- Concrete Implementations ---
pub use crate::terrain::{FlatTerrain, NoTerrain};
pub use crate::vessel::SimulatedVessel;
