// tether_core/src/track.rs

use crate::snapshot::Snapshot;

/// Receiver-side bookkeeping for one remote vessel: the last applied snapshot,
/// which becomes `previous` for the next `StateReconciler::apply`.
///
/// The reconciler does not reorder snapshots, so callers drop anything
/// `is_stale` reports before applying it.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTrack {
    last: Option<Snapshot>,
}

impl SnapshotTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// `true` if `snapshot` was captured before the last applied one.
    pub fn is_stale(&self, snapshot: &Snapshot) -> bool {
        self.last
            .as_ref()
            .is_some_and(|last| snapshot.capture_time < last.capture_time)
    }

    /// Records `snapshot` as applied, returning the one it supersedes.
    pub fn commit(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        self.last.replace(snapshot)
    }
}
