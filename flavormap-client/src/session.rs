//! Reconciliation session
//!
//! A session owns everything one map view needs: the source loader, the
//! local store, the view state and the map surface. Every reconciliation
//! pass is load → merge(local, remote) → view update; the merged set is
//! never stored.

use flavormap_common::LocalIdMinter;
use tracing::info;

use crate::local_store::LocalStore;
use crate::merger::merge;
use crate::source_loader::{SourceLoader, SourceMode};
use crate::status::StatusMessage;
use crate::submission::FlowState;
use crate::view_sync::{ListEntry, MapSurface, ViewSync};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub mode: SourceMode,
    /// Spots in the merged set
    pub total: usize,
    /// Spots held on this device
    pub local: usize,
    pub markers_created: usize,
    pub listed: usize,
}

impl RefreshReport {
    /// Notice to show after the pass, if any
    pub fn notice(&self) -> Option<StatusMessage> {
        match self.mode {
            SourceMode::Secondary => Some(StatusMessage::StaticModeNotice),
            SourceMode::Primary => None,
        }
    }
}

pub struct Session<M: MapSurface> {
    pub(crate) loader: SourceLoader,
    pub(crate) store: LocalStore,
    pub(crate) view: ViewSync,
    pub(crate) map: M,
    pub(crate) minter: LocalIdMinter,
    pub(crate) state: FlowState,
}

impl<M: MapSurface> Session<M> {
    pub fn new(loader: SourceLoader, store: LocalStore, map: M) -> Self {
        Self {
            loader,
            store,
            view: ViewSync::new(),
            map,
            minter: LocalIdMinter::new(),
            state: FlowState::Idle,
        }
    }

    /// Run one reconciliation pass
    pub async fn refresh(&mut self) -> RefreshReport {
        let loaded = self.loader.load().await;
        let local = self.store.load();
        let merged = merge(&local, &loaded.spots);
        let view = self.view.apply(&merged, &mut self.map);

        let report = RefreshReport {
            mode: loaded.mode,
            total: merged.len(),
            local: local.len(),
            markers_created: view.markers.created,
            listed: view.listed,
        };

        info!(
            mode = %report.mode,
            total = report.total,
            local = report.local,
            markers_created = report.markers_created,
            "Reconciliation pass complete"
        );

        report
    }

    /// Focus the map on a list entry; see [`ViewSync::select`]
    pub fn select(&mut self, index: usize) -> Option<ListEntry> {
        self.view.select(index, &mut self.map).cloned()
    }

    pub fn view(&self) -> &ViewSync {
        &self.view
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn state(&self) -> FlowState {
        self.state
    }
}
