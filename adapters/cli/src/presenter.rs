//! Presenter that narrates the session through `tracing`.

use nightfield_core::{CellCoord, StatsReport, WeaponKind};
use nightfield_session::{Presenter, VisualHandle, VisualKind};
use tracing::{debug, info};

/// Allocates sequential handles and logs every presentation request.
#[derive(Debug, Default)]
pub(crate) struct LogPresenter {
    next_handle: u64,
    visible: usize,
    last_stats: Option<StatsReport>,
}

impl LogPresenter {
    /// Number of visuals currently shown.
    pub(crate) fn visible(&self) -> usize {
        self.visible
    }
}

impl Presenter for LogPresenter {
    fn spawn_visual(&mut self, kind: VisualKind, cell: CellCoord) -> VisualHandle {
        let handle = VisualHandle::new(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.visible = self.visible.saturating_add(1);
        debug!(?kind, %cell, handle = handle.get(), "spawn visual");
        handle
    }

    fn despawn_visual(&mut self, handle: VisualHandle) {
        self.visible = self.visible.saturating_sub(1);
        debug!(handle = handle.get(), "despawn visual");
    }

    fn report_stats(&mut self, stats: StatsReport) {
        if self.last_stats != Some(stats) {
            info!(
                cycle = stats.cycle,
                plants = stats.plants,
                seeds = stats.seeds,
                extracted = stats.extracted,
                "stats"
            );
            self.last_stats = Some(stats);
        }
    }

    fn request_weapon_effect(&mut self, weapon: WeaponKind, cell: CellCoord) {
        info!(?weapon, %cell, "weapon fired");
    }
}
