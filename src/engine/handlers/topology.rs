//! Display topology change handling.

use super::popovers;
use crate::engine::bus::EngineEvent;
use crate::engine::state::EngineState;
use crate::geometry;
use crate::windows::WindowRole;

/// Applies a coalesced topology change.
///
/// Re-queries the platform, repositions every inline window from its stored
/// descriptor (named monitors that vanished fall back to the primary via the
/// solver), closes popovers whose anchor monitor is gone, and finally
/// broadcasts the new snapshot. A failed platform query keeps the previous
/// snapshot and notifies nobody; a window that fails to move is left at its
/// old rectangle and the rest continue.
pub fn on_topology_flush(state: &mut EngineState) {
    let monitors = match state.backend.monitors() {
        Ok(monitors) => monitors,
        Err(err) => {
            tracing::warn!(error = %err, "monitor query failed, keeping previous snapshot");
            return;
        }
    };
    state.monitors.ingest(monitors);

    let Ok(snapshot) = state.monitors.list() else {
        tracing::warn!("platform reported an empty monitor table, keeping quiet");
        return;
    };
    tracing::debug!(count = snapshot.len(), "display topology changed");

    for id in state.windows.ids_with_role(WindowRole::InlineWindow) {
        let Some(record) = state.windows.lookup_by_id(&id) else {
            continue;
        };
        let Some(position) = record.position.clone() else {
            continue;
        };
        let label = record.label.clone();

        match geometry::solve(&position, &snapshot) {
            Ok(placement) => {
                let moved = state
                    .backend
                    .move_window(&label, placement.rect.x, placement.rect.y)
                    .and_then(|()| {
                        state.backend.resize_window(
                            &label,
                            placement.rect.width,
                            placement.rect.height,
                        )
                    });
                match moved {
                    Ok(()) => {
                        let _ = state.windows.update_rectangle(&id, placement.rect);
                    }
                    Err(err) => {
                        tracing::warn!(id = %id, error = %err, "reposition failed, window keeps its old rectangle");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "position no longer resolves, window keeps its old rectangle");
            }
        }
    }

    let mut orphaned: Vec<String> = state
        .popovers
        .values()
        .filter(|popover| !state.monitors.contains_id(popover.monitor_id))
        .map(|popover| popover.id.clone())
        .collect();
    orphaned.sort();
    for id in orphaned {
        tracing::debug!(id = %id, "anchor monitor removed, closing popover");
        popovers::close_popover(state, &id);
    }

    state.bus.emit(&EngineEvent::MonitorTopologyChanged(snapshot));
}
