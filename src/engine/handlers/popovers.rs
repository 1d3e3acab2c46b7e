//! Popover lifecycle handlers.
//!
//! Every path out of the open state funnels through [`close_popover`], which
//! ties the `PopoverClosed` emission to the record's removal. Blur and an
//! explicit close racing each other therefore emit at most once.

use crate::engine::bus::EngineEvent;
use crate::engine::state::EngineState;
use crate::error::PanelError;
use crate::popover::{self, OpenPopoverRequest, OpenedPopover, PopoverRecord};
use crate::windows::{self, WindowRecord, WindowRole, WindowStatus};

/// Opens a popover below its anchor.
///
/// If the same id is already open this is a toggle: the panel closes and the
/// reply carries `closed: true`. Otherwise any exclusive-group members are
/// closed, sequentially and completely, before the new panel is created.
pub fn on_open_popover(
    state: &mut EngineState,
    request: OpenPopoverRequest,
) -> Result<OpenedPopover, PanelError> {
    let label = windows::popover_label(&request.id);

    if state.popovers.contains_key(&request.id) {
        close_popover(state, &request.id);
        return Ok(OpenedPopover {
            id: request.id,
            label,
            closed: true,
            max_height: 0.0,
        });
    }

    // The id space is shared across roles; refuse before touching any other
    // popover so a rejected open leaves no state change behind.
    if state.windows.lookup_by_id(&request.id).is_some() {
        return Err(PanelError::DuplicateId(request.id));
    }

    // Displace exclusive-group members before the new panel exists, so
    // observers see every PopoverClosed ahead of the open taking effect.
    let mut displaced: Vec<String> = state
        .popovers
        .keys()
        .filter(|other| request.exclusive.displaces(&request.id, other))
        .cloned()
        .collect();
    displaced.sort();
    for other in displaced {
        close_popover(state, &other);
    }

    let (mid_x, mid_y) = request.anchor.center();
    let monitor = state.monitors.monitor_at(mid_x, mid_y)?;
    let placement = popover::place(
        request.anchor,
        request.width,
        request.height,
        request.align,
        request.offset_y,
        &monitor,
    );

    state.windows.insert(WindowRecord {
        id: request.id.clone(),
        label: label.clone(),
        role: WindowRole::Popover,
        rect: placement.rect,
        status: WindowStatus::Pending,
        position: None,
        config: windows::WindowConfig::default(),
    })?;

    let url = state.popover_child_url(&request.id, placement.max_height);
    if let Err(err) = state.backend.create_panel(&label, &url, placement.rect) {
        state.windows.remove(&request.id);
        return Err(err);
    }
    state.windows.set_status(&request.id, WindowStatus::Visible)?;

    state.popovers.insert(
        request.id.clone(),
        PopoverRecord {
            id: request.id.clone(),
            label: label.clone(),
            anchor: request.anchor,
            align: request.align,
            offset_y: request.offset_y,
            max_height: placement.max_height,
            exclusive: request.exclusive,
            monitor_id: monitor.id,
        },
    );

    tracing::debug!(id = %request.id, monitor = %monitor.name, "popover opened");
    Ok(OpenedPopover {
        id: request.id,
        label,
        closed: false,
        max_height: placement.max_height,
    })
}

/// Closes a popover if it is open, emitting `PopoverClosed` once.
///
/// Returns whether a panel was actually closed. Safe to call for ids that
/// are not open; blur and explicit close racing each other land here twice
/// but only the first finds a record.
pub fn close_popover(state: &mut EngineState, id: &str) -> bool {
    let Some(record) = state.popovers.remove(id) else {
        return false;
    };

    if let Err(err) = state.backend.close_window(&record.label) {
        tracing::warn!(id, error = %err, "native panel close failed, dropping record anyway");
    }
    let _ = state.windows.set_status(id, WindowStatus::Closed);
    state.windows.remove(id);
    state.bus.emit(&EngineEvent::PopoverClosed(id.to_string()));
    tracing::debug!(id, "popover closed");
    true
}

/// Closes every open popover.
pub fn on_close_all_popovers(state: &mut EngineState) {
    let mut open: Vec<String> = state.popovers.keys().cloned().collect();
    open.sort();
    for id in open {
        close_popover(state, &id);
    }
}

/// Handles a panel losing key status.
pub fn on_panel_blurred(state: &mut EngineState, label: &str) {
    let Some(id) = state
        .windows
        .lookup_by_label(label)
        .filter(|record| record.role == WindowRole::Popover)
        .map(|record| record.id.clone())
    else {
        // Already closed, or not a popover surface. Either way the blur is
        // stale and must not emit.
        return;
    };
    close_popover(state, &id);
}

/// Ids of currently open popovers, sorted for stable output.
#[must_use]
pub fn open_popover_ids(state: &EngineState) -> Vec<String> {
    let mut ids: Vec<String> = state.popovers.keys().cloned().collect();
    ids.sort();
    ids
}
