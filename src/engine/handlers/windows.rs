//! Inline window lifecycle handlers.

use super::popovers;
use crate::engine::state::EngineState;
use crate::error::PanelError;
use crate::geometry::{self, PositionDescriptor};
use crate::windows::{self, WindowConfig, WindowRecord, WindowRole, WindowStatus};

/// Creates an inline child window.
///
/// Atomic at the record level: if the native surface cannot be realized, the
/// record inserted beforehand is removed again before the error surfaces.
pub fn on_create_inline_window(
    state: &mut EngineState,
    id: String,
    url: Option<String>,
    position: PositionDescriptor,
    config: WindowConfig,
) -> Result<(), PanelError> {
    if state.windows.lookup_by_id(&id).is_some() {
        return Err(PanelError::DuplicateId(id));
    }

    let monitors = state.monitors.list()?;
    let placement = geometry::solve(&position, &monitors)?;
    let label = windows::inline_label(&id);

    state.windows.insert(WindowRecord {
        id: id.clone(),
        label: label.clone(),
        role: WindowRole::InlineWindow,
        rect: placement.rect,
        status: WindowStatus::Pending,
        position: Some(position),
        config,
    })?;

    let url = url.unwrap_or_else(|| state.inline_child_url(&id));
    if let Err(err) = state.backend.create_window(&label, &url, placement.rect, &config) {
        state.windows.remove(&id);
        return Err(err);
    }

    state.windows.set_status(&id, WindowStatus::Visible)?;
    tracing::debug!(id = %id, monitor = %placement.monitor.name, "inline window created");
    Ok(())
}

/// Resolves a surface key that may be either a host id or a derived native
/// label, so callers holding only their label can still address themselves.
fn resolve_id(state: &EngineState, key: &str) -> Option<String> {
    if state.windows.lookup_by_id(key).is_some() {
        return Some(key.to_string());
    }
    state.windows.lookup_by_label(key).map(|record| record.id.clone())
}

/// Re-solves a window's descriptor and moves its surface.
pub fn on_update_window_position(
    state: &mut EngineState,
    key: &str,
    position: PositionDescriptor,
) -> Result<(), PanelError> {
    let id = resolve_id(state, key).ok_or_else(|| PanelError::NotFound(key.to_string()))?;
    let id = id.as_str();
    let record = state
        .windows
        .lookup_by_id(id)
        .filter(|r| r.role != WindowRole::Popover)
        .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
    let label = record.label.clone();

    let monitors = state.monitors.list()?;
    let placement = geometry::solve(&position, &monitors)?;

    state.backend.move_window(&label, placement.rect.x, placement.rect.y)?;
    state
        .backend
        .resize_window(&label, placement.rect.width, placement.rect.height)?;

    state.windows.update_rectangle(id, placement.rect)?;
    if let Some(record) = state.windows.get_mut(id) {
        record.position = Some(position);
    }
    Ok(())
}

/// Shows a window, restoring its configured click-through state.
pub fn on_show_window(state: &mut EngineState, key: &str) -> Result<(), PanelError> {
    let id = resolve_id(state, key).ok_or_else(|| PanelError::NotFound(key.to_string()))?;
    let id = id.as_str();
    let record = state
        .windows
        .lookup_by_id(id)
        .filter(|r| r.role != WindowRole::Popover)
        .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
    let label = record.label.clone();
    let click_through = record.config.click_through;

    state.backend.show_window(&label)?;
    state.backend.set_click_through(&label, click_through)?;
    state.windows.set_status(id, WindowStatus::Visible)
}

/// Hides a window. Hidden surfaces ignore cursor events so they never
/// swallow clicks.
pub fn on_hide_window(state: &mut EngineState, key: &str) -> Result<(), PanelError> {
    let id = resolve_id(state, key).ok_or_else(|| PanelError::NotFound(key.to_string()))?;
    let id = id.as_str();
    let record = state
        .windows
        .lookup_by_id(id)
        .filter(|r| r.role != WindowRole::Popover)
        .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
    let label = record.label.clone();

    state.backend.set_click_through(&label, true)?;
    state.backend.hide_window(&label)?;
    state.windows.set_status(id, WindowStatus::Hidden)
}

/// Closes a window and frees its id.
///
/// Popover ids are routed through the popover path so the close emits
/// `PopoverClosed` exactly once. The coordinator record lives for the whole
/// process; closing it is a logged no-op.
pub fn on_close_window(
    state: &mut EngineState,
    key: &str,
    idempotent: bool,
) -> Result<(), PanelError> {
    let Some(id) = resolve_id(state, key) else {
        if idempotent {
            return Ok(());
        }
        return Err(PanelError::NotFound(key.to_string()));
    };
    let id = id.as_str();
    // resolve_id only succeeds for live records.
    let record = state
        .windows
        .lookup_by_id(id)
        .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
    let role = record.role;
    let label = record.label.clone();

    match role {
        WindowRole::Popover => {
            popovers::close_popover(state, id);
            Ok(())
        }
        WindowRole::Coordinator => {
            tracing::debug!("refusing to close the coordinator surface");
            Ok(())
        }
        WindowRole::InlineWindow => {
            if let Err(err) = state.backend.close_window(&label) {
                tracing::warn!(id, error = %err, "native close failed, dropping record anyway");
            }
            let _ = state.windows.set_status(id, WindowStatus::Closed);
            state.windows.remove(id);
            Ok(())
        }
    }
}

/// Resizes a surface. Popover heights are clamped to the height budget
/// computed at open time.
pub fn on_set_window_size(
    state: &mut EngineState,
    key: &str,
    width: f64,
    height: f64,
) -> Result<(), PanelError> {
    let id = resolve_id(state, key).ok_or_else(|| PanelError::NotFound(key.to_string()))?;
    let id = id.as_str();
    let record = state
        .windows
        .lookup_by_id(id)
        .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
    let label = record.label.clone();
    let mut rect = record.rect;

    let height = match state.popovers.get(id) {
        Some(popover) => height.min(popover.max_height),
        None => height,
    };

    state.backend.resize_window(&label, width, height)?;
    rect.width = width;
    rect.height = height;
    state.windows.update_rectangle(id, rect)
}

/// Focuses the inline window under the cursor, if hover focus is enabled.
pub fn on_cursor_moved(state: &mut EngineState, x: f64, y: f64) {
    if !state.hover_focus {
        return;
    }

    let target = state
        .windows
        .iter()
        .find(|record| {
            record.role == WindowRole::InlineWindow
                && record.status == WindowStatus::Visible
                && record.rect.contains(x, y)
        })
        .map(|record| record.label.clone());

    match target {
        Some(label) => {
            if state.last_hover.as_deref() != Some(&label) {
                if let Err(err) = state.backend.focus_window(&label) {
                    tracing::debug!(label = %label, error = %err, "hover focus failed");
                    return;
                }
                state.last_hover = Some(label);
            }
        }
        None => state.last_hover = None,
    }
}
