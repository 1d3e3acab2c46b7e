//! In-memory registry of live window records.
//!
//! The registry is owned by the engine task; all mutation happens there, so
//! no interior locking is needed. A reverse index maps native labels back to
//! ids for platform callbacks that only know the label.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::PanelError;
use crate::geometry::{PositionDescriptor, Rect};
use crate::windows::WindowConfig;

/// The role a surface plays in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowRole {
    Coordinator,
    InlineWindow,
    Popover,
}

/// Lifecycle status of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    /// Create requested; native surface not yet realized.
    Pending,
    Visible,
    Hidden,
    /// Terminal; the id is free for reuse once the record is removed.
    Closed,
}

/// A live surface.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    pub id: String,
    pub label: String,
    pub role: WindowRole,
    pub rect: Rect,
    pub status: WindowStatus,
    /// The declared position, kept so topology changes can re-solve it.
    /// Popovers are anchored, not declared, so they carry none.
    pub position: Option<PositionDescriptor>,
    pub config: WindowConfig,
}

/// Map from id to record, with a label reverse index.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    records: HashMap<String, WindowRecord>,
    by_label: HashMap<String, String>,
}

impl WindowRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// [`PanelError::DuplicateId`] if the id is live, in any role.
    pub fn insert(&mut self, record: WindowRecord) -> Result<(), PanelError> {
        if self.records.contains_key(&record.id) {
            return Err(PanelError::DuplicateId(record.id));
        }
        self.by_label.insert(record.label.clone(), record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn lookup_by_id(&self, id: &str) -> Option<&WindowRecord> { self.records.get(id) }

    /// Looks up a record by native label.
    #[must_use]
    pub fn lookup_by_label(&self, label: &str) -> Option<&WindowRecord> {
        self.by_label.get(label).and_then(|id| self.records.get(id))
    }

    /// Mutable access by id, for the owning task.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut WindowRecord> { self.records.get_mut(id) }

    /// Updates a record's rectangle.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] if the id is not live.
    pub fn update_rectangle(&mut self, id: &str, rect: Rect) -> Result<(), PanelError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
        record.rect = rect;
        Ok(())
    }

    /// Updates a record's status.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] if the id is not live.
    pub fn set_status(&mut self, id: &str, status: WindowStatus) -> Result<(), PanelError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
        record.status = status;
        Ok(())
    }

    /// Removes a record. Idempotent: removing a missing id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<WindowRecord> {
        match self.records.remove(id) {
            Some(record) => {
                self.by_label.remove(&record.label);
                Some(record)
            }
            None => {
                tracing::debug!(id, "remove for id that is not live, ignoring");
                None
            }
        }
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize { self.records.len() }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Ids of live records with the given role, sorted for stable output.
    #[must_use]
    pub fn ids_with_role(&self, role: WindowRole) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .values()
            .filter(|r| r.role == role)
            .map(|r| r.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Iterates over live records.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> { self.records.values() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, role: WindowRole) -> WindowRecord {
        WindowRecord {
            id: id.to_string(),
            label: format!("inline-window-{id}"),
            role,
            rect: Rect::new(0.0, 0.0, 100.0, 40.0),
            status: WindowStatus::Pending,
            position: None,
            config: WindowConfig::default(),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();

        assert!(registry.lookup_by_id("bar").is_some());
        assert!(registry.lookup_by_label("inline-window-bar").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_id_fails_across_roles() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();

        let duplicate = record("bar", WindowRole::Popover);
        assert!(matches!(
            registry.insert(duplicate),
            Err(PanelError::DuplicateId(id)) if id == "bar"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();

        assert!(registry.remove("bar").is_some());
        assert!(registry.remove("bar").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_frees_id_for_reuse() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();
        registry.remove("bar");
        assert!(registry.insert(record("bar", WindowRole::InlineWindow)).is_ok());
    }

    #[test]
    fn test_remove_clears_label_index() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();
        registry.remove("bar");
        assert!(registry.lookup_by_label("inline-window-bar").is_none());
    }

    #[test]
    fn test_update_rectangle() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();

        let rect = Rect::new(10.0, 10.0, 200.0, 50.0);
        registry.update_rectangle("bar", rect).unwrap();
        assert_eq!(registry.lookup_by_id("bar").unwrap().rect, rect);

        assert!(matches!(
            registry.update_rectangle("gone", rect),
            Err(PanelError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_status() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("bar", WindowRole::InlineWindow)).unwrap();

        registry.set_status("bar", WindowStatus::Visible).unwrap();
        assert_eq!(
            registry.lookup_by_id("bar").unwrap().status,
            WindowStatus::Visible
        );
    }

    #[test]
    fn test_ids_with_role_is_sorted() {
        let mut registry = WindowRegistry::new();
        registry.insert(record("b", WindowRole::InlineWindow)).unwrap();
        registry.insert(record("a", WindowRole::InlineWindow)).unwrap();
        registry.insert(record("p", WindowRole::Popover)).unwrap();

        assert_eq!(registry.ids_with_role(WindowRole::InlineWindow), vec!["a", "b"]);
        assert_eq!(registry.ids_with_role(WindowRole::Popover), vec!["p"]);
    }

    #[test]
    fn test_size_tracks_inserts_minus_removes() {
        let mut registry = WindowRegistry::new();
        for id in ["a", "b", "c"] {
            registry.insert(record(id, WindowRole::InlineWindow)).unwrap();
        }
        registry.remove("b");
        assert_eq!(registry.len(), 2);
    }
}
