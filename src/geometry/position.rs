//! CSS-style position descriptors.

use serde::{Deserialize, Serialize};

/// A bounding-box position descriptor.
///
/// Each axis must be soluble from the fields that are present: an edge pair,
/// an edge plus an extent, a lone edge (the extent stretches to the monitor's
/// far side), or a lone extent (centered). All values are logical pixels and
/// relative to the chosen monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionDescriptor {
    /// Display name, or `"primary"`/absent for the primary monitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PositionDescriptor {
    /// Descriptor pinned to a named monitor.
    #[must_use]
    pub fn on_monitor(mut self, name: impl Into<String>) -> Self {
        self.monitor = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_camel_case() {
        let json = r#"{"monitor":"secondary","top":0,"left":0,"right":0,"height":40}"#;
        let position: PositionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(position.monitor.as_deref(), Some("secondary"));
        assert_eq!(position.top, Some(0.0));
        assert_eq!(position.height, Some(40.0));
        assert_eq!(position.width, None);
    }

    #[test]
    fn test_absent_fields_are_skipped_in_serialization() {
        let position = PositionDescriptor {
            top: Some(9.0),
            left: Some(20.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&position).unwrap();
        assert!(json.contains("top"));
        assert!(!json.contains("bottom"));
        assert!(!json.contains("monitor"));
    }

    #[test]
    fn test_on_monitor_builder() {
        let position = PositionDescriptor::default().on_monitor("primary");
        assert_eq!(position.monitor.as_deref(), Some("primary"));
    }
}
