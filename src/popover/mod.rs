//! Popover records and the anchored-placement rules.
//!
//! A popover is a transient, non-activating floating panel that opens below
//! an anchor rectangle, dismisses on blur, auto-sizes to its content up to a
//! host-computed maximum height, and may belong to an exclusive group.

pub mod child;
mod placement;

pub use placement::{PopoverPlacement, place};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::geometry::DEFAULT_POPOVER_OFFSET_Y;
use crate::geometry::Rect;

/// Horizontal alignment of the panel along the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoverAlign {
    Start,
    #[default]
    Center,
    End,
}

/// Exclusive-group membership.
///
/// On the wire this is either a boolean (`true` closes every other popover)
/// or a string prefix (`"github"` closes every popover whose id starts with
/// `github-`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Exclusive {
    /// Open without closing anything.
    #[default]
    No,
    /// Close every other open popover first.
    All,
    /// Close open popovers whose id starts with `<prefix>-` first.
    Prefix(String),
}

impl Exclusive {
    /// Whether opening `opening_id` should close an already-open `other_id`.
    #[must_use]
    pub fn displaces(&self, opening_id: &str, other_id: &str) -> bool {
        if other_id == opening_id {
            return false;
        }
        match self {
            Self::No => false,
            Self::All => true,
            Self::Prefix(prefix) => other_id.starts_with(&format!("{prefix}-")),
        }
    }
}

impl Serialize for Exclusive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::No => serializer.serialize_bool(false),
            Self::All => serializer.serialize_bool(true),
            Self::Prefix(prefix) => serializer.serialize_str(prefix),
        }
    }
}

impl<'de> Deserialize<'de> for Exclusive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Prefix(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Self::No,
            Raw::Flag(true) => Self::All,
            Raw::Prefix(prefix) if prefix.is_empty() => Self::No,
            Raw::Prefix(prefix) => Self::Prefix(prefix),
        })
    }
}

/// Arguments to an `open_popover` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPopoverRequest {
    pub id: String,
    /// Anchor rectangle in virtual-desktop logical pixels, captured by the
    /// caller at trigger time.
    pub anchor: Rect,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub align: PopoverAlign,
    #[serde(default = "default_offset_y")]
    pub offset_y: f64,
    #[serde(default)]
    pub exclusive: Exclusive,
}

fn default_offset_y() -> f64 { DEFAULT_POPOVER_OFFSET_Y }

/// Reply to an `open_popover` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedPopover {
    pub id: String,
    pub label: String,
    /// `true` when the request toggled an already-open popover closed.
    pub closed: bool,
    /// Available height from the panel's top edge to the monitor bottom;
    /// zero when `closed` is `true`.
    pub max_height: f64,
}

/// Engine-side state for one open popover, alongside its window record.
#[derive(Debug, Clone)]
pub struct PopoverRecord {
    pub id: String,
    pub label: String,
    pub anchor: Rect,
    pub align: PopoverAlign,
    pub offset_y: f64,
    pub max_height: f64,
    pub exclusive: Exclusive,
    /// Native id of the monitor the popover opened on; if that display goes
    /// away the popover is closed.
    pub monitor_id: u32,
}
