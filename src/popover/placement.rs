//! Anchored placement for popover panels.
//!
//! Pure math: given the anchor, the requested size, and the monitor under the
//! anchor, compute where the panel goes and how tall it may grow.

use super::PopoverAlign;
use crate::constants::geometry::MIN_POPOVER_HEIGHT;
use crate::geometry::Rect;
use crate::monitor::Monitor;

/// A resolved popover placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverPlacement {
    pub rect: Rect,
    /// Space from the panel's top edge to the monitor bottom, floored at
    /// [`MIN_POPOVER_HEIGHT`]. The panel's height never exceeds this.
    pub max_height: f64,
}

/// Places a panel of the requested size below the anchor.
///
/// The horizontal origin follows `align` and is clamped into the monitor; the
/// vertical origin is the anchor's bottom edge plus `offset_y`, likewise
/// clamped. An off-screen anchor is not an error, the panel just hugs the
/// nearest monitor edge.
#[must_use]
pub fn place(
    anchor: Rect,
    width: f64,
    height: f64,
    align: PopoverAlign,
    offset_y: f64,
    monitor: &Monitor,
) -> PopoverPlacement {
    let top = anchor.bottom() + offset_y;
    let max_height = (monitor.y + monitor.height - top).max(MIN_POPOVER_HEIGHT);
    let height = height.min(max_height);

    let x = match align {
        PopoverAlign::Start => anchor.x,
        PopoverAlign::Center => anchor.x + (anchor.width - width) / 2.0,
        PopoverAlign::End => anchor.x + anchor.width - width,
    };

    let x = x.max(monitor.x).min(monitor.x + monitor.width - width);
    let y = top.max(monitor.y).min(monitor.y + monitor.height - height);

    PopoverPlacement {
        rect: Rect::new(x, y, width, height),
        max_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor_1440x900() -> Monitor {
        Monitor {
            id: 1,
            name: "built-in".to_string(),
            width: 1440.0,
            height: 900.0,
            x: 0.0,
            y: 0.0,
            scale_factor: 2.0,
            primary: true,
        }
    }

    #[test]
    fn test_center_alignment_clamps_to_left_edge() {
        let anchor = Rect::new(100.0, 40.0, 24.0, 24.0);
        let placement = place(
            anchor,
            340.0,
            420.0,
            PopoverAlign::Center,
            8.0,
            &monitor_1440x900(),
        );

        // Centered x would be 100 + 12 - 170 = -58, clamped to 0.
        assert_eq!(placement.rect, Rect::new(0.0, 72.0, 340.0, 420.0));
        assert_eq!(placement.max_height, 828.0);
    }

    #[test]
    fn test_start_alignment_at_right_edge_clamps_panel_inside() {
        let monitor = monitor_1440x900();
        let anchor = Rect::new(1440.0, 40.0, 0.0, 24.0);
        let placement = place(anchor, 340.0, 200.0, PopoverAlign::Start, 8.0, &monitor);

        assert_eq!(placement.rect.right(), 1440.0);
    }

    #[test]
    fn test_end_alignment_places_right_edges_flush() {
        let anchor = Rect::new(1000.0, 40.0, 24.0, 24.0);
        let placement = place(
            anchor,
            340.0,
            200.0,
            PopoverAlign::End,
            8.0,
            &monitor_1440x900(),
        );
        assert_eq!(placement.rect.x, 1024.0 - 340.0);
    }

    #[test]
    fn test_vertical_origin_below_anchor() {
        let anchor = Rect::new(200.0, 40.0, 24.0, 24.0);
        let placement = place(
            anchor,
            340.0,
            200.0,
            PopoverAlign::Start,
            8.0,
            &monitor_1440x900(),
        );
        assert_eq!(placement.rect.y, 72.0);
    }

    #[test]
    fn test_max_height_never_below_floor() {
        // Anchor so far down that the remaining space is negative.
        let anchor = Rect::new(200.0, 890.0, 24.0, 24.0);
        let placement = place(
            anchor,
            340.0,
            420.0,
            PopoverAlign::Start,
            8.0,
            &monitor_1440x900(),
        );
        assert_eq!(placement.max_height, MIN_POPOVER_HEIGHT);
        assert!(placement.rect.height <= MIN_POPOVER_HEIGHT);
    }

    #[test]
    fn test_requested_height_clamped_to_available_space() {
        let anchor = Rect::new(200.0, 700.0, 24.0, 24.0);
        let placement = place(
            anchor,
            340.0,
            420.0,
            PopoverAlign::Start,
            8.0,
            &monitor_1440x900(),
        );
        // 900 - 732 = 168 available; requested 420 gets cut.
        assert_eq!(placement.max_height, 168.0);
        assert_eq!(placement.rect.height, 168.0);
    }

    #[test]
    fn test_secondary_monitor_offsets_apply() {
        let monitor = Monitor {
            id: 2,
            name: "side".to_string(),
            width: 1920.0,
            height: 1080.0,
            x: 2560.0,
            y: 0.0,
            scale_factor: 1.0,
            primary: false,
        };
        let anchor = Rect::new(2600.0, 40.0, 24.0, 24.0);
        let placement = place(anchor, 340.0, 200.0, PopoverAlign::Start, 8.0, &monitor);

        assert_eq!(placement.rect.x, 2600.0);
        assert_eq!(placement.rect.y, 72.0);
        assert_eq!(placement.max_height, 1008.0);
    }
}
