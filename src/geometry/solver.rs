//! Position descriptor solver.
//!
//! Resolves a [`PositionDescriptor`] against a monitor table into an absolute
//! rectangle. The solver is deterministic: same inputs, same outputs.

use super::position::PositionDescriptor;
use super::Rect;
use crate::error::PanelError;
use crate::monitor::Monitor;

/// A solved placement: the absolute rectangle and the monitor it lives on.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub monitor: Monitor,
}

/// Resolves a descriptor against a monitor table.
///
/// The monitor is selected by name, with the primary used when the field is
/// absent, equals `"primary"`, or names a display that is not present. Each
/// axis is then solved independently; an axis with no soluble field
/// combination, or one whose solved origin falls outside the monitor, fails
/// the whole descriptor.
///
/// # Errors
///
/// [`PanelError::NoDisplays`] for an empty table,
/// [`PanelError::UnresolvablePosition`] when an axis cannot be solved.
pub fn solve(position: &PositionDescriptor, monitors: &[Monitor]) -> Result<Placement, PanelError> {
    let monitor = select_monitor(position.monitor.as_deref(), monitors)?;

    let (x_local, width) = solve_axis(
        position.left,
        position.right,
        position.width,
        monitor.width,
        "horizontal",
    )?;
    let (y_local, height) = solve_axis(
        position.top,
        position.bottom,
        position.height,
        monitor.height,
        "vertical",
    )?;

    Ok(Placement {
        rect: Rect::new(monitor.x + x_local, monitor.y + y_local, width, height),
        monitor: monitor.clone(),
    })
}

/// Picks the monitor a descriptor is relative to.
fn select_monitor<'a>(
    name: Option<&str>,
    monitors: &'a [Monitor],
) -> Result<&'a Monitor, PanelError> {
    if monitors.is_empty() {
        return Err(PanelError::NoDisplays);
    }

    let primary = monitors.iter().find(|m| m.primary).unwrap_or(&monitors[0]);

    match name {
        None | Some("primary") => Ok(primary),
        Some(name) => Ok(monitors.iter().find(|m| m.name == name).unwrap_or(primary)),
    }
}

/// Solves one axis into `(local_origin, extent)`.
///
/// Combinations are tried in order: edge pair, leading edge + extent,
/// trailing edge + extent, leading edge alone, trailing edge alone, extent
/// alone (centered). Extents are floored at one logical pixel; an origin
/// outside the monitor is unresolvable.
fn solve_axis(
    leading: Option<f64>,
    trailing: Option<f64>,
    extent: Option<f64>,
    monitor_extent: f64,
    axis: &str,
) -> Result<(f64, f64), PanelError> {
    let (origin, extent) = match (leading, trailing, extent) {
        (Some(lead), Some(trail), _) => (lead, monitor_extent - lead - trail),
        (Some(lead), None, Some(size)) => (lead, size),
        (None, Some(trail), Some(size)) => (monitor_extent - trail - size, size),
        (Some(lead), None, None) => (lead, monitor_extent - lead),
        (None, Some(trail), None) => (0.0, monitor_extent - trail),
        (None, None, Some(size)) => ((monitor_extent - size) / 2.0, size),
        (None, None, None) => {
            return Err(PanelError::UnresolvablePosition(format!(
                "{axis} axis has no fields"
            )));
        }
    };

    if origin < 0.0 || origin > monitor_extent {
        return Err(PanelError::UnresolvablePosition(format!(
            "{axis} origin {origin} outside monitor extent {monitor_extent}"
        )));
    }

    Ok((origin, extent.max(1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: u32, name: &str, x: f64, y: f64, width: f64, height: f64) -> Monitor {
        Monitor {
            id,
            name: name.to_string(),
            width,
            height,
            x,
            y,
            scale_factor: 2.0,
            primary: id == 1,
        }
    }

    fn single_1440x900() -> Vec<Monitor> {
        vec![monitor(1, "built-in", 0.0, 0.0, 1440.0, 900.0)]
    }

    fn descriptor(fields: &[(&str, f64)]) -> PositionDescriptor {
        let mut position = PositionDescriptor::default();
        for (field, value) in fields {
            match *field {
                "top" => position.top = Some(*value),
                "bottom" => position.bottom = Some(*value),
                "left" => position.left = Some(*value),
                "right" => position.right = Some(*value),
                "width" => position.width = Some(*value),
                "height" => position.height = Some(*value),
                _ => unreachable!(),
            }
        }
        position
    }

    #[test]
    fn test_edge_pair_stretches_between_edges() {
        let position =
            descriptor(&[("top", 9.0), ("left", 20.0), ("right", 20.0), ("height", 60.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(20.0, 9.0, 1400.0, 60.0));
        assert_eq!(placement.monitor.name, "built-in");
    }

    #[test]
    fn test_trailing_edge_plus_extent() {
        let position =
            descriptor(&[("right", 10.0), ("width", 200.0), ("top", 0.0), ("height", 40.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(1230.0, 0.0, 200.0, 40.0));
    }

    #[test]
    fn test_bottom_plus_height_anchors_to_bottom() {
        let position =
            descriptor(&[("bottom", 10.0), ("height", 60.0), ("left", 0.0), ("right", 0.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(0.0, 830.0, 1440.0, 60.0));
    }

    #[test]
    fn test_lone_leading_edge_stretches_to_far_side() {
        let position = descriptor(&[("left", 100.0), ("top", 0.0), ("height", 40.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(100.0, 0.0, 1340.0, 40.0));
    }

    #[test]
    fn test_lone_trailing_edge_spans_from_origin() {
        let position = descriptor(&[("right", 240.0), ("top", 0.0), ("height", 40.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(0.0, 0.0, 1200.0, 40.0));
    }

    #[test]
    fn test_lone_extents_center_on_monitor() {
        let position = descriptor(&[("width", 400.0), ("height", 300.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(520.0, 300.0, 400.0, 300.0));
    }

    #[test]
    fn test_edge_pair_wins_over_extra_extent() {
        // Over-specified axis: the edge pair takes precedence.
        let position = descriptor(&[
            ("left", 10.0),
            ("right", 10.0),
            ("width", 50.0),
            ("top", 0.0),
            ("height", 40.0),
        ]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect.width, 1420.0);
    }

    #[test]
    fn test_empty_axis_is_unresolvable() {
        let position = descriptor(&[("top", 0.0), ("height", 40.0)]);
        let result = solve(&position, &single_1440x900());
        assert!(matches!(result, Err(PanelError::UnresolvablePosition(_))));
    }

    #[test]
    fn test_origin_beyond_monitor_is_unresolvable() {
        let position = descriptor(&[("left", 2000.0), ("width", 40.0), ("top", 0.0), ("height", 40.0)]);
        let result = solve(&position, &single_1440x900());
        assert!(matches!(result, Err(PanelError::UnresolvablePosition(_))));
    }

    #[test]
    fn test_centered_extent_wider_than_monitor_is_unresolvable() {
        let position = descriptor(&[("width", 2000.0), ("height", 40.0)]);
        let result = solve(&position, &single_1440x900());
        assert!(matches!(result, Err(PanelError::UnresolvablePosition(_))));
    }

    #[test]
    fn test_collapsed_edge_pair_is_floored_to_one_pixel() {
        let position =
            descriptor(&[("left", 800.0), ("right", 800.0), ("top", 0.0), ("height", 40.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect.width, 1.0);
    }

    #[test]
    fn test_named_monitor_offsets_into_virtual_desktop() {
        let monitors = vec![
            monitor(1, "primary-display", 0.0, 0.0, 2560.0, 1440.0),
            monitor(2, "secondary", 2560.0, 0.0, 1920.0, 1080.0),
        ];
        let position = descriptor(&[("top", 0.0), ("left", 0.0), ("right", 0.0), ("height", 40.0)])
            .on_monitor("secondary");
        let placement = solve(&position, &monitors).unwrap();
        assert_eq!(placement.rect, Rect::new(2560.0, 0.0, 1920.0, 40.0));
        assert_eq!(placement.monitor.name, "secondary");
    }

    #[test]
    fn test_missing_named_monitor_falls_back_to_primary() {
        let monitors = single_1440x900();
        let position = descriptor(&[("top", 0.0), ("left", 0.0), ("right", 0.0), ("height", 40.0)])
            .on_monitor("gone");
        let placement = solve(&position, &monitors).unwrap();
        assert_eq!(placement.rect, Rect::new(0.0, 0.0, 1440.0, 40.0));
        assert_eq!(placement.monitor.name, "built-in");
    }

    #[test]
    fn test_primary_sentinel_selects_primary() {
        let monitors = vec![
            monitor(2, "secondary", 2560.0, 0.0, 1920.0, 1080.0),
            monitor(1, "main-display", 0.0, 0.0, 2560.0, 1440.0),
        ];
        let position =
            descriptor(&[("top", 0.0), ("left", 0.0), ("width", 100.0), ("height", 40.0)])
                .on_monitor("primary");
        let placement = solve(&position, &monitors).unwrap();
        assert_eq!(placement.monitor.name, "main-display");
    }

    #[test]
    fn test_empty_monitor_table_is_no_displays() {
        let position = descriptor(&[("width", 100.0), ("height", 100.0)]);
        assert!(matches!(solve(&position, &[]), Err(PanelError::NoDisplays)));
    }

    #[test]
    fn test_fractional_inputs_are_preserved() {
        let position =
            descriptor(&[("top", 9.5), ("left", 20.25), ("width", 100.5), ("height", 60.0)]);
        let placement = solve(&position, &single_1440x900()).unwrap();
        assert_eq!(placement.rect, Rect::new(20.25, 9.5, 100.5, 60.0));
    }

    #[test]
    fn test_solver_is_deterministic() {
        let position =
            descriptor(&[("top", 9.0), ("left", 20.0), ("right", 20.0), ("height", 60.0)]);
        let monitors = single_1440x900();
        let first = solve(&position, &monitors).unwrap();
        let second = solve(&position, &monitors).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_origin_always_inside_monitor() {
        // Sweep a grid of descriptor shapes; every success must land inside
        // the chosen monitor with positive extents.
        let monitors = single_1440x900();
        let edges = [None, Some(0.0), Some(20.0), Some(1500.0)];
        let extents = [None, Some(1.0), Some(400.0), Some(2000.0)];

        for left in edges {
            for right in edges {
                for width in extents {
                    let mut position = descriptor(&[("top", 0.0), ("height", 40.0)]);
                    position.left = left;
                    position.right = right;
                    position.width = width;

                    if let Ok(placement) = solve(&position, &monitors) {
                        let m = &placement.monitor;
                        assert!(placement.rect.width >= 1.0);
                        assert!(placement.rect.height >= 1.0);
                        assert!(placement.rect.x >= m.x);
                        assert!(placement.rect.x <= m.x + m.width);
                    }
                }
            }
        }
    }
}
