//! Layout table validation.
//!
//! Pure functions that take layouts and return validation errors. A
//! malformed layout is a configuration error: these checks run from tests
//! and from the simtest harness, never per tick.

use crate::constants::ALIGN_EPSILON;
use crate::geometry::{Direction, Point2};
use crate::layout::{Layout, LayoutTable};
use serde::Serialize;
use std::collections::HashSet;

/// A layout validation error.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl ValidationError {
    fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

// ── A. Room shell ───────────────────────────────────────────────────────

/// Check that the room has positive width, height and depth.
pub fn check_dimensions(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if layout.width <= 0.0 || layout.height <= 0.0 || layout.depth <= 0.0 {
        errors.push(ValidationError::error(
            "dimensions",
            format!(
                "Layout '{}' has non-positive dimensions: {}×{}×{}",
                layout.name, layout.width, layout.height, layout.depth
            ),
        ));
    }
    errors
}

/// Check that every doorway lies entirely within its wall.
pub fn check_doorways_within_walls(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, door) in layout.doorways.iter().enumerate() {
        let length = layout.wall_length(door.side);
        let start = door.offset - door.width / 2.0;
        let end = door.offset + door.width / 2.0;
        if door.width <= 0.0 {
            errors.push(ValidationError::error(
                "doorways",
                format!("Layout '{}' doorway {i} has width {}", layout.name, door.width),
            ));
        } else if start < -ALIGN_EPSILON || end > length + ALIGN_EPSILON {
            errors.push(ValidationError::error(
                "doorways",
                format!(
                    "Layout '{}' doorway {i} spans {start}..{end} outside the {} wall (length {length})",
                    layout.name, door.side
                ),
            ));
        }
    }
    errors
}

// ── B. Zones ────────────────────────────────────────────────────────────

/// Check that each zone's direction names a side with a doorway centred on
/// the zone's opening.
pub fn check_zone_doorways(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, zone) in layout.zones.iter().enumerate() {
        let backed = layout
            .doorways
            .iter()
            .filter(|d| d.side == zone.direction)
            .any(|d| {
                layout
                    .point_on_wall(d.side, d.offset)
                    .approx_eq(&zone.opening_center, ALIGN_EPSILON)
            });
        if !backed {
            errors.push(ValidationError::error(
                "zones",
                format!(
                    "Layout '{}' zone {i} faces {} but no doorway is centred on ({}, {})",
                    layout.name, zone.direction, zone.opening_center.x, zone.opening_center.z
                ),
            ));
        }
    }
    errors
}

/// Check that zone volumes stay inside the footprint.
pub fn check_zones_within_footprint(layout: &Layout) -> Vec<ValidationError> {
    let footprint = layout.footprint().expanded(ALIGN_EPSILON);
    let mut errors = Vec::new();
    for (i, zone) in layout.zones.iter().enumerate() {
        let corners = [Point2::new(zone.from.x, zone.from.z), Point2::new(zone.to.x, zone.to.z)];
        if corners.iter().any(|c| !footprint.contains_xz(c.x, c.z)) {
            errors.push(ValidationError::error(
                "zones",
                format!("Layout '{}' zone {i} extends outside the room", layout.name),
            ));
        }
        if zone.from.y > zone.to.y.max(0.0) || zone.to.y <= 0.0 {
            errors.push(ValidationError::warning(
                "zones",
                format!("Layout '{}' zone {i} has no height above the floor", layout.name),
            ));
        }
    }
    errors
}

// ── C. Fixtures ─────────────────────────────────────────────────────────

/// Check that lights and models are placed inside the room.
pub fn check_fixtures_within_footprint(layout: &Layout) -> Vec<ValidationError> {
    let footprint = layout.footprint().expanded(ALIGN_EPSILON);
    let mut errors = Vec::new();
    for (i, light) in layout.lights.iter().enumerate() {
        if !footprint.contains_xz(light.x, light.z) {
            errors.push(ValidationError::error(
                "lights",
                format!(
                    "Layout '{}' light {i} at ({}, {}) is outside the room",
                    layout.name, light.x, light.z
                ),
            ));
        }
    }
    for model in &layout.models {
        if !footprint.contains_xz(model.position.x, model.position.z) {
            errors.push(ValidationError::warning(
                "models",
                format!("Layout '{}' model {} is outside the room", layout.name, model.path),
            ));
        }
    }
    errors
}

// ── D. Table ────────────────────────────────────────────────────────────

/// Check that no two layouts share a name.
pub fn check_unique_names(table: &LayoutTable) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    table
        .layouts()
        .iter()
        .filter(|l| !seen.insert(l.name.as_str()))
        .map(|l| {
            ValidationError::error("table", format!("Layout name '{}' is used twice", l.name))
        })
        .collect()
}

/// Check that the exit layout exists and can be attached.
pub fn check_exit_layout(table: &LayoutTable) -> Vec<ValidationError> {
    match table.exit_layout() {
        None => vec![ValidationError::error(
            "table",
            format!("Exit layout '{}' is not in the table", table.exit_layout_name()),
        )],
        Some(exit) if exit.zones.is_empty() => vec![ValidationError::error(
            "table",
            format!("Exit layout '{}' has no zones", exit.name),
        )],
        Some(_) => Vec::new(),
    }
}

/// Check that at least two non-exit layouts exist, so a room can always be
/// followed by a different one.
pub fn check_enough_layouts(table: &LayoutTable) -> Vec<ValidationError> {
    let exit = table.exit_layout_name();
    let regular = table
        .layouts()
        .iter()
        .filter(|l| l.name != exit && !l.zones.is_empty())
        .count();
    if regular < 2 {
        vec![ValidationError::warning(
            "table",
            format!("Only {regular} attachable non-exit layout(s); spawns may be skipped"),
        )]
    } else {
        Vec::new()
    }
}

// ── Master validation ───────────────────────────────────────────────────

pub fn validate_layout(layout: &Layout) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_dimensions(layout));
    all.extend(check_doorways_within_walls(layout));
    all.extend(check_zone_doorways(layout));
    all.extend(check_zones_within_footprint(layout));
    all.extend(check_fixtures_within_footprint(layout));
    all
}

pub fn validate_table(table: &LayoutTable) -> Vec<ValidationError> {
    let mut all: Vec<ValidationError> = table.layouts().iter().flat_map(validate_layout).collect();
    all.extend(check_unique_names(table));
    all.extend(check_exit_layout(table));
    all.extend(check_enough_layouts(table));
    all
}

/// Count of errors (warnings excluded).
pub fn error_count(errors: &[ValidationError]) -> usize {
    errors
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::layout::Doorway;

    #[test]
    fn builtin_table_is_clean() {
        let errors = validate_table(&LayoutTable::builtin());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn zero_depth_is_rejected() {
        let layout = Layout::new("flat", 4.0, 0.0);
        assert_eq!(check_dimensions(&layout).len(), 1);
    }

    #[test]
    fn doorway_past_wall_end_is_rejected() {
        let layout = Layout::new("t", 4.0, 4.0).with_door(Direction::North, 3.5);
        let errors = check_doorways_within_walls(&layout);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "doorways");
    }

    #[test]
    fn zone_without_doorway_is_rejected() {
        let mut layout = Layout::new("t", 8.0, 8.0).with_door(Direction::East, 4.0);
        layout.doorways[0] = Doorway {
            side: Direction::West,
            offset: 4.0,
            width: 2.0,
        };
        let errors = check_zone_doorways(&layout);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("east"));
    }

    #[test]
    fn off_centre_doorway_is_rejected() {
        let mut layout = Layout::new("t", 8.0, 8.0).with_door(Direction::South, 4.0);
        layout.doorways[0].offset = 5.0;
        assert_eq!(check_zone_doorways(&layout).len(), 1);
    }

    #[test]
    fn light_outside_room_is_rejected() {
        let layout = Layout::new("t", 8.0, 8.0).with_light(9.0, 1.0, false);
        let errors = check_fixtures_within_footprint(&layout);
        assert_eq!(error_count(&errors), 1);
    }

    #[test]
    fn model_outside_room_is_a_warning() {
        let layout = Layout::new("t", 8.0, 8.0).with_model("m.glb", -1.0, 1.0, 0.0);
        let errors = check_fixtures_within_footprint(&layout);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Warning);
    }

    #[test]
    fn zone_outside_room_is_rejected() {
        let mut layout = Layout::new("t", 8.0, 8.0).with_door(Direction::North, 4.0);
        layout.zones[0].from = Vec3::new(3.0, 0.0, -1.0);
        assert_eq!(error_count(&check_zones_within_footprint(&layout)), 1);
    }

    #[test]
    fn duplicate_names_and_missing_exit() {
        let table = LayoutTable::new(
            vec![Layout::new("a", 4.0, 4.0), Layout::new("a", 4.0, 4.0)],
            "exit",
        );
        assert_eq!(check_unique_names(&table).len(), 1);
        assert_eq!(check_exit_layout(&table).len(), 1);
    }

    #[test]
    fn zoneless_exit_is_rejected() {
        let table = LayoutTable::new(vec![Layout::new("exit", 4.0, 4.0)], "exit");
        let errors = check_exit_layout(&table);
        assert!(errors[0].message.contains("no zones"));
    }
}
