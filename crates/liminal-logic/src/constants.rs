//! Fixed constants for the compiled-in layout table.
//!
//! Tunable gameplay values (commit delay, mixing thresholds, tolerances)
//! live in [`crate::config`]; these are the dimensions the layout data is
//! authored against.

pub mod layout_names {
    pub const MAIN: &str = "main";
    pub const SECONDARY: &str = "secondary";
    pub const CORRIDOR: &str = "corridor";
    pub const PILLARS: &str = "pillars";
    pub const EXIT: &str = "exit";
}

/// Standard ceiling height of every room (meters).
pub const ROOM_HEIGHT: f32 = 3.0;

/// Width of every doorway opening. Matching widths keep seams gap-free.
pub const DOOR_WIDTH: f32 = 2.0;

/// How far a doorway trigger zone reaches into its room.
pub const ZONE_DEPTH: f32 = 1.5;

/// Default thickness of perimeter walls.
pub const WALL_THICKNESS: f32 = 0.2;

/// Floating-point tolerance for layout alignment checks.
pub const ALIGN_EPSILON: f32 = 1e-4;
