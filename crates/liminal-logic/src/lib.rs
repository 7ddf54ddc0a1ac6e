//! Pure floor and puzzle logic for Liminal.
//!
//! This crate contains all game logic that is independent of any scene
//! graph, physics backend, or renderer. Functions take plain data and return
//! results, making them unit-testable and reusable from the engine crate,
//! the headless harness, and any future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`color`] | Additive RGB math, proximity mix weights |
//! | [`config`] | Tuning values (commit delay, mixing, tolerances) from JSON |
//! | [`constants`] | Layout names and authored dimensions |
//! | [`geometry`] | Vectors, floor rectangles, directions, quarter turns |
//! | [`layout`] | Room templates and the compiled-in layout table |
//! | [`openings`] | Splitting perimeter walls around doorways |
//! | [`placement`] | Next-room selection and doorway alignment |
//! | [`plan`] | Layouts resolved to concrete geometry, rotation |
//! | [`puzzle`] | Pickup lights, color mixing, color sensors |
//! | [`timer`] | Cancellable generation-counted commit timer |
//! | [`validation`] | Layout table checks (doorways, zones, fixtures) |
//! | [`zone`] | Doorway trigger zones and the per-sample scan |

pub mod color;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod layout;
pub mod openings;
pub mod placement;
pub mod plan;
pub mod puzzle;
pub mod timer;
pub mod validation;
pub mod zone;
