//! Component definitions for the scene arena.
//!
//! Components are pure data attached to scene entities. Rooms own their
//! subtree through the root entity they record.

mod room;
mod scene;

pub use room::*;
pub use scene::*;
