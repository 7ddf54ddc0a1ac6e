//! Generation - construction of room instances from placed plans

mod room;

pub use room::*;
