//! Systems - passes that operate on the scene arena

mod transforms;

pub use transforms::*;
