//! Step definitions for issue resolution scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
