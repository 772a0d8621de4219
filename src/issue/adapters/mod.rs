//! Adapter implementations for issue store ports.

pub mod memory;
pub mod postgres;
