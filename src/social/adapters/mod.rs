//! Adapter implementations for engagement ports.

pub mod memory;
