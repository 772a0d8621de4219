//! Adapter implementations for notification ports.

pub mod memory;
pub mod postgres;
