//! Direct and group chat rooms.
//!
//! Only participants may read or post in a room. Group rooms are managed
//! by their creator; direct rooms between the same two users are reused.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
