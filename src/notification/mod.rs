//! Notification records and activity fan-out.
//!
//! Every successful social action produces an [`domain::Activity`]; the
//! fan-out service turns it into a durable [`domain::Notification`] for
//! the recipient and pushes it on the recipient's live channel. Self
//! actions never notify.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
