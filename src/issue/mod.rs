//! Issue reporting and two-step resolution.
//!
//! A citizen submits a location-tagged issue and tags the leader
//! responsible for it. The tagged leader marks it resolved, the citizen
//! confirms, and only when both flags are set does the issue become
//! solved and the leader's solved counter increment. Status is always
//! derived from the two flags by a pure function; the flag change, the
//! derived status and the counter increment are committed as one
//! versioned write. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
