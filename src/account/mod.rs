//! Citizen accounts, profiles and follow relationships.
//!
//! Registering a user always creates the matching citizen profile in the
//! same write. Following another citizen notifies them; unfollowing is
//! silent. The module follows hexagonal architecture:
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
