//! Civic Resolve: civic issue reporting and resolution tracking.
//!
//! Citizens report location-tagged issues and tag the leader responsible
//! for them. The tagged leader marks an issue resolved, the reporting
//! citizen confirms it, and only then is the issue solved and credited to
//! the leader. A social layer of likes, comments, hashtags, follows, chat
//! and notifications sits on top, with live delivery over WebSocket
//! channels.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`)
//! - **Services**: Orchestration of domain rules over ports
//!
//! # Modules
//!
//! - [`account`]: Users, citizen profiles and follows
//! - [`issue`]: Issue submission, the resolution state machine, leaders
//!   and hashtags
//! - [`social`]: Likes, bookmarks, comments and replies
//! - [`notification`]: Durable notifications and live fan-out
//! - [`chat`]: Chat rooms and messages
//! - [`realtime`]: Channel keys, socket frames and the broadcast hub
//! - [`moderation`]: Pluggable content classification
//! - [`http`]: JSON and WebSocket surface built on `axum`
//! - [`config`]: Application configuration
//! - [`telemetry`]: Logging initialisation

mod id;

pub mod account;
pub mod chat;
pub mod config;
pub mod http;
pub mod issue;
pub mod moderation;
pub mod notification;
pub mod realtime;
pub mod social;
pub mod telemetry;

#[cfg(test)]
mod test_support;
