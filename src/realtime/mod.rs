//! Real-time channel delivery.
//!
//! Three channel families exist: one per chat room, one per notification
//! recipient and one per issue. Delivery is fire-and-forget: an event
//! reaches whoever is subscribed at publish time, nothing is acknowledged,
//! replayed or retried, and a reconnecting client recovers history from
//! durable state instead.

pub mod channel;
pub mod event;
pub mod frame;
pub mod hub;

pub use channel::ChannelKey;
pub use event::{
    ChatMessagePayload, CommentPayload, IssueUpdate, NotificationPayload, OutboundEvent,
};
pub use frame::{ChatFrame, FrameError, IssueFrame, NotificationFrame, parse_frame};
pub use hub::{ChannelHub, LivePublisher, Subscription};

#[cfg(test)]
mod tests;
