//! In-process channel hub built on `tokio::sync::broadcast`.

use super::{ChannelKey, OutboundEvent};
use crate::account::domain::UserId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};
use tracing::{debug, info, warn};

/// Ephemeral fan-out bus.
///
/// Publishing never fails: an event with no subscribers is dropped.
pub trait LivePublisher: Send + Sync {
    /// Pushes `event` to every current member of `channel`.
    ///
    /// Returns the number of subscribers that were handed the event.
    fn publish(&self, channel: &ChannelKey, event: &OutboundEvent) -> usize;

    /// Ends every subscription `member` holds on `channel`.
    ///
    /// Returns the number of subscriptions ended.
    fn evict(&self, channel: &ChannelKey, member: UserId) -> usize;
}

/// Registry of live channels keyed by [`ChannelKey`].
///
/// Channels are created on first subscription and dropped when their last
/// subscriber leaves.
#[derive(Debug, Clone)]
pub struct ChannelHub {
    inner: Arc<HubInner>,
}

#[derive(Debug)]
struct HubInner {
    capacity: usize,
    channels: RwLock<HashMap<ChannelKey, broadcast::Sender<OutboundEvent>>>,
    members: RwLock<HashMap<(ChannelKey, UserId), watch::Sender<bool>>>,
}

impl ChannelHub {
    /// Creates a hub whose channels buffer up to `capacity` events per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                capacity: capacity.max(1),
                channels: RwLock::new(HashMap::new()),
                members: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Joins `channel`, creating it when absent.
    #[must_use]
    pub fn subscribe(&self, channel: ChannelKey) -> Subscription {
        let mut channels = self
            .inner
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let receiver = channels
            .entry(channel)
            .or_insert_with(|| broadcast::channel(self.inner.capacity).0)
            .subscribe();
        debug!(%channel, "joined channel");
        Subscription {
            hub: self.clone(),
            channel,
            receiver: Some(receiver),
            member: None,
            eviction: None,
        }
    }

    /// Joins `channel` on behalf of `member`.
    ///
    /// Unlike [`ChannelHub::subscribe`], the subscription can later be
    /// ended with [`LivePublisher::evict`] when the member loses access.
    #[must_use]
    pub fn subscribe_member(&self, channel: ChannelKey, member: UserId) -> Subscription {
        let mut subscription = self.subscribe(channel);
        let eviction = self
            .inner
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((channel, member))
            .or_insert_with(|| watch::channel(false).0)
            .subscribe();
        subscription.member = Some(member);
        subscription.eviction = Some(eviction);
        subscription
    }

    /// Returns the number of live subscribers of `channel`.
    #[must_use]
    pub fn member_count(&self, channel: &ChannelKey) -> usize {
        self.inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Returns the number of channels with at least one subscriber.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release_member(&self, channel: &ChannelKey, member: UserId) {
        let mut members = self
            .inner
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let key = (*channel, member);
        let is_unused = members
            .get(&key)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if is_unused {
            members.remove(&key);
        }
    }

    fn release(&self, channel: &ChannelKey) {
        let mut channels = self
            .inner
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let is_empty = channels
            .get(channel)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if is_empty {
            channels.remove(channel);
        }
        debug!(%channel, "left channel");
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new(64)
    }
}

impl LivePublisher for ChannelHub {
    fn publish(&self, channel: &ChannelKey, event: &OutboundEvent) -> usize {
        let channels = self
            .inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        channels
            .get(channel)
            .and_then(|sender| sender.send(event.clone()).ok())
            .unwrap_or(0)
    }

    fn evict(&self, channel: &ChannelKey, member: UserId) -> usize {
        let removed = self
            .inner
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(*channel, member));
        let Some(sender) = removed else {
            return 0;
        };
        let ended = sender.receiver_count();
        sender.send_replace(true);
        info!(%channel, member = %member, ended, "member evicted from channel");
        ended
    }
}

/// Membership of one channel; dropping it leaves the channel.
#[derive(Debug)]
pub struct Subscription {
    hub: ChannelHub,
    channel: ChannelKey,
    receiver: Option<broadcast::Receiver<OutboundEvent>>,
    member: Option<UserId>,
    eviction: Option<watch::Receiver<bool>>,
}

impl Subscription {
    /// Returns the joined channel.
    #[must_use]
    pub const fn channel(&self) -> &ChannelKey {
        &self.channel
    }

    /// Waits for the next event.
    ///
    /// Events missed because this subscriber fell behind are skipped.
    /// Returns `None` once the channel is gone or the member was evicted.
    pub async fn recv(&mut self) -> Option<OutboundEvent> {
        loop {
            let receiver = self.receiver.as_mut()?;
            let received = match self.eviction.as_mut() {
                Some(eviction) => tokio::select! {
                    biased;
                    () = evicted(eviction) => None,
                    received = receiver.recv() => Some(received),
                },
                None => Some(receiver.recv().await),
            };
            match received {
                Some(Ok(event)) => return Some(event),
                Some(Err(RecvError::Lagged(skipped))) => {
                    warn!(channel = %self.channel, skipped, "subscriber lagged, events dropped");
                }
                Some(Err(RecvError::Closed)) => return None,
                None => {
                    self.leave();
                    return None;
                }
            }
        }
    }

    fn leave(&mut self) {
        drop(self.eviction.take());
        if let Some(member) = self.member.take() {
            self.hub.release_member(&self.channel, member);
        }
        if self.receiver.take().is_some() {
            self.hub.release(&self.channel);
        }
    }
}

/// Resolves once the member's access to the channel is revoked.
async fn evicted(eviction: &mut watch::Receiver<bool>) {
    loop {
        let revoked = *eviction.borrow_and_update();
        if revoked || eviction.changed().await.is_err() {
            return;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.leave();
    }
}
