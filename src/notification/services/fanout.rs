//! Activity fan-out: durable notification record plus best-effort push.

use crate::account::{domain::UserId, ports::AccountRepository};
use crate::notification::{
    domain::{Activity, Notification},
    ports::{ActivityNotifier, NotificationRepository, NotifierError, NotifierResult},
};
use crate::realtime::{ChannelKey, LivePublisher, NotificationPayload, OutboundEvent};
use async_trait::async_trait;
use minijinja::{Environment, context};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Default [`ActivityNotifier`] implementation.
///
/// The notification is appended before anything is pushed; a push that
/// reaches nobody is not an error.
pub struct NotificationFanout<N, A, P, C>
where
    N: NotificationRepository + ?Sized,
    A: AccountRepository + ?Sized,
    P: LivePublisher + ?Sized,
    C: Clock + Send + Sync,
{
    notifications: Arc<N>,
    accounts: Arc<A>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<N, A, P, C> NotificationFanout<N, A, P, C>
where
    N: NotificationRepository + ?Sized,
    A: AccountRepository + ?Sized,
    P: LivePublisher + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a fan-out over the given stores and publisher.
    #[must_use]
    pub const fn new(
        notifications: Arc<N>,
        accounts: Arc<A>,
        publisher: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            notifications,
            accounts,
            publisher,
            clock,
        }
    }

    async fn render(&self, activity: &Activity) -> NotifierResult<String> {
        let sender = self
            .accounts
            .find_user(activity.actor())
            .await?
            .ok_or(NotifierError::UnknownSender(activity.actor()))?;
        let event = activity.event();
        Environment::new()
            .render_str(
                event.template(),
                context! {
                    sender => sender.username().as_str(),
                    title => event.title(),
                },
            )
            .map_err(|err| NotifierError::Render(err.to_string()))
    }
}

#[async_trait]
impl<N, A, P, C> ActivityNotifier for NotificationFanout<N, A, P, C>
where
    N: NotificationRepository + ?Sized,
    A: AccountRepository + ?Sized,
    P: LivePublisher + ?Sized,
    C: Clock + Send + Sync,
{
    async fn notify(&self, activity: Activity) -> NotifierResult<Option<Notification>> {
        if activity.is_self_directed() {
            debug!(
                user = %activity.actor(),
                kind = activity.event().kind().as_str(),
                "self-directed activity suppressed"
            );
            return Ok(None);
        }

        let text = self.render(&activity).await?;
        let event = activity.event();
        let notification = Notification::new(
            activity.recipient(),
            activity.actor(),
            event.kind(),
            event.links(),
            text,
            &*self.clock,
        )?;
        self.notifications.append(&notification).await?;

        let delivered = self.publisher.publish(
            &ChannelKey::Notifications(notification.recipient()),
            &OutboundEvent::Notification(NotificationPayload::from(&notification)),
        );
        debug!(
            notification = %notification.id(),
            recipient = %notification.recipient(),
            kind = notification.kind().as_str(),
            delivered,
            "notification recorded"
        );
        Ok(Some(notification))
    }

    fn announce(&self, channel: &ChannelKey, event: &OutboundEvent) -> usize {
        self.publisher.publish(channel, event)
    }

    fn revoke(&self, channel: &ChannelKey, member: UserId) -> usize {
        self.publisher.evict(channel, member)
    }
}
