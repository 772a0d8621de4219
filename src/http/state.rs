//! Shared application state wired from ports and adapters.

use crate::account::{
    adapters::{memory::InMemoryAccountRepository, postgres::PostgresAccountRepository},
    ports::AccountRepository,
    services::AccountService,
};
use crate::chat::{
    adapters::memory::InMemoryChatRepository, ports::ChatRepository, services::ChatService,
};
use crate::config::AppConfig;
use crate::issue::{
    adapters::{
        memory::InMemoryIssueStore,
        postgres::{IssuePgPool, PostgresIssueStore},
    },
    ports::IssueStore,
    services::{IssueReportingService, LeaderService, ResolutionService},
};
use crate::moderation::{ContentClassifier, KeywordClassifier};
use crate::notification::{
    adapters::{
        memory::InMemoryNotificationRepository, postgres::PostgresNotificationRepository,
    },
    ports::{ActivityNotifier, NotificationRepository},
    services::{InboxService, NotificationFanout},
};
use crate::realtime::ChannelHub;
use crate::social::{
    adapters::memory::InMemoryEngagementRepository, ports::EngagementRepository,
    services::EngagementService,
};
use mockable::DefaultClock;
use std::ops::Deref;
use std::sync::Arc;

/// Account operations as wired into the HTTP surface.
pub type AccountApi = AccountService<dyn AccountRepository, dyn ActivityNotifier, DefaultClock>;
/// Leader operations as wired into the HTTP surface.
pub type LeaderApi = LeaderService<dyn IssueStore, dyn AccountRepository, DefaultClock>;
/// Issue submission and browsing as wired into the HTTP surface.
pub type ReportingApi = IssueReportingService<
    dyn IssueStore,
    dyn AccountRepository,
    dyn ContentClassifier,
    dyn ActivityNotifier,
    DefaultClock,
>;
/// Resolution operations as wired into the HTTP surface.
pub type ResolutionApi = ResolutionService<dyn IssueStore, dyn ActivityNotifier, DefaultClock>;
/// Social operations as wired into the HTTP surface.
pub type EngagementApi = EngagementService<
    dyn IssueStore,
    dyn EngagementRepository,
    dyn AccountRepository,
    dyn ActivityNotifier,
    DefaultClock,
>;
/// Inbox operations as wired into the HTTP surface.
pub type InboxApi = InboxService<dyn NotificationRepository>;
/// Chat operations as wired into the HTTP surface.
pub type ChatApi =
    ChatService<dyn ChatRepository, dyn AccountRepository, dyn ActivityNotifier, DefaultClock>;

/// Storage ports backing the services.
#[derive(Clone)]
pub struct Stores {
    /// Users, profiles and follows.
    pub accounts: Arc<dyn AccountRepository>,
    /// Issues, leaders and hashtags.
    pub issues: Arc<dyn IssueStore>,
    /// Likes, bookmarks and comments.
    pub engagement: Arc<dyn EngagementRepository>,
    /// Durable notifications.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Chat rooms and messages.
    pub chats: Arc<dyn ChatRepository>,
}

impl Stores {
    /// Stores kept entirely in process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            issues: Arc::new(InMemoryIssueStore::new()),
            engagement: Arc::new(InMemoryEngagementRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            chats: Arc::new(InMemoryChatRepository::new()),
        }
    }

    /// Issues, accounts and notifications in `PostgreSQL`; engagement and
    /// chat in memory.
    #[must_use]
    pub fn with_postgres(pool: IssuePgPool) -> Self {
        Self {
            accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
            issues: Arc::new(PostgresIssueStore::new(pool)),
            ..Self::in_memory()
        }
    }
}

/// Services shared by every handler and socket.
pub struct AppServices {
    /// Account operations.
    pub accounts: AccountApi,
    /// Leader registration and ranking.
    pub leaders: LeaderApi,
    /// Issue submission and browsing.
    pub reporting: ReportingApi,
    /// Leader resolution and citizen confirmation.
    pub resolution: ResolutionApi,
    /// Likes, bookmarks and comments.
    pub engagement: EngagementApi,
    /// Notification listing and acknowledgement.
    pub inbox: InboxApi,
    /// Chat rooms and messages.
    pub chat: ChatApi,
    /// Live channel registry.
    pub hub: ChannelHub,
}

/// Cloneable handle to [`AppServices`] used as axum router state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppServices>,
}

impl AppState {
    /// Wires every service over `stores`.
    #[must_use]
    pub fn new(stores: Stores, classifier: Arc<dyn ContentClassifier>, hub: ChannelHub) -> Self {
        let clock = Arc::new(DefaultClock);
        let notifier: Arc<dyn ActivityNotifier> = Arc::new(NotificationFanout::new(
            Arc::clone(&stores.notifications),
            Arc::clone(&stores.accounts),
            Arc::new(hub.clone()),
            Arc::clone(&clock),
        ));
        let services = AppServices {
            accounts: AccountService::new(
                Arc::clone(&stores.accounts),
                Arc::clone(&notifier),
                Arc::clone(&clock),
            ),
            leaders: LeaderService::new(
                Arc::clone(&stores.issues),
                Arc::clone(&stores.accounts),
                Arc::clone(&clock),
            ),
            reporting: IssueReportingService::new(
                Arc::clone(&stores.issues),
                Arc::clone(&stores.accounts),
                classifier,
                Arc::clone(&notifier),
                Arc::clone(&clock),
            ),
            resolution: ResolutionService::new(
                Arc::clone(&stores.issues),
                Arc::clone(&notifier),
                Arc::clone(&clock),
            ),
            engagement: EngagementService::new(
                Arc::clone(&stores.issues),
                Arc::clone(&stores.engagement),
                Arc::clone(&stores.accounts),
                Arc::clone(&notifier),
                Arc::clone(&clock),
            ),
            inbox: InboxService::new(Arc::clone(&stores.notifications)),
            chat: ChatService::new(stores.chats, stores.accounts, notifier, clock),
            hub,
        };
        Self {
            inner: Arc::new(services),
        }
    }

    /// Builds state over `stores` using the configured classifier and hub.
    #[must_use]
    pub fn from_config(config: &AppConfig, stores: Stores) -> Self {
        Self::new(
            stores,
            Arc::new(KeywordClassifier::new(&config.moderation)),
            ChannelHub::new(config.realtime.channel_capacity),
        )
    }

    /// Builds state over in-memory stores.
    #[must_use]
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::from_config(config, Stores::in_memory())
    }
}

impl Deref for AppState {
    type Target = AppServices;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
