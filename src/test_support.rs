//! Shared in-memory wiring for unit tests.

use crate::account::{
    adapters::memory::InMemoryAccountRepository,
    domain::{CitizenProfile, User, UserId, Username},
    ports::AccountRepository,
};
use crate::chat::adapters::memory::InMemoryChatRepository;
use crate::issue::{
    adapters::memory::InMemoryIssueStore,
    domain::{Issue, IssueDraft, IssueTitle, Leader, Location},
    ports::{IssueRepository, LeaderRepository},
};
use crate::notification::{
    adapters::memory::InMemoryNotificationRepository, domain::Notification,
    ports::NotificationRepository, services::NotificationFanout,
};
use crate::realtime::ChannelHub;
use crate::social::adapters::memory::InMemoryEngagementRepository;
use eyre::Result;
use mockable::DefaultClock;
use std::sync::Arc;

pub(crate) type TestFanout = NotificationFanout<
    InMemoryNotificationRepository,
    InMemoryAccountRepository,
    ChannelHub,
    DefaultClock,
>;

/// In-memory stores, a live hub and the notification fan-out over them.
pub(crate) struct Harness {
    pub accounts: Arc<InMemoryAccountRepository>,
    pub issues: Arc<InMemoryIssueStore>,
    pub engagement: Arc<InMemoryEngagementRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub chats: Arc<InMemoryChatRepository>,
    pub hub: ChannelHub,
    pub notifier: Arc<TestFanout>,
    pub clock: Arc<DefaultClock>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let hub = ChannelHub::new(16);
        let clock = Arc::new(DefaultClock);
        let notifier = Arc::new(NotificationFanout::new(
            Arc::clone(&notifications),
            Arc::clone(&accounts),
            Arc::new(hub.clone()),
            Arc::clone(&clock),
        ));
        Self {
            accounts,
            issues: Arc::new(InMemoryIssueStore::new()),
            engagement: Arc::new(InMemoryEngagementRepository::new()),
            notifications,
            chats: Arc::new(InMemoryChatRepository::new()),
            hub,
            notifier,
            clock,
        }
    }

    /// Registers a user with an empty profile.
    pub(crate) async fn user(&self, username: &str) -> Result<User> {
        let user = User::register(Username::new(username)?, None, &*self.clock);
        let profile = CitizenProfile::for_user(&user, None, &*self.clock);
        self.accounts.store_user(&user, &profile).await?;
        Ok(user)
    }

    /// Registers a leader, optionally operated by `account`.
    pub(crate) async fn leader(&self, name: &str, account: Option<UserId>) -> Result<Leader> {
        let mut leader = Leader::register(name, "Ward Councillor", &*self.clock)?;
        if let Some(account) = account {
            leader = leader.with_account(account);
        }
        self.issues.store_leader(&leader).await?;
        Ok(leader)
    }

    /// Builds an open issue reported by `reporter` and tagged to `leader`
    /// without storing it.
    pub(crate) fn draft_issue(&self, reporter: UserId, leader: &Leader, title: &str) -> Result<Issue> {
        let draft = IssueDraft::new(
            IssueTitle::new(title)?,
            "Reported from the neighbourhood walk",
            Location::new(12.97, 77.59)?,
            reporter,
            leader.id(),
        )?;
        Ok(Issue::submit(draft, &*self.clock))
    }

    /// Stores an open issue reported by `reporter` and tagged to `leader`.
    pub(crate) async fn issue(&self, reporter: UserId, leader: &Leader, title: &str) -> Result<Issue> {
        let issue = self.draft_issue(reporter, leader, title)?;
        self.issues.store(&issue, &[]).await?;
        Ok(issue)
    }

    /// Returns the notifications stored for `recipient`, newest first.
    pub(crate) async fn inbox(&self, recipient: UserId) -> Result<Vec<Notification>> {
        Ok(self.notifications.list_for_recipient(recipient).await?)
    }
}
