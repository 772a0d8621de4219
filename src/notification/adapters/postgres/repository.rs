//! `PostgreSQL` notification repository.

use super::{models::NotificationRow, schema::notifications};
use crate::account::domain::UserId;
use crate::chat::domain::RoomId;
use crate::issue::domain::IssueId;
use crate::notification::{
    domain::{
        Notification, NotificationId, NotificationKind, NotificationLinks,
        PersistedNotificationData,
    },
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::social::domain::CommentId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the notification repository.
pub type NotificationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: NotificationPgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NotificationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(NotificationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationRepositoryError::persistence)?
    }
}

impl From<DieselError> for NotificationRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let id = notification.id();
        let row = to_row(notification);
        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationRepositoryError::Duplicate(id)
                    }
                    _ => NotificationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find(&self, id: NotificationId) -> NotificationRepositoryResult<Option<Notification>> {
        self.run_blocking(move |connection| {
            let row = notifications::table
                .filter(notifications::id.eq(id.into_inner()))
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .order((
                    notifications::created_at.desc(),
                    notifications::position.desc(),
                ))
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)?
                .into_iter()
                .map(row_to_notification)
                .collect()
        })
        .await
    }

    async fn unread_count(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .filter(notifications::is_read.eq(false))
                .count()
                .get_result::<i64>(connection)?;
            u64::try_from(count).map_err(NotificationRepositoryError::persistence)
        })
        .await
    }

    async fn set_read(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let updated =
                diesel::update(notifications::table.filter(notifications::id.eq(id.into_inner())))
                    .set(notifications::is_read.eq(true))
                    .execute(connection)?;
            if updated == 0 {
                return Err(NotificationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let changed = diesel::update(
                notifications::table
                    .filter(notifications::recipient_id.eq(recipient.into_inner()))
                    .filter(notifications::is_read.eq(false)),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)?;
            u64::try_from(changed).map_err(NotificationRepositoryError::persistence)
        })
        .await
    }
}

fn to_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: notification.id().into_inner(),
        recipient_id: notification.recipient().into_inner(),
        sender_id: notification.sender().into_inner(),
        kind: notification.kind().as_str().to_owned(),
        issue_id: notification.issue().map(IssueId::into_inner),
        comment_id: notification.comment().map(CommentId::into_inner),
        room_id: notification.room().map(RoomId::into_inner),
        text: notification.text().to_owned(),
        is_read: notification.is_read(),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let kind = NotificationKind::try_from(row.kind.as_str())
        .map_err(NotificationRepositoryError::persistence)?;
    Ok(Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_uuid(row.id),
        recipient: UserId::from_uuid(row.recipient_id),
        sender: UserId::from_uuid(row.sender_id),
        kind,
        links: NotificationLinks {
            issue: row.issue_id.map(IssueId::from_uuid),
            comment: row.comment_id.map(CommentId::from_uuid),
            room: row.room_id.map(RoomId::from_uuid),
        },
        text: row.text,
        is_read: row.is_read,
        created_at: row.created_at,
    }))
}
