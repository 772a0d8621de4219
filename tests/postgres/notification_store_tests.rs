//! Notification persistence against `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use civic_resolve::account::domain::UserId;
use civic_resolve::notification::{
    adapters::postgres::PostgresNotificationRepository,
    domain::{Notification, NotificationId, NotificationKind, NotificationLinks},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use eyre::{OptionExt, Result};
use rstest::rstest;

fn follow_notice(context: &PgContext, recipient: UserId, text: &str) -> Result<Notification> {
    Ok(Notification::new(
        recipient,
        UserId::new(),
        NotificationKind::Follow,
        NotificationLinks::none(),
        text,
        &*context.clock,
    )?)
}

#[rstest]
fn listing_is_newest_first(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let repo = PostgresNotificationRepository::new(context.pool.clone());
    let recipient = UserId::new();
    let older = follow_notice(&context, recipient, "asha started following you")?;
    let newer = follow_notice(&context, recipient, "bilal started following you")?;
    let elsewhere = follow_notice(&context, UserId::new(), "chen started following you")?;
    for notice in [&older, &newer, &elsewhere] {
        context.rt.block_on(repo.append(notice))?;
    }

    let listed = context.rt.block_on(repo.list_for_recipient(recipient))?;

    let ids: Vec<NotificationId> = listed.iter().map(Notification::id).collect();
    assert_eq!(ids, vec![newer.id(), older.id()]);
    Ok(())
}

#[rstest]
fn read_flags_are_counted(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let repo = PostgresNotificationRepository::new(context.pool.clone());
    let recipient = UserId::new();
    let mut notices = Vec::new();
    for text in ["first notice", "second notice", "third notice"] {
        let notice = follow_notice(&context, recipient, text)?;
        context.rt.block_on(repo.append(&notice))?;
        notices.push(notice);
    }

    let read = notices.first().map(Notification::id).ok_or_eyre("notice appended")?;
    context.rt.block_on(repo.set_read(read))?;
    let changed = context.rt.block_on(repo.mark_all_read(recipient))?;

    assert_eq!(changed, 2);
    assert_eq!(context.rt.block_on(repo.unread_count(recipient))?, 0);
    let stored = context.rt.block_on(repo.find(read))?;
    assert!(stored.is_some_and(|notice| notice.is_read()));
    Ok(())
}

#[rstest]
fn duplicate_and_unknown_ids_are_rejected(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let repo = PostgresNotificationRepository::new(context.pool.clone());
    let notice = follow_notice(&context, UserId::new(), "asha started following you")?;
    context.rt.block_on(repo.append(&notice))?;

    let duplicate = context.rt.block_on(repo.append(&notice));
    let missing = NotificationId::new();
    let unknown = context.rt.block_on(repo.set_read(missing));

    assert!(matches!(
        duplicate,
        Err(NotificationRepositoryError::Duplicate(id)) if id == notice.id()
    ));
    assert!(matches!(
        unknown,
        Err(NotificationRepositoryError::NotFound(id)) if id == missing
    ));
    Ok(())
}
