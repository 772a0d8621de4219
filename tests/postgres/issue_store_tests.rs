//! Issue, leader and hashtag persistence against `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use civic_resolve::account::domain::UserId;
use civic_resolve::issue::{
    adapters::postgres::PostgresIssueStore,
    domain::{
        HashtagName, Issue, IssueDraft, IssueStatus, IssueTitle, Leader, Location,
    },
    ports::{HashtagRepository, IssueRepository, IssueRepositoryError, LeaderRepository},
};
use eyre::{OptionExt, Result};
use rstest::rstest;

fn draft(context: &PgContext, leader: &Leader, title: &str) -> Result<Issue> {
    let draft = IssueDraft::new(
        IssueTitle::new(title)?,
        "Reported by a resident of the ward",
        Location::new(12.97, 77.59)?,
        UserId::new(),
        leader.id(),
    )?;
    Ok(Issue::submit(draft, &*context.clock))
}

fn tags(names: &[&str]) -> Result<Vec<HashtagName>> {
    Ok(names
        .iter()
        .map(|name| HashtagName::new(name))
        .collect::<Result<_, _>>()?)
}

fn stored_leader(context: &PgContext, store: &PostgresIssueStore) -> Result<Leader> {
    let leader = Leader::register("Ravi", "Ward Councillor", &*context.clock)?;
    context.rt.block_on(store.store_leader(&leader))?;
    Ok(leader)
}

#[rstest]
fn stored_issue_is_found_with_its_hashtags(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let leader = stored_leader(&context, &store)?;
    let issue = draft(&context, &leader, "Broken streetlight")?;

    let recorded = context
        .rt
        .block_on(store.store(&issue, &tags(&["lights", "roads"])?))?;
    let found = context
        .rt
        .block_on(store.find_by_id(issue.id()))?
        .ok_or_eyre("issue stored")?;

    assert_eq!(recorded.len(), 2);
    assert!(recorded.iter().all(|tag| tag.usage_count() == 1));
    assert_eq!(found.title(), issue.title());
    assert_eq!(found.status(), IssueStatus::Open);
    assert_eq!(found.version(), issue.version());
    Ok(())
}

#[rstest]
fn rejected_issue_leaves_no_hashtags(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let ghost = Leader::register("Ghost", "Mayor", &*context.clock)?;
    let issue = draft(&context, &ghost, "Broken streetlight")?;
    let lights = HashtagName::new("lights")?;

    let result = context
        .rt
        .block_on(store.store(&issue, std::slice::from_ref(&lights)));

    assert!(matches!(
        result,
        Err(IssueRepositoryError::LeaderNotFound(id)) if id == ghost.id()
    ));
    assert!(context.rt.block_on(store.find_hashtag(&lights))?.is_none());
    assert!(context.rt.block_on(store.find_by_id(issue.id()))?.is_none());
    Ok(())
}

#[rstest]
fn duplicate_issue_does_not_recount_tags(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let leader = stored_leader(&context, &store)?;
    let issue = draft(&context, &leader, "Broken streetlight")?;
    let lights = tags(&["lights"])?;
    context.rt.block_on(store.store(&issue, &lights))?;

    let again = context.rt.block_on(store.store(&issue, &lights));

    assert!(matches!(
        again,
        Err(IssueRepositoryError::DuplicateIssue(id)) if id == issue.id()
    ));
    let counted = context
        .rt
        .block_on(store.find_hashtag(&HashtagName::new("lights")?))?
        .ok_or_eyre("hashtag stored")?;
    assert_eq!(counted.usage_count(), 1);
    Ok(())
}

#[rstest]
fn solving_commit_credits_the_leader(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let leader = stored_leader(&context, &store)?;
    let mut issue = draft(&context, &leader, "Broken streetlight")?;
    context.rt.block_on(store.store(&issue, &[]))?;

    let version = issue.version();
    issue.apply_leader_resolution(&*context.clock);
    context
        .rt
        .block_on(store.commit_resolution(&issue, version, None))?;
    let version = issue.version();
    issue.apply_user_confirmation(&*context.clock);
    context
        .rt
        .block_on(store.commit_resolution(&issue, version, Some(leader.id())))?;

    let stored = context
        .rt
        .block_on(store.find_by_id(issue.id()))?
        .ok_or_eyre("issue stored")?;
    let credited = context
        .rt
        .block_on(store.find_leader(leader.id()))?
        .ok_or_eyre("leader stored")?;
    assert_eq!(stored.status(), IssueStatus::Solved);
    assert!(stored.is_leader_resolved() && stored.is_user_confirmed());
    assert_eq!(credited.solved_problems(), 1);
    Ok(())
}

#[rstest]
fn stale_commit_leaves_counter_untouched(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let leader = stored_leader(&context, &store)?;
    let issue = draft(&context, &leader, "Broken streetlight")?;
    context.rt.block_on(store.store(&issue, &[]))?;
    let read_version = issue.version();

    let mut first = issue.clone();
    first.flag(UserId::new(), &*context.clock);
    context.rt.block_on(store.update(&first, read_version))?;

    let mut stale = issue;
    stale.apply_user_confirmation(&*context.clock);
    let result = context
        .rt
        .block_on(store.commit_resolution(&stale, read_version, Some(leader.id())));

    assert!(matches!(
        result,
        Err(IssueRepositoryError::VersionConflict { expected, .. }) if expected == read_version
    ));
    let unchanged = context
        .rt
        .block_on(store.find_leader(leader.id()))?
        .ok_or_eyre("leader stored")?;
    assert_eq!(unchanged.solved_problems(), 0);
    Ok(())
}

#[rstest]
fn an_account_acts_for_one_leader(pg_context: Result<Option<PgContext>>) -> Result<()> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let store = PostgresIssueStore::new(context.pool.clone());
    let account = UserId::new();
    let first = Leader::register("Ravi", "Ward Councillor", &*context.clock)?.with_account(account);
    let second = Leader::register("Meera", "Mayor", &*context.clock)?.with_account(account);
    context.rt.block_on(store.store_leader(&first))?;

    let result = context.rt.block_on(store.store_leader(&second));

    assert!(matches!(
        result,
        Err(IssueRepositoryError::LeaderAccountTaken(taken)) if taken == account
    ));
    let linked = context
        .rt
        .block_on(store.find_leader_by_account(account))?
        .ok_or_eyre("leader linked")?;
    assert_eq!(linked.id(), first.id());
    Ok(())
}
