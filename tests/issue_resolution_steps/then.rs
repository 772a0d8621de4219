//! Then steps for issue resolution BDD scenarios.

use super::world::{ResolutionWorld, run_async};
use civic_resolve::issue::{domain::IssueStatus, services::IssueServiceError};
use rstest_bdd_macros::then;

#[then(r#"the issue status is "{status}""#)]
fn issue_status_is(world: &ResolutionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = IssueStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let issue = run_async(world.state.reporting.get(world.issue()?))?;

    if issue.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            issue.status().as_str()
        ));
    }
    Ok(())
}

#[then("the leader has solved {count:u64} problems")]
fn leader_has_solved(world: &ResolutionWorld, count: u64) -> Result<(), eyre::Report> {
    let leader_id = world.leader()?;
    let board = run_async(world.state.leaders.leaderboard())?;
    let leader = board
        .iter()
        .find(|leader| leader.id() == leader_id)
        .ok_or_else(|| eyre::eyre!("leader missing from the leaderboard"))?;

    if leader.solved_problems() != count {
        return Err(eyre::eyre!(
            "expected {count} solved problems, found {}",
            leader.solved_problems()
        ));
    }
    Ok(())
}

#[then(r#""{username}" has {count:u64} unread notifications"#)]
fn unread_notifications(
    world: &ResolutionWorld,
    username: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let recipient = world.user(&username)?;
    let summary = run_async(world.state.inbox.inbox(recipient))?;

    if summary.unread != count {
        return Err(eyre::eyre!(
            "expected {count} unread notifications for {username}, found {}",
            summary.unread
        ));
    }
    Ok(())
}

#[then("the request is rejected because the actor is not the tagged leader")]
fn rejected_as_not_tagged_leader(world: &ResolutionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result"))?;

    if !matches!(result, Err(IssueServiceError::NotTaggedLeader { .. })) {
        return Err(eyre::eyre!("expected NotTaggedLeader error, got {result:?}"));
    }
    Ok(())
}

#[then("the request changes nothing")]
fn request_changes_nothing(world: &ResolutionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result"))?;

    match result {
        Ok(outcome) if !outcome.changed && outcome.transition.is_none() => Ok(()),
        other => Err(eyre::eyre!("expected an unchanged outcome, got {other:?}")),
    }
}
