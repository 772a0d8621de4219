//! Given steps for issue resolution BDD scenarios.

use super::world::{ResolutionWorld, run_async};
use civic_resolve::account::services::RegisterUserRequest;
use civic_resolve::issue::services::{RegisterLeaderRequest, SubmitIssueRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn register(world: &mut ResolutionWorld, username: &str) -> Result<(), eyre::Report> {
    let (user, _) = run_async(
        world
            .state
            .accounts
            .register(RegisterUserRequest::new(username)),
    )
    .wrap_err("register citizen for resolution scenario")?;
    world.users.insert(username.to_owned(), user.id());
    Ok(())
}

#[given(r#"a citizen "{username}""#)]
fn a_citizen(world: &mut ResolutionWorld, username: String) -> Result<(), eyre::Report> {
    register(world, &username)
}

#[given(r#"a leader "{name}" linked to the account "{username}""#)]
fn a_linked_leader(
    world: &mut ResolutionWorld,
    name: String,
    username: String,
) -> Result<(), eyre::Report> {
    register(world, &username)?;
    let account = world.user(&username)?;
    let leader = run_async(
        world
            .state
            .leaders
            .register(RegisterLeaderRequest::new(name, "Ward Councillor").with_account(account)),
    )
    .wrap_err("register leader for resolution scenario")?;
    world.leader = Some(leader.id());
    Ok(())
}

#[given(r#""{username}" has reported "{title}" to the leader"#)]
fn reported_issue(
    world: &mut ResolutionWorld,
    username: String,
    title: String,
) -> Result<(), eyre::Report> {
    let reporter = world.user(&username)?;
    let leader = world.leader()?;
    let request = SubmitIssueRequest::new(
        title,
        "Dark for a week outside the community library",
        12.97,
        77.59,
        leader,
    );
    let issue = run_async(world.state.reporting.submit(reporter, request))
        .wrap_err("submit issue for resolution scenario")?;
    world.issue = Some(issue.id());
    Ok(())
}

#[given(r#""{username}" has resolved the issue"#)]
fn has_resolved(world: &mut ResolutionWorld, username: String) -> Result<(), eyre::Report> {
    let actor = world.user(&username)?;
    let issue = world.issue()?;
    run_async(world.state.resolution.resolve_as_leader(actor, issue))
        .wrap_err("resolve issue in scenario setup")?;
    Ok(())
}

#[given(r#""{username}" has confirmed the issue"#)]
fn has_confirmed(world: &mut ResolutionWorld, username: String) -> Result<(), eyre::Report> {
    let actor = world.user(&username)?;
    let issue = world.issue()?;
    run_async(world.state.resolution.confirm_as_reporter(actor, issue))
        .wrap_err("confirm issue in scenario setup")?;
    Ok(())
}
