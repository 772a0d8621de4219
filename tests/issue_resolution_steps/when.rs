//! When steps for issue resolution BDD scenarios.

use super::world::{ResolutionWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{username}" resolves the issue"#)]
fn resolves(world: &mut ResolutionWorld, username: String) -> Result<(), eyre::Report> {
    let actor = world.user(&username)?;
    let issue = world.issue()?;
    let result = run_async(world.state.resolution.resolve_as_leader(actor, issue));
    world.last_result = Some(result);
    Ok(())
}

#[when(r#""{username}" confirms the issue"#)]
fn confirms(world: &mut ResolutionWorld, username: String) -> Result<(), eyre::Report> {
    let actor = world.user(&username)?;
    let issue = world.issue()?;
    let result = run_async(world.state.resolution.confirm_as_reporter(actor, issue));
    world.last_result = Some(result);
    Ok(())
}
