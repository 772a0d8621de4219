//! `PostgreSQL` issue store.

use super::{
    models::{HashtagRow, IssueRow, LeaderRow, NewIssueHashtagRow},
    schema::{hashtags, issue_hashtags, issues, leaders},
};
use crate::account::domain::UserId;
use crate::issue::{
    domain::{
        Hashtag, HashtagName, Issue, IssueId, IssueTitle, Leader, LeaderId, Location,
        PersistedIssueData, PersistedLeaderData, ResolutionFlags,
    },
    ports::{
        HashtagRepository, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
        LeaderRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// `PostgreSQL` connection pool type used by the issue store.
pub type IssuePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed issue, leader and hashtag store.
#[derive(Debug, Clone)]
pub struct PostgresIssueStore {
    pool: IssuePgPool,
}

impl PostgresIssueStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IssuePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }
}

impl From<DieselError> for IssueRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueStore {
    async fn store(
        &self,
        issue: &Issue,
        hashtags: &[HashtagName],
    ) -> IssueRepositoryResult<Vec<Hashtag>> {
        let issue_id = issue.id();
        let leader_id = issue.leader();
        let row = to_issue_row(issue)?;
        let names = hashtags.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                diesel::insert_into(issues::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            IssueRepositoryError::DuplicateIssue(issue_id)
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            IssueRepositoryError::LeaderNotFound(leader_id)
                        }
                        _ => IssueRepositoryError::persistence(err),
                    })?;
                let mut tagged = Vec::with_capacity(names.len());
                for name in &names {
                    tag_issue(tx, issue_id, name)?;
                    if let Some(hashtag) = load_hashtag(tx, name)? {
                        tagged.push(hashtag);
                    }
                }
                Ok(tagged)
            })
        })
        .await
    }

    async fn update(&self, issue: &Issue, expected_version: u64) -> IssueRepositoryResult<()> {
        let row = to_issue_row(issue)?;
        self.run_blocking(move |connection| {
            connection.transaction(|tx| write_versioned(tx, &row, expected_version))
        })
        .await
    }

    async fn commit_resolution(
        &self,
        issue: &Issue,
        expected_version: u64,
        credited_leader: Option<LeaderId>,
    ) -> IssueRepositoryResult<()> {
        let row = to_issue_row(issue)?;
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                write_versioned(tx, &row, expected_version)?;
                if let Some(leader_id) = credited_leader {
                    let credited = diesel::update(
                        leaders::table.filter(leaders::id.eq(leader_id.into_inner())),
                    )
                    .set((
                        leaders::solved_problems.eq(leaders::solved_problems + 1),
                        leaders::updated_at.eq(row.updated_at),
                    ))
                    .execute(tx)?;
                    if credited == 0 {
                        return Err(IssueRepositoryError::LeaderNotFound(leader_id));
                    }
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .filter(issues::id.eq(id.into_inner()))
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()?;
            row.map(row_to_issue).transpose()
        })
        .await
    }

    async fn list_recent(&self) -> IssueRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            issues::table
                .order(issues::created_at.desc())
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)?
                .into_iter()
                .map(row_to_issue)
                .collect()
        })
        .await
    }

    async fn list_by_reporter(&self, reporter: UserId) -> IssueRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            issues::table
                .filter(issues::reporter_id.eq(reporter.into_inner()))
                .order(issues::created_at.desc())
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)?
                .into_iter()
                .map(row_to_issue)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl LeaderRepository for PostgresIssueStore {
    async fn store_leader(&self, leader: &Leader) -> IssueRepositoryResult<()> {
        let account = leader.account();
        let row = to_leader_row(leader)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(leaders::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match (err, account) {
                    (
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _),
                        Some(taken),
                    ) => IssueRepositoryError::LeaderAccountTaken(taken),
                    (other, _) => IssueRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_leader(&self, id: LeaderId) -> IssueRepositoryResult<Option<Leader>> {
        self.run_blocking(move |connection| {
            let row = leaders::table
                .filter(leaders::id.eq(id.into_inner()))
                .select(LeaderRow::as_select())
                .first::<LeaderRow>(connection)
                .optional()?;
            row.map(row_to_leader).transpose()
        })
        .await
    }

    async fn find_leader_by_account(
        &self,
        account: UserId,
    ) -> IssueRepositoryResult<Option<Leader>> {
        self.run_blocking(move |connection| {
            let row = leaders::table
                .filter(leaders::account_id.eq(account.into_inner()))
                .select(LeaderRow::as_select())
                .first::<LeaderRow>(connection)
                .optional()?;
            row.map(row_to_leader).transpose()
        })
        .await
    }

    async fn leaderboard(&self) -> IssueRepositoryResult<Vec<Leader>> {
        self.run_blocking(move |connection| {
            leaders::table
                .order((leaders::solved_problems.desc(), leaders::name.asc()))
                .select(LeaderRow::as_select())
                .load::<LeaderRow>(connection)?
                .into_iter()
                .map(row_to_leader)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl HashtagRepository for PostgresIssueStore {
    async fn find_hashtag(&self, name: &HashtagName) -> IssueRepositoryResult<Option<Hashtag>> {
        let name = name.clone();
        self.run_blocking(move |connection| load_hashtag(connection, &name))
            .await
    }
}

/// Upserts `name` and pairs it with `issue`, counting first pairings only.
fn tag_issue(
    connection: &mut PgConnection,
    issue: IssueId,
    name: &HashtagName,
) -> IssueRepositoryResult<()> {
    diesel::insert_into(hashtags::table)
        .values((hashtags::name.eq(name.as_str()), hashtags::usage_count.eq(0)))
        .on_conflict_do_nothing()
        .execute(connection)?;
    let paired = diesel::insert_into(issue_hashtags::table)
        .values(NewIssueHashtagRow {
            hashtag: name.as_str().to_owned(),
            issue_id: issue.into_inner(),
        })
        .on_conflict_do_nothing()
        .execute(connection)?;
    if paired > 0 {
        diesel::update(hashtags::table.filter(hashtags::name.eq(name.as_str())))
            .set(hashtags::usage_count.eq(hashtags::usage_count + 1))
            .execute(connection)?;
    }
    Ok(())
}

/// Overwrites the issue row when the stored version still matches.
fn write_versioned(
    connection: &mut PgConnection,
    row: &IssueRow,
    expected_version: u64,
) -> IssueRepositoryResult<()> {
    let id = IssueId::from_uuid(row.id);
    let expected = to_i64(expected_version)?;
    let updated = diesel::update(
        issues::table
            .filter(issues::id.eq(row.id))
            .filter(issues::version.eq(expected)),
    )
    .set(row)
    .execute(connection)?;
    if updated == 1 {
        return Ok(());
    }
    let exists = issues::table
        .filter(issues::id.eq(row.id))
        .count()
        .get_result::<i64>(connection)?;
    if exists == 0 {
        Err(IssueRepositoryError::NotFound(id))
    } else {
        Err(IssueRepositoryError::VersionConflict {
            id,
            expected: expected_version,
        })
    }
}

fn load_hashtag(
    connection: &mut PgConnection,
    name: &HashtagName,
) -> IssueRepositoryResult<Option<Hashtag>> {
    let Some(row) = hashtags::table
        .filter(hashtags::name.eq(name.as_str()))
        .select(HashtagRow::as_select())
        .first::<HashtagRow>(connection)
        .optional()?
    else {
        return Ok(None);
    };
    let issue_ids = issue_hashtags::table
        .filter(issue_hashtags::hashtag.eq(name.as_str()))
        .select(issue_hashtags::issue_id)
        .load::<uuid::Uuid>(connection)?;
    let issues: BTreeSet<IssueId> = issue_ids.into_iter().map(IssueId::from_uuid).collect();
    Ok(Some(Hashtag::from_persisted(
        name.clone(),
        to_u64(row.usage_count)?,
        issues,
    )))
}

fn to_i64(value: u64) -> IssueRepositoryResult<i64> {
    i64::try_from(value).map_err(IssueRepositoryError::persistence)
}

fn to_u64(value: i64) -> IssueRepositoryResult<u64> {
    u64::try_from(value).map_err(IssueRepositoryError::persistence)
}

fn to_issue_row(issue: &Issue) -> IssueRepositoryResult<IssueRow> {
    Ok(IssueRow {
        id: issue.id().into_inner(),
        title: issue.title().as_str().to_owned(),
        description: issue.description().to_owned(),
        image_url: issue.image_url().map(str::to_owned),
        latitude: issue.location().latitude(),
        longitude: issue.location().longitude(),
        reporter_id: issue.reporter().into_inner(),
        leader_id: issue.leader().into_inner(),
        status: issue.status().as_str().to_owned(),
        is_leader_resolved: issue.is_leader_resolved(),
        is_user_confirmed: issue.is_user_confirmed(),
        flag_count: to_i64(issue.flag_count())?,
        flagged_by: issue
            .flagged_by()
            .iter()
            .map(|user| user.into_inner())
            .collect(),
        version: to_i64(issue.version())?,
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
    })
}

fn row_to_issue(row: IssueRow) -> IssueRepositoryResult<Issue> {
    let data = PersistedIssueData {
        id: IssueId::from_uuid(row.id),
        title: IssueTitle::new(row.title).map_err(IssueRepositoryError::persistence)?,
        description: row.description,
        image_url: row.image_url,
        location: Location::new(row.latitude, row.longitude)
            .map_err(IssueRepositoryError::persistence)?,
        reporter: UserId::from_uuid(row.reporter_id),
        leader: LeaderId::from_uuid(row.leader_id),
        flags: ResolutionFlags {
            leader_resolved: row.is_leader_resolved,
            user_confirmed: row.is_user_confirmed,
        },
        flag_count: to_u64(row.flag_count)?,
        flagged_by: row.flagged_by.into_iter().map(UserId::from_uuid).collect(),
        version: to_u64(row.version)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Issue::from_persisted(data))
}

fn to_leader_row(leader: &Leader) -> IssueRepositoryResult<LeaderRow> {
    Ok(LeaderRow {
        id: leader.id().into_inner(),
        name: leader.name().to_owned(),
        designation: leader.designation().to_owned(),
        solved_problems: to_i64(leader.solved_problems())?,
        profile_picture: leader.profile_picture().map(str::to_owned),
        account_id: leader.account().map(UserId::into_inner),
        created_at: leader.created_at(),
        updated_at: leader.updated_at(),
    })
}

fn row_to_leader(row: LeaderRow) -> IssueRepositoryResult<Leader> {
    Ok(Leader::from_persisted(PersistedLeaderData {
        id: LeaderId::from_uuid(row.id),
        name: row.name,
        designation: row.designation,
        solved_problems: to_u64(row.solved_problems)?,
        profile_picture: row.profile_picture,
        account: row.account_id.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
