//! `PostgreSQL` account repository.

use super::{
    models::{NewFollowRow, ProfileRow, UserRow},
    schema::{follows, profiles, users},
};
use crate::account::{
    domain::{CitizenProfile, PersistedProfileData, User, UserId, Username},
    ports::{AccountRepository, AccountRepositoryError, AccountRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the account repository.
pub type AccountPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user, profile and follow repository.
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: AccountPgPool,
}

impl PostgresAccountRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AccountPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AccountRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AccountRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AccountRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AccountRepositoryError::persistence)?
    }
}

impl From<DieselError> for AccountRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn store_user(
        &self,
        user: &User,
        profile: &CitizenProfile,
    ) -> AccountRepositoryResult<()> {
        let username = user.username().clone();
        let user_row = to_user_row(user);
        let profile_row = to_profile_row(profile)?;
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                diesel::insert_into(users::table)
                    .values(&user_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            AccountRepositoryError::DuplicateUsername(username)
                        }
                        _ => AccountRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(profiles::table)
                    .values(&profile_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> AccountRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> AccountRepositoryResult<Option<User>> {
        let key = username_key(username);
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username_key.eq(key))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_profile(&self, id: UserId) -> AccountRepositoryResult<Option<CitizenProfile>> {
        self.run_blocking(move |connection| load_profile(connection, id))
            .await
    }

    async fn update_profile(&self, profile: &CitizenProfile) -> AccountRepositoryResult<()> {
        let owner = profile.user_id();
        let row = to_profile_row(profile)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(profiles::table.filter(profiles::user_id.eq(row.user_id)))
                .set((
                    profiles::real_name.eq(&row.real_name),
                    profiles::contact_email.eq(&row.contact_email),
                    profiles::bio.eq(&row.bio),
                    profiles::reputation.eq(row.reputation),
                    profiles::updated_at.eq(row.updated_at),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(AccountRepositoryError::UserNotFound(owner));
            }
            Ok(())
        })
        .await
    }

    async fn follow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                require_profiles(tx, follower, followee)?;
                let inserted = diesel::insert_into(follows::table)
                    .values(NewFollowRow {
                        follower_id: follower.into_inner(),
                        followee_id: followee.into_inner(),
                    })
                    .on_conflict_do_nothing()
                    .execute(tx)?;
                Ok(inserted > 0)
            })
        })
        .await
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                require_profiles(tx, follower, followee)?;
                let removed = diesel::delete(
                    follows::table
                        .filter(follows::follower_id.eq(follower.into_inner()))
                        .filter(follows::followee_id.eq(followee.into_inner())),
                )
                .execute(tx)?;
                Ok(removed > 0)
            })
        })
        .await
    }
}

/// Fails with [`AccountRepositoryError::UserNotFound`] unless both users
/// have a profile.
fn require_profiles(
    connection: &mut PgConnection,
    follower: UserId,
    followee: UserId,
) -> AccountRepositoryResult<()> {
    for user in [follower, followee] {
        let exists = profiles::table
            .filter(profiles::user_id.eq(user.into_inner()))
            .count()
            .get_result::<i64>(connection)?;
        if exists == 0 {
            return Err(AccountRepositoryError::UserNotFound(user));
        }
    }
    Ok(())
}

fn load_profile(
    connection: &mut PgConnection,
    id: UserId,
) -> AccountRepositoryResult<Option<CitizenProfile>> {
    let owner = id.into_inner();
    let Some(row) = profiles::table
        .filter(profiles::user_id.eq(owner))
        .select(ProfileRow::as_select())
        .first::<ProfileRow>(connection)
        .optional()?
    else {
        return Ok(None);
    };
    let followers = follows::table
        .filter(follows::followee_id.eq(owner))
        .select(follows::follower_id)
        .load::<uuid::Uuid>(connection)?;
    let following = follows::table
        .filter(follows::follower_id.eq(owner))
        .select(follows::followee_id)
        .load::<uuid::Uuid>(connection)?;
    Ok(Some(CitizenProfile::from_persisted(PersistedProfileData {
        user_id: id,
        real_name: row.real_name,
        contact_email: row.contact_email,
        bio: row.bio,
        reputation: u64::try_from(row.reputation).map_err(AccountRepositoryError::persistence)?,
        followers: followers.into_iter().map(UserId::from_uuid).collect(),
        following: following.into_iter().map(UserId::from_uuid).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })))
}

fn to_user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        username_key: username_key(user.username().as_str()),
        email: user.email().map(str::to_owned),
        joined_at: user.joined_at(),
    }
}

fn row_to_user(row: UserRow) -> AccountRepositoryResult<User> {
    let username = Username::new(row.username).map_err(AccountRepositoryError::persistence)?;
    Ok(User::from_persisted(
        UserId::from_uuid(row.id),
        username,
        row.email,
        row.joined_at,
    ))
}

fn to_profile_row(profile: &CitizenProfile) -> AccountRepositoryResult<ProfileRow> {
    Ok(ProfileRow {
        user_id: profile.user_id().into_inner(),
        real_name: profile.real_name().to_owned(),
        contact_email: profile.contact_email().to_owned(),
        bio: profile.bio().to_owned(),
        reputation: i64::try_from(profile.reputation())
            .map_err(AccountRepositoryError::persistence)?,
        created_at: profile.created_at(),
        updated_at: profile.updated_at(),
    })
}
