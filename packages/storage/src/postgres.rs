//! PostgreSQL storage.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use prassign_pull_request::{
    PullRequest, PullRequestShort, PullRequestStatus, PullRequestStore, PullRequestStoreError,
    ReviewerStats,
};
use prassign_team::{Team, TeamDirectory, TeamError};
use prassign_user::{User, UserDirectory, UserError};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS teams (
        team_name TEXT PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS users (
        user_id   TEXT PRIMARY KEY,
        username  TEXT NOT NULL,
        team_name TEXT NOT NULL REFERENCES teams (team_name),
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )",
    "CREATE INDEX IF NOT EXISTS users_team_name_idx ON users (team_name)",
    "CREATE TABLE IF NOT EXISTS pull_requests (
        pull_request_id    TEXT PRIMARY KEY,
        pull_request_name  TEXT NOT NULL,
        author_id          TEXT NOT NULL,
        status             TEXT NOT NULL,
        assigned_reviewers TEXT[] NOT NULL DEFAULT '{}',
        created_at         TIMESTAMPTZ NOT NULL,
        merged_at          TIMESTAMPTZ
    )",
];

/// Errors from connecting to or preparing the database.
#[derive(Debug, thiserror::Error)]
pub enum PostgresStorageError {
    #[error("postgres connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("postgres connect: {0}")]
    Connect(sqlx::Error),

    #[error("postgres migrate: {0}")]
    Migrate(sqlx::Error),
}

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect to `dsn`, giving up after `connect_timeout`.
    ///
    /// # Errors
    ///
    /// * `ConnectTimeout` if no connection is established in time
    /// * `Connect` if the DSN is invalid or the server refuses the connection
    pub async fn connect(
        dsn: &str,
        connect_timeout: Duration,
    ) -> Result<Self, PostgresStorageError> {
        let connect = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(connect_timeout)
            .connect(dsn);

        let pool = tokio::time::timeout(connect_timeout, connect)
            .await
            .map_err(|_| PostgresStorageError::ConnectTimeout(connect_timeout))?
            .map_err(PostgresStorageError::Connect)?;

        log::info!("Connected to postgres");

        Ok(Self { pool })
    }

    /// Create the tables if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Migrate` if any statement fails.
    pub async fn migrate(&self) -> Result<(), PostgresStorageError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(PostgresStorageError::Migrate)?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        team_name: row.try_get("team_name")?,
        is_active: row.try_get("is_active")?,
    })
}

fn status_from_row(row: &PgRow) -> Result<PullRequestStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;
    PullRequestStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

fn pull_request_from_row(row: &PgRow) -> Result<PullRequest, sqlx::Error> {
    Ok(PullRequest {
        pull_request_id: row.try_get("pull_request_id")?,
        pull_request_name: row.try_get("pull_request_name")?,
        author_id: row.try_get("author_id")?,
        status: status_from_row(row)?,
        assigned_reviewers: row.try_get("assigned_reviewers")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        merged_at: row.try_get::<Option<DateTime<Utc>>, _>("merged_at")?,
    })
}

fn short_from_row(row: &PgRow) -> Result<PullRequestShort, sqlx::Error> {
    Ok(PullRequestShort {
        pull_request_id: row.try_get("pull_request_id")?,
        pull_request_name: row.try_get("pull_request_name")?,
        author_id: row.try_get("author_id")?,
        status: status_from_row(row)?,
    })
}

fn user_error(context: &str) -> impl Fn(sqlx::Error) -> UserError + '_ {
    move |e| UserError::Storage(format!("{context}: {e}"))
}

fn team_error(context: &str) -> impl Fn(sqlx::Error) -> TeamError + '_ {
    move |e| TeamError::Storage(format!("{context}: {e}"))
}

fn store_error(context: &str) -> impl Fn(sqlx::Error) -> PullRequestStoreError + '_ {
    move |e| PullRequestStoreError::Backend(format!("{context}: {e}"))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait::async_trait]
impl UserDirectory for PostgresStorage {
    async fn get_by_id(&self, user_id: &str) -> Result<User, UserError> {
        let row = sqlx::query(
            "SELECT user_id, username, team_name, is_active
             FROM users
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(user_error("select user"))?
        .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        user_from_row(&row).map_err(user_error("decode user"))
    }

    async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, UserError> {
        let row = sqlx::query(
            "UPDATE users
             SET is_active = $2
             WHERE user_id = $1
             RETURNING user_id, username, team_name, is_active",
        )
        .bind(user_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(user_error("update user is_active"))?
        .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        user_from_row(&row).map_err(user_error("decode user"))
    }
}

#[async_trait::async_trait]
impl TeamDirectory for PostgresStorage {
    async fn create(&self, team: &Team) -> Result<(), TeamError> {
        let mut tx = self.pool.begin().await.map_err(team_error("begin"))?;

        sqlx::query(
            "INSERT INTO teams (team_name) VALUES ($1)
             ON CONFLICT (team_name) DO NOTHING",
        )
        .bind(&team.team_name)
        .execute(&mut *tx)
        .await
        .map_err(team_error("insert team"))?;

        for member in &team.members {
            sqlx::query(
                "INSERT INTO users (user_id, username, team_name, is_active)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (user_id) DO UPDATE SET
                     username  = EXCLUDED.username,
                     team_name = EXCLUDED.team_name,
                     is_active = EXCLUDED.is_active",
            )
            .bind(&member.user_id)
            .bind(&member.username)
            .bind(&team.team_name)
            .bind(member.is_active)
            .execute(&mut *tx)
            .await
            .map_err(|e| TeamError::Storage(format!("upsert user {}: {e}", member.user_id)))?;
        }

        tx.commit().await.map_err(team_error("commit"))
    }

    async fn get_by_team_name(&self, team_name: &str) -> Result<Team, TeamError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE team_name = $1)")
                .bind(team_name)
                .fetch_one(&self.pool)
                .await
                .map_err(team_error("check team exists"))?;

        if !exists {
            return Err(TeamError::NotFound(team_name.to_string()));
        }

        let members = sqlx::query(
            "SELECT user_id, username, team_name, is_active
             FROM users
             WHERE team_name = $1
             ORDER BY user_id",
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(team_error("query users"))?
        .iter()
        .map(user_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(team_error("scan user"))?;

        Ok(Team {
            team_name: team_name.to_string(),
            members,
        })
    }
}

#[async_trait::async_trait]
impl PullRequestStore for PostgresStorage {
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError> {
        sqlx::query(
            "INSERT INTO pull_requests (
                 pull_request_id,
                 pull_request_name,
                 author_id,
                 status,
                 assigned_reviewers,
                 created_at,
                 merged_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&pr.pull_request_id)
        .bind(&pr.pull_request_name)
        .bind(&pr.author_id)
        .bind(pr.status.as_ref())
        .bind(&pr.assigned_reviewers)
        .bind(pr.created_at)
        .bind(pr.merged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PullRequestStoreError::Duplicate(pr.pull_request_id.clone())
            } else {
                PullRequestStoreError::Backend(format!("insert pull_request: {e}"))
            }
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<PullRequest>, PullRequestStoreError> {
        sqlx::query(
            "SELECT
                 pull_request_id,
                 pull_request_name,
                 author_id,
                 status,
                 assigned_reviewers,
                 created_at,
                 merged_at
             FROM pull_requests
             WHERE pull_request_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("select pull_request"))?
        .as_ref()
        .map(pull_request_from_row)
        .transpose()
        .map_err(store_error("decode pull_request"))
    }

    async fn update(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError> {
        let result = sqlx::query(
            "UPDATE pull_requests
             SET status = $2,
                 assigned_reviewers = $3,
                 merged_at = $4
             WHERE pull_request_id = $1",
        )
        .bind(&pr.pull_request_id)
        .bind(pr.status.as_ref())
        .bind(&pr.assigned_reviewers)
        .bind(pr.merged_at)
        .execute(&self.pool)
        .await
        .map_err(store_error("update pull_request"))?;

        if result.rows_affected() == 0 {
            return Err(PullRequestStoreError::Backend(format!(
                "update pull_request: {} not stored",
                pr.pull_request_id
            )));
        }

        Ok(())
    }

    async fn get_by_reviewer_id(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        sqlx::query(
            "SELECT pull_request_id, pull_request_name, author_id, status
             FROM pull_requests
             WHERE $1 = ANY(assigned_reviewers)
             ORDER BY created_at, pull_request_id",
        )
        .bind(reviewer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("select pull_requests by reviewer"))?
        .iter()
        .map(short_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(store_error("scan pull_request_short"))
    }

    async fn reviewer_stats(&self) -> Result<ReviewerStats, PullRequestStoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT reviewer_id, COUNT(*) AS assign_count
             FROM (
                 SELECT unnest(assigned_reviewers) AS reviewer_id
                 FROM pull_requests
             ) AS t
             GROUP BY reviewer_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("select reviewer stats"))?;

        Ok(rows
            .into_iter()
            .map(|(reviewer_id, count)| (reviewer_id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::SubsecRound as _;

    use super::*;

    async fn storage() -> Option<PostgresStorage> {
        let dsn = std::env::var("DATABASE_DSN").ok()?;
        let storage = PostgresStorage::connect(&dsn, Duration::from_secs(5))
            .await
            .unwrap();
        storage.migrate().await.unwrap();
        storage.migrate().await.unwrap();
        Some(storage)
    }

    async fn cleanup(storage: &PostgresStorage, suffix: &str) {
        let pattern = format!("%{suffix}");
        for statement in [
            "DELETE FROM pull_requests WHERE pull_request_id LIKE $1",
            "DELETE FROM users WHERE user_id LIKE $1",
            "DELETE FROM teams WHERE team_name LIKE $1",
        ] {
            sqlx::query(statement)
                .bind(&pattern)
                .execute(&storage.pool)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_DSN pointing at a PostgreSQL database"]
    async fn test_queries_against_postgres() {
        let Some(storage) = storage().await else {
            return;
        };
        let suffix = format!("-{}", Utc::now().timestamp_micros());
        let id = |name: &str| format!("{name}{suffix}");

        TeamDirectory::create(
            &storage,
            &Team::new(id("backend"))
                .with_member(User::new(id("b"), "Bob", "", true))
                .with_member(User::new(id("a"), "Alice", "", true)),
        )
        .await
        .unwrap();
        TeamDirectory::create(
            &storage,
            &Team::new(id("frontend")).with_member(User::new(id("b"), "Bobby", "", false)),
        )
        .await
        .unwrap();

        let backend = storage.get_by_team_name(&id("backend")).await.unwrap();
        let members: Vec<&str> = backend.members.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(members, vec![id("a").as_str()]);

        let moved = UserDirectory::get_by_id(&storage, &id("b")).await.unwrap();
        assert_eq!(moved.team_name, id("frontend"));
        assert_eq!(moved.username, "Bobby");
        assert!(!moved.is_active);
        assert!(
            storage
                .get_by_team_name(&id("missing"))
                .await
                .unwrap_err()
                .is_not_found()
        );

        let now = Utc::now().trunc_subsecs(6);
        let older = PullRequest::new(id("pr-a"), "A", id("a"), now - chrono::Duration::minutes(1))
            .with_reviewers(vec![id("a"), id("b")]);
        let newer = PullRequest::new(id("pr-b"), "B", id("b"), now).with_reviewers(vec![id("a")]);
        PullRequestStore::create(&storage, &newer).await.unwrap();
        PullRequestStore::create(&storage, &older).await.unwrap();
        assert!(matches!(
            PullRequestStore::create(&storage, &older).await.unwrap_err(),
            PullRequestStoreError::Duplicate(_)
        ));

        let reviews = storage.get_by_reviewer_id(&id("a")).await.unwrap();
        let ids: Vec<&str> = reviews
            .iter()
            .map(|pr| pr.pull_request_id.as_str())
            .collect();
        assert_eq!(ids, vec![id("pr-a").as_str(), id("pr-b").as_str()]);

        let mut merged = newer.clone();
        merged.merge(Utc::now().trunc_subsecs(6));
        storage.update(&merged).await.unwrap();
        let stored = PullRequestStore::get_by_id(&storage, &id("pr-b"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, merged);
        assert!(
            PullRequestStore::get_by_id(&storage, &id("pr-missing"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .update(&PullRequest::new(id("pr-missing"), "X", id("a"), now))
                .await
                .is_err()
        );

        let stats = storage.reviewer_stats().await.unwrap();
        assert_eq!(stats.get(&id("a")), Some(&2));
        assert_eq!(stats.get(&id("b")), Some(&1));

        let user = storage.set_is_active(&id("a"), false).await.unwrap();
        assert!(!user.is_active);
        assert!(
            storage
                .set_is_active(&id("ghost"), true)
                .await
                .unwrap_err()
                .is_not_found()
        );

        cleanup(&storage, &suffix).await;
        storage.close().await;
    }
}
