//! SQLite subscription storage
//!
//! Months are stored as ordinals so that the prorated total is a single
//! aggregate query with integer arithmetic.

use super::{RepositoryError, SubscriptionRepository};
use crate::config::DatabaseConfig;
use crate::domain::{ListFilter, MonthYear, Subscription, TotalFilter};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "SELECT id, service_name, price, user_id, start_month, end_month FROM subscriptions";

/// Overlap-prorated sum; binds are `to, to, from, to, to, from`
const TOTAL_QUERY: &str = "SELECT COALESCE(SUM(price * (\
        MIN(COALESCE(end_month, ?), ?) - MAX(start_month, ?) + 1\
    )), 0) FROM subscriptions \
    WHERE start_month <= ? AND COALESCE(end_month, ?) >= ?";

/// Stored form of a subscription
#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: String,
    service_name: String,
    price: i64,
    user_id: String,
    start_month: i64,
    end_month: Option<i64>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = RepositoryError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let corrupt =
            |what: &str| RepositoryError::CorruptRow(format!("{} in row {}", what, row.id));

        let id = Uuid::parse_str(&row.id).map_err(|_| corrupt("bad id"))?;
        let user_id = Uuid::parse_str(&row.user_id).map_err(|_| corrupt("bad user_id"))?;
        let start_date =
            MonthYear::from_ordinal(row.start_month).ok_or_else(|| corrupt("bad start_month"))?;
        let end_date = row
            .end_month
            .map(|ordinal| MonthYear::from_ordinal(ordinal).ok_or_else(|| corrupt("bad end_month")))
            .transpose()?;

        Ok(Subscription {
            id: Some(id),
            service_name: row.service_name,
            price: row.price,
            user_id,
            start_date,
            end_date,
        })
    }
}

/// Subscription store backed by an SQLite connection pool
#[derive(Clone)]
pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    /// Connect to the database and apply migrations
    ///
    /// The first connection is retried `connect_retries` times, pausing
    /// `retry_pause_secs` between attempts.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(SqliteSubscriptionRepository)` if successful
    /// * `Err(RepositoryError)` if every attempt failed or migrations failed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let connection_string = if config.url.starts_with("sqlite:") {
            config.url.clone()
        } else {
            format!("sqlite:{}", config.url)
        };

        if let Some(parent) = database_file(&connection_string).and_then(Path::parent) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&connection_string)?
            .create_if_missing(true)
            .foreign_keys(true);

        let attempts = config.connect_retries.max(1);
        let mut attempt = 1;
        let pool = loop {
            match SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => break pool,
                Err(e) if attempt < attempts => {
                    warn!(
                        attempt,
                        attempts,
                        error = %e,
                        "Failed to connect to database, retrying in {:?}",
                        config.retry_pause()
                    );
                    tokio::time::sleep(config.retry_pause()).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!("Connected to SQLite database at: {}", connection_string);

        let repo = Self { pool };
        repo.run_migrations().await?;
        Ok(repo)
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_subscriptions.sql");
        for statement in migration_statements(migration_sql) {
            sqlx::query(&statement).execute(&self.pool).await.map_err(|e| {
                RepositoryError::Internal(anyhow::anyhow!(
                    "Migration failed: {} - Statement: {}",
                    e,
                    statement.chars().take(100).collect::<String>()
                ))
            })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Filesystem path behind an SQLite URL, if it names a file
fn database_file(connection_string: &str) -> Option<&Path> {
    let path = connection_string
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(Path::new(path))
    }
}

/// Split a migration script into executable statements
///
/// Drops comment-only lines and trailing `--` comments, then splits on `;`.
fn migration_statements(sql: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `WHERE`-clause fragments and their bind values for a scope filter
fn scope_conditions(filter: &ListFilter) -> (Vec<&'static str>, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(user_id) = filter.user_id {
        conditions.push("user_id = ?");
        binds.push(user_id.to_string());
    }
    if let Some(service_name) = &filter.service_name {
        conditions.push("service_name = ?");
        binds.push(service_name.clone());
    }

    (conditions, binds)
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn create(&self, sub: &Subscription) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();
        let created_at = chrono::Utc::now().timestamp_micros();

        sqlx::query(
            "INSERT INTO subscriptions \
             (id, service_name, price, user_id, start_month, end_month, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&sub.service_name)
        .bind(sub.price)
        .bind(sub.user_id.to_string())
        .bind(sub.start_date.ordinal())
        .bind(sub.end_date.map(|d| d.ordinal()))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        debug!(subscription_id = %id, "Created subscription");
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError> {
        let (conditions, binds) = scope_conditions(filter);

        let mut sql = SELECT_COLUMNS.to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut query = sqlx::query_as::<_, SubscriptionRow>(&sql);
        for value in binds {
            query = query.bind(value);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Subscription::try_from)
            .collect()
    }

    async fn update(&self, id: Uuid, sub: &Subscription) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE subscriptions \
             SET service_name = ?, price = ?, user_id = ?, start_month = ?, end_month = ? \
             WHERE id = ?",
        )
        .bind(&sub.service_name)
        .bind(sub.price)
        .bind(sub.user_id.to_string())
        .bind(sub.start_date.ordinal())
        .bind(sub.end_date.map(|d| d.ordinal()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!(subscription_id = %id, "Updated subscription");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!(subscription_id = %id, "Deleted subscription");
        Ok(())
    }

    async fn total(&self, filter: &TotalFilter) -> Result<i64, RepositoryError> {
        let from = filter.period.from.ordinal();
        let to = filter.period.to.ordinal();
        let (conditions, binds) = scope_conditions(&filter.scope);

        let mut sql = TOTAL_QUERY.to_string();
        for condition in &conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }

        let mut query = sqlx::query_scalar::<_, i64>(&sql)
            .bind(to)
            .bind(to)
            .bind(from)
            .bind(to)
            .bind(to)
            .bind(from);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
