//! PostgreSQL-based metadata store implementation.

use crate::error::MetadataResult;
use crate::models::FileRow;
use crate::repos::FileRepo;
use crate::store::{MetadataStore, map_insert_error};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use time::OffsetDateTime;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// PostgreSQL-based metadata store.
#[derive(Debug)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(url: &str, max_connections: u32) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// This allows credentials to be passed separately, enabling better
    /// secret management (e.g., passwords via environment variables).
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        max_connections: u32,
    ) -> MetadataResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }
        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        Self::connect(opts, max_connections).await
    }

    async fn connect(opts: PgConnectOptions, max_connections: u32) -> MetadataResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }
}

#[async_trait]
impl FileRepo for PostgresStore {
    async fn insert_file(&self, filename: &str, format: &str) -> MetadataResult<FileRow> {
        let now = OffsetDateTime::now_utc();
        sqlx::query_as::<_, FileRow>(
            "INSERT INTO files (filename, format, created_at) VALUES ($1, $2, $3) \
             RETURNING id, filename, format, created_at",
        )
        .bind(filename)
        .bind(format)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, filename))
    }

    async fn get_file(&self, id: i64) -> MetadataResult<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT id, filename, format, created_at FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_file_by_name(&self, filename: &str) -> MetadataResult<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT id, filename, format, created_at FROM files WHERE filename = $1",
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_files(&self) -> MetadataResult<Vec<FileRow>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT id, filename, format, created_at FROM files ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        for statement in POSTGRES_SCHEMA.split(';') {
            let statement = statement.trim();
            if statement.is_empty() || statement.lines().all(|l| l.trim().starts_with("--")) {
                continue;
            }
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
