//! Query-execution facade over the embedded SQLite file and a PostgreSQL pool.
//!
//! The backend is chosen once in [`Database::connect`]. Everything above this
//! module writes plain SQL with positional values and never branches on which
//! engine is underneath.

pub mod error;
pub mod placeholder;
pub mod schema;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbBackend,
    FromQueryResult, Statement, Value,
};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

pub use error::StoreError;
pub use placeholder::PlaceholderStyle;

/// Storage engine selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Backend::Sqlite => PlaceholderStyle::Question,
            Backend::Postgres => PlaceholderStyle::Numbered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
        }
    }

    fn db_backend(self) -> DbBackend {
        match self {
            Backend::Sqlite => DbBackend::Sqlite,
            Backend::Postgres => DbBackend::Postgres,
        }
    }
}

/// Result of [`Database::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Primary key generated by an `INSERT`; `None` for other statements.
    pub last_insert_id: Option<i64>,
    pub rows_affected: u64,
}

#[derive(FromQueryResult)]
struct InsertedId {
    id: i32,
}

#[derive(Clone)]
pub struct Database {
    conn: DatabaseConnection,
    backend: Backend,
    query_timeout: Duration,
}

impl Database {
    /// Open the configured backend: `url` if present, otherwise the SQLite
    /// file at `sqlite_path`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let (url, backend) = match config.url.as_deref() {
            Some(url) => (url.to_owned(), backend_for_url(url)?),
            None => {
                let path = Path::new(&config.sqlite_path);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                (
                    format!("sqlite://{}?mode=rwc", path.display()),
                    Backend::Sqlite,
                )
            }
        };

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .sqlx_logging(config.sqlx_logging);

        let conn = SeaDatabase::connect(opt).await?;
        let db = Self {
            conn,
            backend,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        };

        if backend == Backend::Sqlite {
            db.conn
                .execute_unprepared("PRAGMA journal_mode = WAL")
                .await?;
        }

        info!(backend = backend.name(), "Database connected");
        Ok(db)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Run an `INSERT`, `UPDATE`, `DELETE` or DDL statement.
    ///
    /// For inserts the generated `id` is returned: through `RETURNING id` on
    /// PostgreSQL, or the statement's own last-insert-rowid on SQLite.
    pub async fn execute(&self, sql: &str, values: Vec<Value>) -> Result<ExecOutcome, StoreError> {
        let is_insert = is_insert(sql);

        if is_insert && self.backend == Backend::Postgres {
            let returning = format!("{} RETURNING id", sql.trim_end().trim_end_matches(';'));
            let stmt = self.statement(&returning, values)?;
            let rows = self.timed(self.conn.query_all_raw(stmt)).await?;
            let last = rows.last().ok_or(StoreError::MissingInsertId)?;
            let inserted = InsertedId::from_query_result(last, "")?;
            return Ok(ExecOutcome {
                last_insert_id: Some(i64::from(inserted.id)),
                rows_affected: rows.len() as u64,
            });
        }

        let stmt = self.statement(sql, values)?;
        let result = self.timed(self.conn.execute_raw(stmt)).await?;
        let last_insert_id = if is_insert {
            let id = i64::try_from(result.last_insert_id())
                .map_err(|_| StoreError::MissingInsertId)?;
            Some(id)
        } else {
            None
        };

        Ok(ExecOutcome {
            last_insert_id,
            rows_affected: result.rows_affected(),
        })
    }

    /// Fetch every row matching the query.
    pub async fn query_all<T: FromQueryResult>(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<T>, StoreError> {
        let stmt = self.statement(sql, values)?;
        let rows = self.timed(self.conn.query_all_raw(stmt)).await?;
        rows.iter()
            .map(|row| T::from_query_result(row, "").map_err(StoreError::from))
            .collect()
    }

    /// Fetch the first row matching the query, if any.
    pub async fn query_one<T: FromQueryResult>(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Option<T>, StoreError> {
        let stmt = self.statement(sql, values)?;
        let row = self.timed(self.conn.query_one_raw(stmt)).await?;
        row.map(|r| T::from_query_result(&r, "").map_err(StoreError::from))
            .transpose()
    }

    /// Run statements that take no parameters (DDL, pragmas).
    pub async fn execute_unprepared(&self, sql: &str) -> Result<(), StoreError> {
        self.timed(self.conn.execute_unprepared(sql)).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.timed(self.conn.ping()).await
    }

    fn statement(&self, sql: &str, values: Vec<Value>) -> Result<Statement, StoreError> {
        let (sql, values) = placeholder::rewrite(sql, values, self.backend.placeholder_style())?;
        debug!(backend = self.backend.name(), %sql, "Prepared statement");
        Ok(Statement::from_sql_and_values(
            self.backend.db_backend(),
            sql,
            values,
        ))
    }

    /// Bound a single round-trip by the configured query timeout. Dropping the
    /// future on expiry returns its pooled connection.
    async fn timed<T, E, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, E>>,
        StoreError: From<E>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        }
    }
}

fn backend_for_url(url: &str) -> Result<Backend, StoreError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Backend::Postgres)
    } else if url.starts_with("sqlite:") {
        Ok(Backend::Sqlite)
    } else {
        let scheme = url.split(':').next().unwrap_or_default();
        Err(StoreError::UnsupportedBackend(scheme.to_owned()))
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("insert"))
}
