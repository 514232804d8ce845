use sea_orm::FromQueryResult;
use tracing::{info, warn};

use super::{Backend, Database, StoreError};

const SQLITE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const SQLITE_STUDENTS: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    full_name TEXT NOT NULL,
    batch_number TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    department TEXT,
    society_affiliation TEXT,
    interests TEXT,
    emergency_contact TEXT,
    dietary_preferences TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id)
)";

const POSTGRES_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const POSTGRES_STUDENTS: &str = "CREATE TABLE IF NOT EXISTS students (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    full_name TEXT NOT NULL,
    batch_number TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    department TEXT,
    society_affiliation TEXT,
    interests TEXT,
    emergency_contact TEXT,
    dietary_preferences TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Listing is always newest first.
const STUDENTS_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_students_created_at ON students (created_at)";

const LEGACY_PASSWORD_COLUMN: &str = "password_hash";
const PASSWORD_COLUMN: &str = "password";

#[derive(FromQueryResult)]
struct ColumnName {
    name: String,
}

/// Create both tables if missing and apply the legacy column rename.
///
/// Safe to run on every start.
pub async fn bootstrap(db: &Database) -> Result<(), StoreError> {
    let (users, students) = match db.backend() {
        Backend::Sqlite => (SQLITE_USERS, SQLITE_STUDENTS),
        Backend::Postgres => (POSTGRES_USERS, POSTGRES_STUDENTS),
    };

    db.execute_unprepared(users).await?;
    rename_legacy_password_column(db).await?;
    db.execute_unprepared(students).await?;

    if let Err(e) = db.execute_unprepared(STUDENTS_CREATED_INDEX).await {
        warn!("Failed to create index idx_students_created_at: {}", e);
    }

    info!(backend = db.backend().name(), "Schema ready");
    Ok(())
}

/// Older deployments stored the credential in `users.password_hash`.
///
/// Renames it to `password` when only the legacy column is present; any other
/// layout is left alone.
pub async fn rename_legacy_password_column(db: &Database) -> Result<bool, StoreError> {
    let columns = table_columns(db, "users").await?;
    let has_legacy = columns.iter().any(|c| c == LEGACY_PASSWORD_COLUMN);
    let has_current = columns.iter().any(|c| c == PASSWORD_COLUMN);

    if !has_legacy || has_current {
        return Ok(false);
    }

    db.execute_unprepared("ALTER TABLE users RENAME COLUMN password_hash TO password")
        .await?;
    info!("Renamed users.password_hash to users.password");
    Ok(true)
}

async fn table_columns(db: &Database, table: &str) -> Result<Vec<String>, StoreError> {
    let sql = match db.backend() {
        Backend::Sqlite => "SELECT name FROM pragma_table_info(?)",
        Backend::Postgres => {
            "SELECT column_name::text AS name FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = ?"
        }
    };

    let rows: Vec<ColumnName> = db.query_all(sql, vec![table.into()]).await?;
    Ok(rows.into_iter().map(|c| c.name).collect())
}
