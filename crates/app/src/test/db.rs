//! Throw-away Postgres databases for service tests.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const DB_USER: &str = "rave_test";
const DB_PASSWORD: &str = "rave_test_password";

/// Database names are interpolated into DDL, so only plain identifiers pass.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("Database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("Database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Database name can only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(DB_USER)
        .with_password(DB_PASSWORD)
        .with_db_name("rave_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// Shared container, started by the first test that needs it.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

async fn server_url(database: &str) -> Option<String> {
    let container = POSTGRES_CONTAINER.get()?;
    let port = container.get_host_port_ipv4(5432).await.ok()?;
    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    Some(format!(
        "postgresql://{DB_USER}:{DB_PASSWORD}@{host}:{port}/{database}"
    ))
}

async fn cleanup_database(db_name: &str) -> Result<(), sqlx::Error> {
    if validate_database_name(db_name).is_err() {
        return Ok(());
    }

    if let Some(url) = server_url("postgres").await {
        let mut conn = PgConnection::connect(&url).await?;

        sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\""))
            .execute(&mut conn)
            .await?;

        conn.close().await?;
    }

    Ok(())
}

/// A uniquely named, migrated database inside the shared container.
///
/// Every test gets its own database, so services commit normally and no
/// rollback tricks are needed. The database is dropped in the background when
/// the `TestDb` goes out of scope.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let name = format!("rave_test_{}", uuid::Uuid::now_v7().simple());

        Self::new_with_db_name(&name).await
    }

    pub async fn new_with_db_name(db_name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(db_name) {
            panic!("Invalid database name '{db_name}': {error}");
        }

        POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        let admin_url = server_url("postgres")
            .await
            .expect("Failed to resolve container address");

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let database_url = server_url(db_name)
            .await
            .expect("Failed to resolve container address");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create pool for database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name: db_name.to_string(),
        }
    }

    /// Begin a transaction that rolls back when dropped.
    #[allow(dead_code)]
    pub async fn begin_test_transaction(&self) -> Transaction<'_, Postgres> {
        self.pool
            .begin()
            .await
            .expect("Failed to start test transaction")
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_are_valid_database_names() {
        assert!(validate_database_name("valid_name").is_ok());
        assert!(validate_database_name("_underscore_start").is_ok());
        assert!(validate_database_name("rave_test_0190a1b2c3").is_ok());
    }

    #[test]
    fn empty_and_oversized_names_are_rejected() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn names_must_start_with_a_letter_or_underscore() {
        assert!(validate_database_name("123invalid").is_err());
        assert!(validate_database_name("-invalid").is_err());
    }

    #[test]
    fn punctuation_is_rejected() {
        assert!(validate_database_name("invalid-hyphen").is_err());
        assert!(validate_database_name("invalid\"quote").is_err());
        assert!(validate_database_name("invalid space").is_err());
    }

    #[tokio::test]
    async fn migrated_database_accepts_queries() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'promotions'",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to execute test query");

        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_transactions_roll_back_on_drop() {
        let test_db = TestDb::new().await;

        {
            let mut tx = test_db.begin_test_transaction().await;

            sqlx::query("CREATE TABLE scratch (id INTEGER)")
                .execute(&mut *tx)
                .await
                .expect("Failed to create table");
        }

        let result = sqlx::query("SELECT COUNT(*) FROM scratch")
            .fetch_one(test_db.pool())
            .await;

        assert!(result.is_err());
    }
}
