//! Database operations for the contact store

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

use crate::error::{StorageError, StorageResult};
use crate::types::{Contact, SortOrder};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and run migrations
    pub async fn new(db_path: &str) -> StorageResult<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::IoError)?;
        }

        // mode=rwc creates the file if it doesn't exist
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(StorageError::SqlxError)?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database
    ///
    /// Limited to one connection that is never recycled, since every SQLite
    /// connection to `:memory:` sees its own empty database.
    pub async fn in_memory() -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(StorageError::SqlxError)?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StorageError::MigrationError)?;

        tracing::debug!("Contact database ready");
        Ok(Self { pool })
    }

    /// Insert a contact without an id, or replace the row with its id
    ///
    /// Returns the id of the stored row.
    pub async fn upsert_contact(&self, contact: &Contact) -> StorageResult<i64> {
        let id = match contact.id {
            None => sqlx::query(
                r#"
                INSERT INTO Contact (firstName, lastName, phoneNumber)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.phone_number)
            .execute(&self.pool)
            .await
            .map_err(StorageError::SqlxError)?
            .last_insert_rowid(),
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO Contact (id, firstName, lastName, phoneNumber)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        firstName = excluded.firstName,
                        lastName = excluded.lastName,
                        phoneNumber = excluded.phoneNumber
                    "#,
                )
                .bind(id)
                .bind(&contact.first_name)
                .bind(&contact.last_name)
                .bind(&contact.phone_number)
                .execute(&self.pool)
                .await
                .map_err(StorageError::SqlxError)?;
                id
            }
        };

        Ok(id)
    }

    /// Delete a contact by id
    ///
    /// Returns whether a row was removed. Contacts without an id are never
    /// stored, so deleting one removes nothing.
    pub async fn delete_contact(&self, contact: &Contact) -> StorageResult<bool> {
        let Some(id) = contact.id else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM Contact WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::SqlxError)?;

        Ok(result.rows_affected() > 0)
    }

    /// All contacts, ascending by the column of `order`
    pub async fn contacts_ordered_by(&self, order: SortOrder) -> StorageResult<Vec<Contact>> {
        // Column names come from a closed enum, never from user input
        let query_str = format!(
            r#"
            SELECT id, firstName, lastName, phoneNumber
            FROM Contact
            ORDER BY {} ASC, id ASC
            "#,
            order.column()
        );

        let rows = sqlx::query(&query_str)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::SqlxError)?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    /// Get a contact by id
    pub async fn get_contact(&self, id: i64) -> StorageResult<Option<Contact>> {
        let row = sqlx::query(
            r#"
            SELECT id, firstName, lastName, phoneNumber
            FROM Contact
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::SqlxError)?;

        Ok(row.as_ref().map(contact_from_row))
    }

    /// Number of stored contacts
    pub async fn count_contacts(&self) -> StorageResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Contact")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::SqlxError)?;

        Ok(count as usize)
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> Contact {
    Contact {
        id: Some(row.get("id")),
        first_name: row.get("firstName"),
        last_name: row.get("lastName"),
        phone_number: row.get("phoneNumber"),
    }
}
