//! Contact store abstraction and implementations
//!
//! The controller only talks to a `ContactStore`, so the persistence layer is
//! injected: `SqliteContactStore` in the application, `MockContactStore` in
//! tests.
//!
//! # Examples
//!
//! ```no_run
//! use futures::StreamExt;
//! use libcontacts::store::{ContactStore, SqliteContactStore};
//! use libcontacts::{Contact, SortOrder};
//!
//! # async fn example() -> libcontacts::Result<()> {
//! let store = SqliteContactStore::open("~/.local/share/contacts/Contact.db").await?;
//!
//! let mut by_last_name = store.query_ordered_by(SortOrder::LastName);
//! store.upsert(&Contact::new("Ana", "Pop", "12345")).await?;
//!
//! while let Some(contacts) = by_last_name.next().await {
//!     println!("{} contacts", contacts.len());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::db::Database;
use crate::error::StorageResult;
use crate::types::{Contact, SortOrder};

pub mod live;
// Available outside tests so integration tests and downstream crates can use it
pub mod mock;

pub use live::LiveQuery;
pub use mock::{MockContactStore, StoreCall};

/// Buffered change notifications per live query
const CHANGE_BUFFER: usize = 64;

/// Durable contact storage consumed by the controller
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a contact without an id, or replace the stored one with the
    /// same id. Returns the id of the stored record.
    ///
    /// Every live query re-emits after a successful upsert.
    async fn upsert(&self, contact: &Contact) -> StorageResult<i64>;

    /// Remove a contact by id
    ///
    /// Removing a contact that is not stored succeeds without effect.
    async fn delete(&self, contact: &Contact) -> StorageResult<()>;

    /// Subscribe to the full contact list in `order`
    ///
    /// Each call returns an independent subscription. Must be called from
    /// within a tokio runtime.
    fn query_ordered_by(&self, order: SortOrder) -> LiveQuery;

    /// Number of stored contacts
    async fn count(&self) -> StorageResult<usize>;

    /// Look up a contact by id
    async fn get(&self, id: i64) -> StorageResult<Option<Contact>>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteContactStore {
    db: Arc<Database>,
    changes: broadcast::Sender<()>,
}

impl SqliteContactStore {
    pub fn new(db: Database) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            db: Arc::new(db),
            changes,
        }
    }

    /// Open the database file at `path` (created if missing)
    pub async fn open(path: &str) -> StorageResult<Self> {
        Ok(Self::new(Database::new(path).await?))
    }

    /// Store backed by a private in-memory database
    pub async fn in_memory() -> StorageResult<Self> {
        Ok(Self::new(Database::in_memory().await?))
    }

    /// Number of live queries currently subscribed to changes
    pub fn active_queries(&self) -> usize {
        self.changes.receiver_count()
    }

    fn notify_changed(&self) {
        // No live queries is fine
        let _ = self.changes.send(());
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn upsert(&self, contact: &Contact) -> StorageResult<i64> {
        let id = self.db.upsert_contact(contact).await?;
        tracing::debug!(id, "Contact upserted");
        self.notify_changed();
        Ok(id)
    }

    async fn delete(&self, contact: &Contact) -> StorageResult<()> {
        if self.db.delete_contact(contact).await? {
            tracing::debug!(id = ?contact.id, "Contact deleted");
            self.notify_changed();
        }
        Ok(())
    }

    fn query_ordered_by(&self, order: SortOrder) -> LiveQuery {
        let db = Arc::clone(&self.db);
        LiveQuery::spawn(order, self.changes.subscribe(), move || {
            let db = Arc::clone(&db);
            async move { db.contacts_ordered_by(order).await }
        })
    }

    async fn count(&self) -> StorageResult<usize> {
        self.db.count_contacts().await
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Contact>> {
        self.db.get_contact(id).await
    }
}
