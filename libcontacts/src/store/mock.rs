//! In-memory contact store for testing
//!
//! Keeps contacts in a vector, records every call made against it, and can
//! be told to fail mutations or delay them. Orders contacts the same way the
//! SQLite store does: ascending by the sort column, then by id.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;

use super::{ContactStore, LiveQuery};
use crate::error::{StorageError, StorageResult};
use crate::types::{Contact, SortOrder};

/// A call received by the mock store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upsert(Contact),
    Delete(Contact),
    Query(SortOrder),
}

#[derive(Default)]
struct Table {
    rows: Vec<Contact>,
    next_id: i64,
}

/// Recording in-memory store
#[derive(Clone)]
pub struct MockContactStore {
    table: Arc<Mutex<Table>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_mutations: Arc<AtomicBool>,
    delay: Duration,
    changes: broadcast::Sender<()>,
}

impl Default for MockContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContactStore {
    /// Create an empty store that always succeeds
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            table: Arc::new(Mutex::new(Table {
                rows: Vec::new(),
                next_id: 1,
            })),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_mutations: Arc::new(AtomicBool::new(false)),
            delay: Duration::from_millis(0),
            changes,
        }
    }

    /// Create a store pre-filled with `contacts` (ids are assigned)
    ///
    /// Seeding is not recorded as calls.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let store = Self::new();
        {
            let mut table = store.table.lock().unwrap();
            for contact in contacts {
                let id = table.next_id;
                table.next_id += 1;
                table.rows.push(contact.with_id(id));
            }
        }
        store
    }

    /// Delay every mutation (simulates slow storage)
    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Make upserts and deletes fail (or succeed again)
    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Contacts passed to `upsert`, in order
    pub fn upserts(&self) -> Vec<Contact> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Upsert(contact) => Some(contact),
                _ => None,
            })
            .collect()
    }

    /// Contacts passed to `delete`, in order
    pub fn deletes(&self) -> Vec<Contact> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(contact) => Some(contact),
                _ => None,
            })
            .collect()
    }

    /// Orders passed to `query_ordered_by`, in order
    pub fn queries(&self) -> Vec<SortOrder> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Query(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    /// Number of live queries that have not been dropped
    pub fn active_queries(&self) -> usize {
        self.changes.receiver_count()
    }

    /// Current rows in `order`
    pub fn snapshot(&self, order: SortOrder) -> Vec<Contact> {
        sorted(&self.table.lock().unwrap().rows, order)
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn before_mutation(&self) -> StorageResult<()> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("mock store configured to fail".to_string()));
        }
        Ok(())
    }
}

fn sorted(rows: &[Contact], order: SortOrder) -> Vec<Contact> {
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| order.key(a).cmp(order.key(b)).then(a.id.cmp(&b.id)));
    rows
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn upsert(&self, contact: &Contact) -> StorageResult<i64> {
        self.record(StoreCall::Upsert(contact.clone()));
        self.before_mutation().await?;

        let id = {
            let mut table = self.table.lock().unwrap();
            match contact.id {
                Some(id) => {
                    table.rows.retain(|row| row.id != Some(id));
                    table.rows.push(contact.clone());
                    table.next_id = table.next_id.max(id + 1);
                    id
                }
                None => {
                    let id = table.next_id;
                    table.next_id += 1;
                    table.rows.push(contact.clone().with_id(id));
                    id
                }
            }
        };

        let _ = self.changes.send(());
        Ok(id)
    }

    async fn delete(&self, contact: &Contact) -> StorageResult<()> {
        self.record(StoreCall::Delete(contact.clone()));
        self.before_mutation().await?;

        let removed = {
            let mut table = self.table.lock().unwrap();
            let before = table.rows.len();
            table.rows.retain(|row| row.id.is_none() || row.id != contact.id);
            table.rows.len() != before
        };

        if removed {
            let _ = self.changes.send(());
        }
        Ok(())
    }

    fn query_ordered_by(&self, order: SortOrder) -> LiveQuery {
        self.record(StoreCall::Query(order));
        let table = Arc::clone(&self.table);
        LiveQuery::spawn(order, self.changes.subscribe(), move || {
            let rows = sorted(&table.lock().unwrap().rows, order);
            async move { Ok(rows) }
        })
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.table.lock().unwrap().rows.len())
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Contact>> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|row| row.id == Some(id))
            .cloned())
    }
}
