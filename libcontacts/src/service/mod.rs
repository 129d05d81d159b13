//! Session controller for the contact screen
//!
//! `ContactController` is the single entry point the presentation layer
//! talks to. It owns the transient form state, the active sort order, and a
//! background merge task that keeps one live store query running and folds
//! its results into the published `ViewState`.
//!
//! # Architecture
//!
//! - `state`: `ViewState`, `FormState`, `ContactEvent` and the pure `reduce`
//! - `sort`: the `SortSelector` watch cell
//! - this module: event dispatch, fire-and-forget store mutations, and the
//!   merge loop (resubscription on sort change, grace-period teardown)
//!
//! # Example
//!
//! ```no_run
//! use libcontacts::service::{ContactController, ContactEvent};
//! use libcontacts::Config;
//!
//! # async fn example() -> libcontacts::Result<()> {
//! let controller = ContactController::from_config(&Config::load()?).await?;
//! let mut view = controller.subscribe();
//!
//! controller.on_event(ContactEvent::ShowDialog);
//! controller.on_event(ContactEvent::SetFirstName("Ana".to_string()));
//! controller.on_event(ContactEvent::SetLastName("Pop".to_string()));
//! controller.on_event(ContactEvent::SetPhoneNumber("12345".to_string()));
//! controller.on_event(ContactEvent::SaveContact);
//!
//! while view.changed().await.is_ok() {
//!     println!("{} contacts", view.borrow().contacts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod sort;
pub mod state;

pub use sort::SortSelector;
pub use state::{ContactEvent, Effect, FormState, ViewState};

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;

use crate::config::{resolve_db_path, Config, SessionConfig};
use crate::error::{ConfigError, ContactsError, Result};
use crate::store::{ContactStore, LiveQuery, SqliteContactStore};
use crate::types::{Contact, SortOrder};

/// Failures kept for slow subscribers before the oldest are dropped
const FAILURE_BUFFER: usize = 32;

/// Which store mutation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Upsert,
    Delete,
}

/// A store mutation that failed after its event was handled
///
/// The optimistic form state is not rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationFailure {
    pub kind: MutationKind,
    pub contact: Contact,
    pub error: String,
}

/// Per-session controller
///
/// Must be constructed inside a tokio runtime; `on_event` may then be called
/// from any thread.
pub struct ContactController {
    store: Arc<dyn ContactStore>,
    runtime: Handle,
    form: watch::Sender<FormState>,
    sort: SortSelector,
    view: Arc<watch::Sender<ViewState>>,
    subscribed: Arc<Notify>,
    failures: broadcast::Sender<MutationFailure>,
    merge_task: JoinHandle<()>,
}

impl ContactController {
    /// Create a controller over an injected store
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(store: Arc<dyn ContactStore>, session: &SessionConfig) -> Self {
        let runtime = Handle::current();
        let sort = SortSelector::new(session.default_sort);
        let (form, _) = watch::channel(FormState::default());
        let (view, _) = watch::channel(ViewState {
            sort_order: session.default_sort,
            ..ViewState::default()
        });
        let view = Arc::new(view);
        let subscribed = Arc::new(Notify::new());
        let (failures, _) = broadcast::channel(FAILURE_BUFFER);

        let merge_task = runtime.spawn(run_merge(
            Arc::clone(&store),
            sort.subscribe(),
            Arc::clone(&view),
            Arc::clone(&subscribed),
            session.grace_period(),
        ));

        tracing::info!(sort = %session.default_sort, "Contact session started");

        Self {
            store,
            runtime,
            form,
            sort,
            view,
            subscribed,
            failures,
            merge_task,
        }
    }

    /// Create a controller backed by the SQLite database named in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database path is invalid, or the database
    /// cannot be opened or migrated.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let db_path = resolve_db_path(Some(&config.database.path))?;
        let db_path_str = db_path.to_str().ok_or_else(|| {
            ContactsError::Config(ConfigError::InvalidValue {
                field: "database.path".to_string(),
                value: db_path.display().to_string(),
            })
        })?;

        let store = SqliteContactStore::open(db_path_str).await?;
        tracing::info!(path = %db_path.display(), "Opened contact database");

        Ok(Self::new(Arc::new(store), &config.session))
    }

    /// Handle one user intent
    ///
    /// Returns as soon as the form state is updated; store mutations run in
    /// the background and are not awaited.
    pub fn on_event(&self, event: ContactEvent) {
        tracing::trace!(?event, "Contact event");

        let mut effect = None;
        self.form.send_if_modified(|form| {
            let (next, requested) = state::reduce(form.clone(), &event);
            effect = requested;
            if next == *form {
                return false;
            }
            self.view.send_modify(|view| {
                let contacts = std::mem::take(&mut view.contacts);
                *view = ViewState::merge(&next, view.sort_order, contacts);
            });
            *form = next;
            true
        });

        match effect {
            Some(Effect::Upsert(contact)) => self.spawn_mutation(MutationKind::Upsert, contact),
            Some(Effect::Delete(contact)) => self.spawn_mutation(MutationKind::Delete, contact),
            Some(Effect::Sort(order)) => {
                self.sort.set_sort_order(order);
            }
            None => {}
        }
    }

    fn spawn_mutation(&self, kind: MutationKind, contact: Contact) {
        let store = Arc::clone(&self.store);
        let failures = self.failures.clone();

        // Result is reported, never awaited by the caller
        self.runtime.spawn(async move {
            let result = match kind {
                MutationKind::Upsert => store.upsert(&contact).await.map(|id| {
                    tracing::info!(id, "Contact saved");
                }),
                MutationKind::Delete => store.delete(&contact).await.map(|()| {
                    tracing::info!(id = ?contact.id, "Contact deleted");
                }),
            };

            if let Err(e) = result {
                tracing::error!(?kind, id = ?contact.id, error = %e, "Contact store mutation failed");
                let _ = failures.send(MutationFailure {
                    kind,
                    contact,
                    error: e.to_string(),
                });
            }
        });
    }

    /// Subscribe to view state snapshots
    ///
    /// Starts the live query if it was torn down.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        let receiver = self.view.subscribe();
        self.subscribed.notify_one();
        receiver
    }

    /// Current view state
    pub fn view_state(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Current transient form state
    pub fn form_state(&self) -> FormState {
        self.form.borrow().clone()
    }

    /// Sort order selected by the last `SortContacts`
    ///
    /// May be ahead of `view_state().sort_order` until the new query emits.
    pub fn selected_sort_order(&self) -> SortOrder {
        self.sort.current()
    }

    /// Subscribe to background mutation failures
    pub fn subscribe_failures(&self) -> broadcast::Receiver<MutationFailure> {
        self.failures.subscribe()
    }
}

impl Drop for ContactController {
    fn drop(&mut self) {
        self.merge_task.abort();
        tracing::debug!("Contact session ended");
    }
}

async fn run_merge(
    store: Arc<dyn ContactStore>,
    mut sort_rx: watch::Receiver<SortOrder>,
    view: Arc<watch::Sender<ViewState>>,
    subscribed: Arc<Notify>,
    grace: Duration,
) {
    let mut active: Option<LiveQuery> = None;

    loop {
        if active.is_none() {
            if view.receiver_count() == 0 {
                subscribed.notified().await;
                continue;
            }
            let order = *sort_rx.borrow_and_update();
            active = Some(store.query_ordered_by(order));
        }

        let Some(query) = active.as_mut() else {
            continue;
        };
        let active_order = query.order();

        tokio::select! {
            changed = sort_rx.changed() => {
                if changed.is_err() {
                    // Controller dropped
                    break;
                }
                let order = *sort_rx.borrow_and_update();
                if order != active_order {
                    // Dropping the old query closes its channel, so none of
                    // its lists can arrive after this point
                    drop(active.take());
                    active = Some(store.query_ordered_by(order));
                    tracing::debug!(%order, "Resubscribed contact query");
                }
            }

            emission = query.next() => match emission {
                Some(contacts) => {
                    tracing::trace!(order = %active_order, count = contacts.len(), "Contacts emitted");
                    // Sort order and rows change together
                    view.send_modify(|state| {
                        let form = state.form();
                        *state = ViewState::merge(&form, active_order, contacts);
                    });
                }
                None => {
                    tracing::warn!("Contact store closed, stopping live updates");
                    break;
                }
            },

            _ = view.closed() => {
                tokio::select! {
                    _ = tokio::time::sleep(grace) => {
                        if view.receiver_count() == 0 {
                            active = None;
                            tracing::debug!("No view subscribers, live query torn down");
                        }
                    }
                    _ = subscribed.notified() => {}
                }
            }
        }
    }
}
