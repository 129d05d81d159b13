//! Service layer adapter for TUI
//!
//! Bridges the async `ContactController` to the synchronous TUI event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle`: owns the tokio runtime and the controller
//! - Events: `dispatch` forwards user intents; it never blocks on the store
//! - Snapshots: the controller's watch channel is bridged to a crossbeam
//!   receiver the event loop drains between polls
//! - Failures: the broadcast channel of failed mutations is bridged the same
//!   way
//!
//! # Example
//!
//! ```no_run
//! use contacts_tui::services::ServiceHandle;
//! use libcontacts::{Config, ContactEvent};
//!
//! # fn example() -> contacts_tui::Result<()> {
//! let services = ServiceHandle::new(&Config::load()?)?;
//! let views = services.subscribe();
//!
//! services.dispatch(ContactEvent::ShowDialog);
//!
//! if let Ok(view) = views.try_recv() {
//!     println!("{} contacts", view.contacts.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use crossbeam_channel::{unbounded, Receiver};
use libcontacts::config::SessionConfig;
use libcontacts::service::{ContactController, ContactEvent, MutationFailure, MutationKind, ViewState};
use libcontacts::{Config, ContactStore};
use tokio::sync::broadcast::error::RecvError;
use crate::error::Result;

/// Service handle for TUI operations
pub struct ServiceHandle {
    // Dropped before the runtime so the merge task is aborted cleanly
    controller: ContactController,
    runtime: tokio::runtime::Runtime,
}

impl ServiceHandle {
    /// Open the database named in `config` and start a session over it
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created or the
    /// database cannot be opened.
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let controller = runtime.block_on(ContactController::from_config(config))?;

        Ok(Self { controller, runtime })
    }

    /// Start a session over an injected store
    pub fn with_store(store: Arc<dyn ContactStore>, session: &SessionConfig) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let controller = {
            let _guard = runtime.enter();
            ContactController::new(store, session)
        };

        Ok(Self { controller, runtime })
    }

    /// Forward a user intent to the controller
    pub fn dispatch(&self, event: ContactEvent) {
        self.controller.on_event(event);
    }

    /// Current snapshot
    pub fn view_state(&self) -> ViewState {
        self.controller.view_state()
    }

    /// Subscribe to view state snapshots
    ///
    /// The current snapshot is delivered first. Holding the receiver keeps
    /// the live query running.
    pub fn subscribe(&self) -> Receiver<ViewState> {
        let (tx, rx) = unbounded();
        let mut view_rx = self.controller.subscribe();

        self.runtime.spawn(async move {
            loop {
                let snapshot = view_rx.borrow_and_update().clone();
                if tx.send(snapshot).is_err() {
                    // Receiver dropped, stop forwarding
                    break;
                }
                if view_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        rx
    }

    /// Subscribe to failed store mutations
    pub fn subscribe_failures(&self) -> Receiver<MutationFailure> {
        let (tx, rx) = unbounded();
        let mut failure_rx = self.controller.subscribe_failures();

        self.runtime.spawn(async move {
            loop {
                match failure_rx.recv().await {
                    Ok(failure) => {
                        if tx.send(failure).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Failure receiver lagged, skipped {} failures", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        rx
    }
}

/// One-line description of a failed mutation for the error overlay
pub fn describe_failure(failure: &MutationFailure) -> String {
    let verb = match failure.kind {
        MutationKind::Upsert => "save",
        MutationKind::Delete => "delete",
    };
    format!(
        "Could not {} {}: {}",
        verb,
        failure.contact.display_name(),
        failure.error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcontacts::Contact;

    #[test]
    fn test_describe_failure() {
        let failure = MutationFailure {
            kind: MutationKind::Delete,
            contact: Contact::new("Ana", "Pop", "12345"),
            error: "database is locked".to_string(),
        };

        assert_eq!(
            describe_failure(&failure),
            "Could not delete Ana Pop: database is locked"
        );
    }
}
