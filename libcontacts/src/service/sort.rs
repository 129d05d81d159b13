//! Active sort order
//!
//! A `watch` cell holding the current `SortOrder`. Setting the current value
//! again does not notify subscribers, so it never causes a resubscription.

use tokio::sync::watch;

use crate::types::SortOrder;

pub struct SortSelector {
    sender: watch::Sender<SortOrder>,
}

impl SortSelector {
    pub fn new(initial: SortOrder) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn current(&self) -> SortOrder {
        *self.sender.borrow()
    }

    /// Switch to `order`
    ///
    /// Returns `false` and notifies nobody when `order` is already active.
    pub fn set_sort_order(&self, order: SortOrder) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == order {
                false
            } else {
                *current = order;
                true
            }
        });

        if changed {
            tracing::debug!(%order, "Sort order changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<SortOrder> {
        self.sender.subscribe()
    }
}

impl Default for SortSelector {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_first_name() {
        assert_eq!(SortSelector::default().current(), SortOrder::FirstName);
    }

    #[test]
    fn test_switch_notifies_subscribers() {
        let selector = SortSelector::default();
        let mut rx = selector.subscribe();

        assert!(selector.set_sort_order(SortOrder::PhoneNumber));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SortOrder::PhoneNumber);
    }

    #[test]
    fn test_same_order_is_noop() {
        let selector = SortSelector::new(SortOrder::LastName);
        let rx = selector.subscribe();

        assert!(!selector.set_sort_order(SortOrder::LastName));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(selector.current(), SortOrder::LastName);
    }
}
