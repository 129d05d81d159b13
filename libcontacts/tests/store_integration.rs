//! Integration tests for the SQLite-backed contact store
//!
//! Uses temporary database files so persistence across reopen is covered.

use std::time::Duration;

use libcontacts::config::{Config, DatabaseConfig, SessionConfig};
use libcontacts::service::{ContactController, ContactEvent};
use libcontacts::store::{ContactStore, SqliteContactStore};
use futures::StreamExt;
use libcontacts::{Contact, SortOrder};
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

async fn setup_test_store() -> (SqliteContactStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("Contact.db");
    let store = SqliteContactStore::open(db_path.to_str().unwrap()).await.unwrap();
    (store, temp_dir)
}

async fn next_list(query: &mut libcontacts::LiveQuery) -> Vec<Contact> {
    timeout(Duration::from_secs(2), query.next())
        .await
        .expect("timed out waiting for live query")
        .expect("live query closed")
}

#[tokio::test]
async fn test_live_query_emits_full_list_after_each_mutation() {
    let (store, _temp_dir) = setup_test_store().await;
    let mut query = store.query_ordered_by(SortOrder::LastName);

    assert!(next_list(&mut query).await.is_empty());

    let pop = store.upsert(&Contact::new("Ana", "Pop", "0799")).await.unwrap();
    assert_eq!(next_list(&mut query).await.len(), 1);

    store.upsert(&Contact::new("Radu", "Albu", "0711")).await.unwrap();
    let contacts = next_list(&mut query).await;
    let last_names: Vec<&str> = contacts.iter().map(|c| c.last_name.as_str()).collect();
    assert_eq!(last_names, vec!["Albu", "Pop"]);

    store.delete(&Contact::new("Ana", "Pop", "0799").with_id(pop)).await.unwrap();
    let contacts = next_list(&mut query).await;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].first_name, "Radu");
}

#[tokio::test]
async fn test_independent_queries_per_order() {
    let (store, _temp_dir) = setup_test_store().await;
    store.upsert(&Contact::new("Mara", "Ionescu", "0722")).await.unwrap();
    store.upsert(&Contact::new("Ana", "Pop", "0799")).await.unwrap();

    let mut by_first = store.query_ordered_by(SortOrder::FirstName);
    let mut by_phone = store.query_ordered_by(SortOrder::PhoneNumber);
    assert_eq!(store.active_queries(), 2);

    assert_eq!(next_list(&mut by_first).await[0].first_name, "Ana");
    assert_eq!(next_list(&mut by_phone).await[0].first_name, "Mara");

    drop(by_first);
    for _ in 0..100 {
        if store.active_queries() == 1 {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.active_queries(), 1);
}

#[tokio::test]
async fn test_deleting_absent_contact_succeeds_without_emission() {
    let (store, _temp_dir) = setup_test_store().await;
    let mut query = store.query_ordered_by(SortOrder::FirstName);
    next_list(&mut query).await;

    store.delete(&Contact::new("No", "Body", "0").with_id(77)).await.unwrap();

    let quiet = timeout(Duration::from_millis(100), query.next()).await;
    assert!(quiet.is_err(), "no change should mean no emission");
}

#[tokio::test]
async fn test_contacts_persist_across_reopen() {
    let (store, temp_dir) = setup_test_store().await;
    let id = store.upsert(&Contact::new("Ana", "Pop", "12345")).await.unwrap();
    drop(store);

    let db_path = temp_dir.path().join("Contact.db");
    let reopened = SqliteContactStore::open(db_path.to_str().unwrap()).await.unwrap();

    assert_eq!(reopened.count().await.unwrap(), 1);
    assert_eq!(
        reopened.get(id).await.unwrap(),
        Some(Contact::new("Ana", "Pop", "12345").with_id(id))
    );
}

#[tokio::test]
async fn test_controller_from_config_saves_to_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("data").join("Contact.db");
    let config = Config {
        database: DatabaseConfig {
            path: db_path.to_str().unwrap().to_string(),
        },
        session: SessionConfig {
            default_sort: SortOrder::PhoneNumber,
            grace_period_ms: 100,
        },
    };

    let controller = ContactController::from_config(&config).await.unwrap();
    let mut rx = controller.subscribe();
    assert_eq!(controller.view_state().sort_order, SortOrder::PhoneNumber);

    for (first, last, phone) in [("Ana", "Pop", "0799"), ("Radu", "Albu", "0711")] {
        controller.on_event(ContactEvent::ShowDialog);
        controller.on_event(ContactEvent::SetFirstName(first.to_string()));
        controller.on_event(ContactEvent::SetLastName(last.to_string()));
        controller.on_event(ContactEvent::SetPhoneNumber(phone.to_string()));
        controller.on_event(ContactEvent::SaveContact);
    }

    let view = timeout(Duration::from_secs(2), rx.wait_for(|v| v.contacts.len() == 2))
        .await
        .expect("timed out waiting for contacts")
        .unwrap()
        .clone();
    let phones: Vec<&str> = view.contacts.iter().map(|c| c.phone_number.as_str()).collect();
    assert_eq!(phones, vec!["0711", "0799"]);
    assert!(view.contacts.iter().all(|c| c.id.is_some()));
    assert!(db_path.exists());
}
