use super::{MessageStore, PostgresStore, UserStore};
use crate::{
    error::ServiceError,
    types::{MessageStatus, NewMessage, UserId},
};
use blockscout_service_launcher::test_database::database;
use migration::Migrator;
use pretty_assertions::assert_eq;

fn message(content: &str) -> NewMessage {
    NewMessage {
        content: content.to_string(),
        receiver: "09123456789".to_string(),
        cost: 100,
    }
}

async fn seed_messages(store: &PostgresStore, user_id: UserId, contents: &[&str]) {
    // One batch per message so rows get distinct creation timestamps.
    for content in contents {
        store
            .create_scheduled(user_id, &[message(content)])
            .await
            .unwrap();
    }
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn create_user_trims_the_name() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());

    let user = store.create("  Ashkan  ").await.unwrap();
    assert_eq!(user.name, "Ashkan");
    assert_eq!(user.balance, 0);

    let found = store.get(user.id).await.unwrap();
    assert_eq!(found, user);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn create_user_rejects_a_blank_name() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());

    let result = store.create("   ").await;
    assert!(matches!(result, Err(ServiceError::EmptyName)));
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn get_user_reports_missing_rows() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());

    let result = store.get(404).await;
    assert!(matches!(result, Err(ServiceError::UserNotFound)));
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn update_balance_applies_the_delta_atomically() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();

    assert_eq!(store.update_balance(user.id, 500).await.unwrap(), 500);
    assert_eq!(store.update_balance(user.id, -200).await.unwrap(), 300);
    assert_eq!(store.get(user.id).await.unwrap().balance, 300);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn update_balance_refuses_a_negative_result() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    store.update_balance(user.id, 100).await.unwrap();

    let result = store.update_balance(user.id, -101).await;
    assert!(matches!(result, Err(ServiceError::InsufficientBalance)));
    assert_eq!(store.get(user.id).await.unwrap().balance, 100);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn update_balance_reports_unknown_users() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());

    let result = store.update_balance(404, 100).await;
    assert!(matches!(result, Err(ServiceError::UserNotFound)));
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn create_scheduled_rejects_the_whole_batch_on_empty_content() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();

    let batch = [message("one"), message(""), message("three")];
    let result = store.create_scheduled(user.id, &batch).await;
    assert!(matches!(result, Err(ServiceError::EmptyContent)));

    let rows = store.list_by_user(user.id, 0, 10, false).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn create_scheduled_rejects_the_whole_batch_on_empty_receiver() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();

    let batch = [
        message("one"),
        NewMessage {
            content: "two".to_string(),
            receiver: String::new(),
            cost: 100,
        },
    ];
    let result = store.create_scheduled(user.id, &batch).await;
    assert!(matches!(result, Err(ServiceError::EmptyReceiver)));

    let rows = store.list_by_user(user.id, 0, 10, false).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn list_by_user_paginates_in_both_directions() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    seed_messages(&store, user.id, &["one", "two", "three", "four"]).await;

    let ascending = store.list_by_user(user.id, 1, 2, false).await.unwrap();
    let contents = ascending
        .iter()
        .map(|row| row.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(contents, vec!["two", "three"]);

    let descending = store.list_by_user(user.id, 0, 2, true).await.unwrap();
    let contents = descending
        .iter()
        .map(|row| row.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(contents, vec!["four", "three"]);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn claim_earliest_claims_the_oldest_scheduled_rows() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    seed_messages(&store, user.id, &["one", "two", "three"]).await;

    let claimed = store.claim_earliest(2).await.unwrap();
    let contents = claimed
        .iter()
        .map(|row| row.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(contents, vec!["one", "two"]);
    assert!(claimed
        .iter()
        .all(|row| row.status == MessageStatus::Enqueued));

    let rest = store.claim_earliest(10).await.unwrap();
    let contents = rest
        .iter()
        .map(|row| row.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(contents, vec!["three"]);

    assert!(store.claim_earliest(10).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn concurrent_claims_return_disjoint_sets() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    let batch = (0..10).map(|i| message(&format!("m{i}"))).collect::<Vec<_>>();
    store.create_scheduled(user.id, &batch).await.unwrap();

    let left_store = store.clone();
    let right_store = store.clone();
    let (left, right) = tokio::join!(
        left_store.claim_earliest(10),
        right_store.claim_earliest(10)
    );
    let left = left.unwrap();
    let right = right.unwrap();

    let mut all_ids = left
        .iter()
        .chain(right.iter())
        .map(|row| row.id)
        .collect::<Vec<_>>();
    all_ids.sort();
    all_ids.dedup();
    assert_eq!(all_ids.len(), 10, "no row may be claimed twice");
    assert_eq!(left.len() + right.len(), 10);
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn finalization_requires_an_enqueued_row() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    seed_messages(&store, user.id, &["one"]).await;
    let scheduled_id = store.list_by_user(user.id, 0, 1, false).await.unwrap()[0].id;

    // Still scheduled: not finalizable.
    let result = store.mark_sent(scheduled_id).await;
    assert!(matches!(result, Err(ServiceError::MessageNotFound)));

    let claimed = store.claim_earliest(1).await.unwrap();
    let sent = store.mark_sent(claimed[0].id).await.unwrap();
    assert_eq!(sent.status, MessageStatus::Sent);

    // Terminal: a second finalization reports the row missing.
    let result = store.mark_sent(claimed[0].id).await;
    assert!(matches!(result, Err(ServiceError::MessageNotFound)));
    let result = store.mark_failed(claimed[0].id).await;
    assert!(matches!(result, Err(ServiceError::MessageNotFound)));
}

#[tokio::test]
#[ignore = "Needs database to run"]
async fn reschedule_returns_claimed_rows_to_the_scheduled_pool() {
    let db = database!(Migrator);
    let store = PostgresStore::new(db.client());
    let user = store.create("Ashkan").await.unwrap();
    seed_messages(&store, user.id, &["one", "two"]).await;

    let claimed = store.claim_earliest(2).await.unwrap();
    let ids = claimed.iter().map(|row| row.id).collect::<Vec<_>>();
    store.reschedule(&ids).await.unwrap();

    let rows = store.list_by_user(user.id, 0, 10, false).await.unwrap();
    assert!(rows.iter().all(|row| row.status == MessageStatus::Scheduled));

    // Rescheduled rows are claimable again.
    let reclaimed = store.claim_earliest(10).await.unwrap();
    assert_eq!(reclaimed.len(), 2);
}
