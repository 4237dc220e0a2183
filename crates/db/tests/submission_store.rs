//! Integration tests for the Postgres-backed submission store.
//!
//! These need a live database (`DATABASE_URL`) and are ignored by default:
//! `cargo test -p agency-db -- --ignored`.

use agency_core::search::ListFilter;
use agency_core::submission::{GeoLocation, Location, NewSubmission, SubmissionStatus};
use agency_db::{PgSubmissionStore, SubmissionStore};
use sqlx::PgPool;

fn new_submission(name: &str, location: Location) -> NewSubmission {
    NewSubmission {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        subject: "Rebrand".to_string(),
        message: "Looking for a quote on a full rebrand".to_string(),
        ip_address: "49.205.100.10".to_string(),
        location,
    }
}

fn hyderabad() -> Location {
    Location::Resolved(GeoLocation {
        city: "Hyderabad".to_string(),
        region: "Telangana".to_string(),
        country: "India".to_string(),
        lat: 17.385,
        lng: 78.4867,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_read_back(pool: PgPool) {
    let store = PgSubmissionStore::new(pool);
    let created = store
        .create(&new_submission("Anita", hyderabad()))
        .await
        .unwrap();

    assert_eq!(created.status, SubmissionStatus::New);
    assert_eq!(created.location, hyderabad());
    assert!(created.notes.is_empty());

    let found = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_sentinel_locations_persist(pool: PgPool) {
    let store = PgSubmissionStore::new(pool);
    let local = store
        .create(&new_submission("Local", Location::local()))
        .await
        .unwrap();
    let unknown = store
        .create(&new_submission("Unknown", Location::unknown()))
        .await
        .unwrap();

    assert_eq!(local.location, Location::local());
    assert_eq!(unknown.location, Location::unknown());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_search_and_status_filter(pool: PgPool) {
    let store = PgSubmissionStore::new(pool);
    let a = store
        .create(&new_submission("Alpha", Location::local()))
        .await
        .unwrap();
    store
        .create(&new_submission("Beta", Location::local()))
        .await
        .unwrap();
    store
        .update_status(a.id, SubmissionStatus::Quoted)
        .await
        .unwrap();

    let filter = ListFilter::from_params(Some("alpha"), None).unwrap();
    let items = store.list(&filter, 10, 0).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, a.id);

    let filter = ListFilter::from_params(None, Some("new")).unwrap();
    assert_eq!(store.count(&filter).await.unwrap(), 1);

    // Wildcards in the query are literal.
    let filter = ListFilter::from_params(Some("%"), None).unwrap();
    assert_eq!(store.count(&filter).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_bulk_delete_reports_actual_count(pool: PgPool) {
    let store = PgSubmissionStore::new(pool);
    let mut ids = Vec::new();
    for name in ["One", "Two", "Three"] {
        ids.push(
            store
                .create(&new_submission(name, Location::local()))
                .await
                .unwrap()
                .id,
        );
    }

    assert!(store.delete(ids[0]).await.unwrap());
    assert_eq!(store.delete_many(&ids).await.unwrap(), 2);
    assert_eq!(store.delete_many(&ids).await.unwrap(), 0);
    assert!(store.find_many(&ids).await.unwrap().is_empty());
}
