//! Pipeline and session scenarios over in-memory collaborators

use crate::common::{
    EchoModel, FakeSource, MemoryStore, product, sample_products, test_connection_config,
};
use brandscout::config::Settings;
use brandscout::error::{CycleError, FetchError, SessionError};
use brandscout::pipeline::Pipeline;
use brandscout::session::Session;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio_test::{assert_err, assert_ok};

fn pipeline(source: Arc<FakeSource>, store: Arc<MemoryStore>) -> Pipeline {
    Pipeline::new(source, store, Arc::new(EchoModel), &Settings::default())
}

#[tokio::test]
async fn test_cycle_ranks_stores_and_verifies() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        Arc::new(FakeSource::returning(sample_products())),
        store.clone(),
    );
    let config = test_connection_config();

    let report = pipeline
        .run_cycle(&config, "washing machine")
        .await
        .unwrap();

    let ratings: Vec<f64> = report.products.iter().map(|p| p.rating).collect();
    assert_eq!(ratings, vec![5.0, 4.8, 4.8, 4.0, 3.0]);
    // Ties keep input order
    assert_eq!(report.products[1].name, "Product 1");
    assert_eq!(report.products[2].name, "Product 2");

    assert_eq!(store.rows().len(), 5);
    assert_eq!(
        report.search_url,
        "https://www.amazon.in/s?k=washing%20machine"
    );

    let schema = report.schema.as_ref().unwrap();
    assert!(schema.contains("CREATE TABLE \"TopBrands\""));
    assert!(schema.contains("Product 4"));

    let checks = &report.verification;
    assert!(checks.fields.ratings_pass());
    assert!(checks.fields.prices_pass());
    let storage = checks.storage.as_ref().unwrap();
    assert!(storage.count_matches());
    assert!(storage.top_matches());
}

#[tokio::test]
async fn test_store_failure_skips_schema_refresh() {
    let store = Arc::new(MemoryStore::failing_replace());
    let pipeline = pipeline(
        Arc::new(FakeSource::returning(sample_products())),
        store.clone(),
    );

    let err = assert_err!(pipeline.run_cycle(&test_connection_config(), "tv").await);

    assert!(matches!(err, CycleError::StoreFailed(_)));
    assert_eq!(err.to_string(), "Failed to store data in database");
    assert_eq!(store.table_info_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_failure_reports_no_brands() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        Arc::new(FakeSource::failing(FetchError::Status(503))),
        store.clone(),
    );

    let err = pipeline
        .run_cycle(&test_connection_config(), "tv")
        .await
        .unwrap_err();

    assert!(matches!(err, CycleError::NoProducts(Some(_))));
    assert_eq!(
        err.to_string(),
        "No brands found or an error occurred during the fetch."
    );
    assert_eq!(store.replace_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_fetch_leaves_store_untouched() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(Arc::new(FakeSource::returning(vec![])), store.clone());

    let err = pipeline
        .run_cycle(&test_connection_config(), "")
        .await
        .unwrap_err();
    assert!(matches!(err, CycleError::NoProducts(None)));
    assert_eq!(store.replace_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_read_back_failure_is_displayed_not_fatal() {
    let pipeline = pipeline(
        Arc::new(FakeSource::returning(vec![product("Solo", 4.2)])),
        Arc::new(MemoryStore::failing_read_back()),
    );

    let report = assert_ok!(pipeline.run_cycle(&test_connection_config(), "kettle").await);
    let message = report.verification.storage.unwrap_err();
    assert!(message.starts_with("Database verification failed:"));
}

#[tokio::test]
async fn test_session_flow_prime_cycle_question() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        Arc::new(FakeSource::returning(sample_products())),
        store.clone(),
    );
    let mut session = Session::new();

    let generation = session.connect(test_connection_config()).unwrap();
    let primed = pipeline
        .prime_schema(session.connection().unwrap())
        .await
        .unwrap();
    assert!(session.apply_schema(primed, generation));
    assert_eq!(session.begin_question(), Err(SessionError::NoData));

    let config = session.begin_cycle().unwrap();
    let outcome = pipeline.run_cycle(&config, "washing machine").await;
    session.finish_cycle(&outcome);

    let schema = session.begin_question().unwrap();
    assert!(schema.contains("Product 4"), "schema reflects the store");

    let answer = pipeline
        .answer("Which product is best?", &schema)
        .await
        .unwrap();
    assert_eq!(answer, "You asked: Which product is best?");
    session.finish_question();
}

#[tokio::test]
async fn test_second_cycle_replaces_previous_rows() {
    let store = Arc::new(MemoryStore::new());
    let config = test_connection_config();

    let first = pipeline(
        Arc::new(FakeSource::returning(sample_products())),
        store.clone(),
    );
    first.run_cycle(&config, "a").await.unwrap();

    let second = pipeline(
        Arc::new(FakeSource::returning(vec![product("Only one", 3.3)])),
        store.clone(),
    );
    let report = second.run_cycle(&config, "b").await.unwrap();

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Only one");
    assert!(report.verification.storage.unwrap().count_matches());
}
