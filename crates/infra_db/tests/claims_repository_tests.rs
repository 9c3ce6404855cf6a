//! Integration tests for the PostgreSQL claims adapter
//!
//! Each test starts its own PostgreSQL container.

use core_kernel::{AdapterHealth, ClaimId, HealthCheckable, RetryPolicy};
use domain_claims::{ClaimRepository, ClaimSearch, LiabilitySplit};
use infra_db::repositories::ClaimsRepository;
use infra_db::{DatabaseError, PostgresClaimAdapter};
use rust_decimal_macros::dec;
use test_utils::{
    assert_ids_sorted, create_isolated_test_database, fact_of_loss_text, ClaimFixtures,
    ClaimRecordBuilder, IdFixtures, TestDatabase,
};

async fn seeded_database() -> TestDatabase {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    db.insert_claims(&ClaimFixtures::all())
        .await
        .expect("Failed to seed claims");
    db
}

fn adapter(db: &TestDatabase) -> PostgresClaimAdapter {
    PostgresClaimAdapter::new(db.pool().clone()).with_retry(RetryPolicy::no_retry())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_fetch_round_trips_every_column() {
    let db = seeded_database().await;
    let fetched = adapter(&db)
        .fetch_by_id(&IdFixtures::high_risk())
        .await
        .unwrap();

    assert_eq!(fetched, ClaimFixtures::high_risk());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_fetch_unknown_id_is_not_found() {
    let db = seeded_database().await;
    let err = adapter(&db)
        .fetch_by_id(&IdFixtures::unknown())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_nullable_columns_are_preserved() {
    let db = seeded_database().await;
    let sparse = ClaimRecordBuilder::new()
        .with_id("SPARSE001")
        .with_state(None)
        .with_reported_by(None)
        .with_fact_of_loss(fact_of_loss_text())
        .build();
    db.insert_claims(std::slice::from_ref(&sparse)).await.unwrap();

    let fetched = adapter(&db).fetch_by_id(&sparse.claim_id).await.unwrap();
    assert!(fetched.state.is_none());
    assert!(fetched.reported_by.is_none());
    assert_eq!(fetched.fact_of_loss, sparse.fact_of_loss);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_liability_is_persisted() {
    let db = seeded_database().await;
    let adapter = adapter(&db);
    let id = IdFixtures::low_risk();

    adapter
        .update_liability(&id, LiabilitySplit::new(60, 40).unwrap())
        .await
        .unwrap();
    adapter
        .update_liability(&id, LiabilitySplit::new(20, 80).unwrap())
        .await
        .unwrap();

    let fetched = adapter.fetch_by_id(&id).await.unwrap();
    assert_eq!(fetched.insured_liability, 20);
    assert_eq!(fetched.claimant_liability, 80);
    assert_eq!(fetched.claim_amount, dec!(8200.00));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_unknown_id_is_not_found() {
    let db = seeded_database().await;
    let err = adapter(&db)
        .update_liability(&IdFixtures::unknown(), LiabilitySplit::new(50, 50).unwrap())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_out_of_range_liability_violates_constraint() {
    let db = seeded_database().await;
    let repository = ClaimsRepository::new(db.pool().clone());

    let err = repository
        .update_liability(IdFixtures::low_risk().as_str(), 150, -50)
        .await
        .unwrap_err();

    assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_is_case_insensitive_sorted_and_limited() {
    let db = seeded_database().await;
    let extra: Vec<_> = ["AXA001", "axb002", "QXA003", "NOMATCH1"]
        .iter()
        .map(|id| ClaimRecordBuilder::new().with_id(id).build())
        .collect();
    db.insert_claims(&extra).await.unwrap();
    let adapter = adapter(&db);

    let ids = adapter
        .search_ids(&ClaimSearch::new("xa", 10))
        .await
        .unwrap();
    let raw: Vec<&str> = ids.iter().map(ClaimId::as_str).collect();
    assert_eq!(raw, vec!["AXA001", "BQXA77K2M", "QXA003", "XAJI0Y6DP"]);
    assert_ids_sorted(&ids);

    let limited = adapter
        .search_ids(&ClaimSearch::new("xa", 2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_treats_wildcards_literally() {
    let db = seeded_database().await;
    let ids = adapter(&db)
        .search_ids(&ClaimSearch::new("%_", 10))
        .await
        .unwrap();

    assert!(ids.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check_reports_healthy() {
    let db = seeded_database().await;
    let health = adapter(&db).health_check().await;

    assert_eq!(health.status, AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_fetch_decodes_table_typed_by_dataframe_ingestion() {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let pool = db.pool();

    sqlx::query("DROP TABLE claims").execute(pool).await.unwrap();
    sqlx::query(
        r#"
        CREATE TABLE claims (
            claim_id TEXT,
            policy_start TEXT,
            incident_date TEXT,
            state TEXT,
            vehicle_type TEXT,
            incident_type TEXT,
            reported_by TEXT,
            insured_age BIGINT,
            prior_claims_count BIGINT,
            claim_amount DOUBLE PRECISION,
            policy_limit DOUBLE PRECISION,
            severity_score DOUBLE PRECISION,
            fact_of_loss TEXT,
            fraud_flag BIGINT,
            insured_liability BIGINT,
            claimant_liability BIGINT
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO claims VALUES (
            'XAJI0Y6DP', '2019-04-01', '2024-03-15', 'CA', 'Sedan', 'Collision', 'Insured',
            42, 1, 8200.0, 50000.0, 0.35, 'Rear-ended while stopped at a red light', 0, 50, 50
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    let adapter = adapter(&db);
    let fetched = adapter.fetch_by_id(&IdFixtures::low_risk()).await.unwrap();
    assert_eq!(fetched, ClaimFixtures::low_risk());

    adapter
        .update_liability(&IdFixtures::low_risk(), LiabilitySplit::new(70, 30).unwrap())
        .await
        .unwrap();
    let updated = adapter.fetch_by_id(&IdFixtures::low_risk()).await.unwrap();
    assert_eq!(updated.insured_liability, 70);
    assert_eq!(updated.claimant_liability, 30);
}
