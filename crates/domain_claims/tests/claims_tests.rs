//! Comprehensive tests for domain_claims

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::ClaimId;
use domain_claims::ports::mock::InMemoryClaimRepository;
use domain_claims::{
    ClaimError, ClaimRecord, ClaimRepository, ClaimReviewService, ClaimSearch, LiabilitySplit,
};

fn claim(id: &str) -> ClaimRecord {
    ClaimRecord {
        claim_id: ClaimId::parse(id).unwrap(),
        policy_start: "2022-01-15".to_string(),
        incident_date: "2024-03-15".to_string(),
        state: Some("CA".to_string()),
        vehicle_type: Some("Sedan".to_string()),
        incident_type: Some("Collision".to_string()),
        reported_by: Some("Insured".to_string()),
        insured_age: 42,
        prior_claims_count: 1,
        claim_amount: dec!(12500.00),
        policy_limit: dec!(50000.00),
        severity_score: 0.64,
        fact_of_loss: Some("Rear-ended at a stop light".to_string()),
        fraud_flag: Some(0),
        insured_liability: 50,
        claimant_liability: 50,
    }
}

fn service_with(claims: Vec<ClaimRecord>) -> (ClaimReviewService, Arc<InMemoryClaimRepository>) {
    let repo = Arc::new(InMemoryClaimRepository::with_claims(claims));
    let service = ClaimReviewService::new(repo.clone());
    (service, repo)
}

// ============================================================================
// Claim Record Tests
// ============================================================================

mod claim_record_tests {
    use super::*;

    #[test]
    fn test_incident_date_parses() {
        let record = claim("XAJI0Y6DP");
        assert_eq!(
            record.incident_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            record.policy_start_date().unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_malformed_incident_date_is_reported() {
        let mut record = claim("XAJI0Y6DP");
        record.incident_date = "not a date".to_string();
        assert!(matches!(
            record.incident_date(),
            Err(ClaimError::InvalidDate { field: "incident_date", .. })
        ));
    }

    #[test]
    fn test_stored_liability_that_does_not_sum_is_none() {
        let mut record = claim("XAJI0Y6DP");
        record.insured_liability = 70;
        record.claimant_liability = 20;
        assert!(record.liability().is_none());
    }

    #[test]
    fn test_apply_liability() {
        let mut record = claim("XAJI0Y6DP");
        record.apply_liability(LiabilitySplit::new(0, 100).unwrap());
        assert_eq!(record.insured_liability, 0);
        assert_eq!(record.claimant_liability, 100);
    }

    #[test]
    fn test_exceeds_policy_limit() {
        let mut record = claim("XAJI0Y6DP");
        assert!(!record.exceeds_policy_limit());
        record.claim_amount = dec!(50000.01);
        assert!(record.exceeds_policy_limit());
    }
}

// ============================================================================
// Liability Save Tests
// ============================================================================

mod liability_tests {
    use super::*;

    #[tokio::test]
    async fn test_split_over_100_is_rejected_without_persisting() {
        let (service, repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let id = ClaimId::parse("XAJI0Y6DP").unwrap();

        let err = service.save_liability(&id, 60, 45).await.unwrap_err();

        assert!(matches!(err, ClaimError::InvalidLiabilitySplit { total: 105, .. }));
        assert!(err.is_validation());
        assert_eq!(repo.update_count(), 0);

        let stored = repo.fetch_by_id(&id).await.unwrap();
        assert_eq!(stored.insured_liability, 50);
        assert_eq!(stored.claimant_liability, 50);
    }

    #[tokio::test]
    async fn test_valid_split_is_persisted() {
        let (service, repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let id = ClaimId::parse("XAJI0Y6DP").unwrap();

        let split = service.save_liability(&id, 60, 40).await.unwrap();

        assert_eq!(split, LiabilitySplit::new(60, 40).unwrap());
        assert_eq!(repo.update_count(), 1);

        let stored = repo.fetch_by_id(&id).await.unwrap();
        assert_eq!(stored.insured_liability, 60);
        assert_eq!(stored.claimant_liability, 40);
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_rejected() {
        let (service, repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let id = ClaimId::parse("XAJI0Y6DP").unwrap();

        let err = service.save_liability(&id, 101, -1).await.unwrap_err();
        assert!(matches!(err, ClaimError::LiabilityOutOfRange { .. }));
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn test_save_on_unknown_claim_is_not_found() {
        let (service, _repo) = service_with(vec![]);
        let id = ClaimId::parse("ZZZZ000000").unwrap();

        let err = service.save_liability(&id, 100, 0).await.unwrap_err();
        assert!(matches!(err, ClaimError::ClaimNotFound(ref missing) if missing == "ZZZZ000000"));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (service, repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let id = ClaimId::parse("XAJI0Y6DP").unwrap();

        service.save_liability(&id, 10, 90).await.unwrap();
        service.save_liability(&id, 80, 20).await.unwrap();

        let stored = repo.fetch_by_id(&id).await.unwrap();
        assert_eq!((stored.insured_liability, stored.claimant_liability), (80, 20));
    }
}

// ============================================================================
// Lookup and Search Tests
// ============================================================================

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_existing_claim() {
        let (service, _repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let record = service.lookup(&ClaimId::parse("XAJI0Y6DP").unwrap()).await.unwrap();
        assert_eq!(record.state.as_deref(), Some("CA"));
    }

    #[tokio::test]
    async fn test_lookup_missing_claim_is_not_found() {
        let (service, _repo) = service_with(vec![claim("XAJI0Y6DP")]);
        let err = service
            .lookup(&ClaimId::parse("ZZZZ000000").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::ClaimNotFound(_)));
        assert!(!err.is_validation());
    }
}

mod search_tests {
    use super::*;

    fn many_claims() -> Vec<ClaimRecord> {
        let mut claims: Vec<ClaimRecord> = (0..25)
            .map(|n| claim(&format!("XA{:03}Q", 24 - n)))
            .collect();
        claims.push(claim("BQXA77"));
        claims.push(claim("ZZ0001"));
        claims
    }

    #[tokio::test]
    async fn test_two_character_fragment_returns_at_most_ten_sorted() {
        let (service, _repo) = service_with(many_claims());

        let ids = service.search("xa", None).await.unwrap();

        assert_eq!(ids.len(), 10);
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids[0].as_str(), "BQXA77");
        assert_eq!(ids[1].as_str(), "XA000Q");
    }

    #[tokio::test]
    async fn test_single_character_fragment_returns_nothing() {
        let (service, _repo) = service_with(many_claims());
        assert!(service.search("X", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_limit() {
        let (service, _repo) = service_with(many_claims());
        let ids = service.search("XA0", Some(3)).await.unwrap();
        let raw: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(raw, vec!["XA000Q", "XA001Q", "XA002Q"]);
    }

    #[tokio::test]
    async fn test_service_level_default_limit() {
        let repo = Arc::new(InMemoryClaimRepository::with_claims(many_claims()));
        let service = ClaimReviewService::new(repo).with_search_limit(4);
        assert_eq!(service.search("XA", None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_repository_search_respects_limit_directly() {
        let repo = InMemoryClaimRepository::with_claims(many_claims());
        let ids = repo.search_ids(&ClaimSearch::new("Q", 50)).await.unwrap();
        assert_eq!(ids.len(), 26);
    }
}
