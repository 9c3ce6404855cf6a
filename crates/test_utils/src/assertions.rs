//! Custom Test Assertions
//!
//! Provides assertion helpers for scores and explanations that give more
//! meaningful error messages than standard assertions.

use core_kernel::ClaimId;
use domain_fraud::{AttributionSet, EncodedFeatureVector, FeatureSchema, FraudAssessment};

/// Asserts that two floats are equal within an absolute tolerance
pub fn assert_f64_approx_eq(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Values differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that an assessment is internally consistent
///
/// # Panics
///
/// Panics if the probability is outside [0, 1], or the label disagrees with
/// the threshold
pub fn assert_assessment_consistent(assessment: &FraudAssessment) {
    assert!(
        (0.0..=1.0).contains(&assessment.probability),
        "Probability out of range: {}",
        assessment.probability
    );
    let expected = u8::from(assessment.probability >= assessment.threshold);
    assert_eq!(
        assessment.label, expected,
        "Label {} disagrees with probability {} at threshold {}",
        assessment.label, assessment.probability, assessment.threshold
    );
}

/// Asserts that baseline plus attributions reconstructs the raw output
pub fn assert_attributions_additive(set: &AttributionSet) {
    assert!(
        set.is_additive(),
        "baseline {} + attributions = {}, raw output {}",
        set.baseline(),
        set.reconstructed_output(),
        set.raw_output()
    );
}

/// Asserts that a vector carries exactly the schema's columns in order
pub fn assert_vector_matches_schema(vector: &EncodedFeatureVector, schema: &FeatureSchema) {
    assert_eq!(
        vector.columns(),
        schema.columns(),
        "Vector columns do not match the feature schema"
    );
    assert!(
        vector.values().iter().all(|v| v.is_finite()),
        "Vector has non-finite values: {:?}",
        vector.values()
    );
}

/// Asserts that search results are strictly ascending
pub fn assert_ids_sorted(ids: &[ClaimId]) {
    for pair in ids.windows(2) {
        assert!(
            pair[0].as_str() < pair[1].as_str(),
            "Claim ids out of order: {} before {}",
            pair[0],
            pair[1]
        );
    }
}
