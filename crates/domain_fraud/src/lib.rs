//! Fraud Domain
//!
//! Turns a claim record into the model's input vector, scores it against a
//! pretrained classifier and explains the score feature by feature.
//!
//! # Pipeline
//!
//! ```text
//! ClaimRecord -> expand -> reconcile(schema) -> EncodedFeatureVector
//!                                                 |-> FraudScorer  -> FraudAssessment
//!                                                 `-> Explainer    -> AttributionSet
//! ```
//!
//! Artifacts (schema and model) are loaded once at startup and shared
//! read-only. Encoding, scoring and explanation are pure functions of their
//! inputs.

pub mod schema;
pub mod vector;
pub mod encoder;
pub mod model;
pub mod scorer;
pub mod explain;
pub mod error;

pub use schema::FeatureSchema;
pub use vector::EncodedFeatureVector;
pub use encoder::{reconcile, FeatureEncoder};
pub use model::FraudModel;
pub use scorer::{FraudAssessment, FraudScorer, ThresholdConfig, DEFAULT_FRAUD_THRESHOLD};
pub use explain::{AttributionSet, Explainer, FeatureAttribution, DEFAULT_TOP_FEATURES};
pub use error::FraudError;
