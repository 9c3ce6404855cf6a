//! Encoded feature vector

use std::sync::Arc;

use crate::error::FraudError;
use crate::schema::FeatureSchema;

/// One model-ready row: the schema's columns and one value per column
///
/// The column list is shared with the schema it was encoded against.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl EncodedFeatureVector {
    /// Pairs a column list with values
    ///
    /// # Errors
    ///
    /// `FraudError::ShapeMismatch` when the lengths differ
    pub fn new(columns: Arc<[String]>, values: Vec<f64>) -> Result<Self, FraudError> {
        if columns.len() != values.len() {
            return Err(FraudError::ShapeMismatch(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Builds a vector whose values were produced in schema order
    pub(crate) fn from_schema(schema: &FeatureSchema, values: Vec<f64>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self {
            columns: schema.shared_columns(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Iterates `(column, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
