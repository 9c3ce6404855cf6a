//! Feature schema
//!
//! The ordered list of input columns the fraud model was trained on. It is
//! persisted next to the model as a JSON array of column names and loaded once
//! at startup.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::FraudError;

/// Ordered, duplicate-free, non-empty list of model input columns
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Arc<[String]>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Builds a schema from column names
    ///
    /// # Errors
    ///
    /// `FraudError::SchemaUnavailable` when the list is empty, contains a
    /// blank name or repeats a name.
    pub fn from_columns(columns: Vec<String>) -> Result<Self, FraudError> {
        if columns.is_empty() {
            return Err(FraudError::SchemaUnavailable(
                "schema has no columns".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.trim().is_empty() {
                return Err(FraudError::SchemaUnavailable(
                    "schema contains a blank column name".to_string(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(FraudError::SchemaUnavailable(format!(
                    "duplicate column '{}'",
                    column
                )));
            }
        }

        let positions = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Ok(Self {
            columns: columns.into(),
            positions,
        })
    }

    /// Parses a schema from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self, FraudError> {
        let columns: Vec<String> = serde_json::from_str(json)
            .map_err(|e| FraudError::SchemaUnavailable(format!("invalid schema JSON: {}", e)))?;
        Self::from_columns(columns)
    }

    /// Loads a schema artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FraudError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FraudError::SchemaUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let schema = Self::from_json_str(&json)?;
        info!(path = %path.display(), columns = schema.len(), "Feature schema loaded");
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column list shared with every vector encoded against this schema
    pub fn shared_columns(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}
