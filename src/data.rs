//! Column-oriented observation table consumed by the comparator.
//!
//! Loading data from disk is left to the caller; this type only holds what has
//! already been read.

use crate::error::MetroplotError;
use ndarray::{Array1, ArrayView1};
use std::collections::HashMap;

/// An immutable table of categorical (factor) and numeric columns.
///
/// All columns share the row count of the first column added.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    n_rows: Option<usize>,
    factors: HashMap<String, Vec<String>>,
    numerics: HashMap<String, Array1<f64>>,
}

impl Observations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a categorical column.
    pub fn with_factor<I, S>(mut self, name: &str, values: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.check_new_column(name, values.len())?;
        self.factors.insert(name.to_string(), values);
        Ok(self)
    }

    /// Add a numeric column.
    pub fn with_numeric<I>(mut self, name: &str, values: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Array1<f64> = values.into_iter().collect();
        self.check_new_column(name, values.len())?;
        self.numerics.insert(name.to_string(), values);
        Ok(self)
    }

    fn check_new_column(&mut self, name: &str, len: usize) -> Result<(), MetroplotError> {
        if self.factors.contains_key(name) || self.numerics.contains_key(name) {
            return Err(MetroplotError::DuplicateColumn(name.to_string()));
        }
        match self.n_rows {
            Some(expected) if expected != len => Err(MetroplotError::ColumnLength {
                name: name.to_string(),
                expected,
                actual: len,
            }),
            Some(_) => Ok(()),
            None => {
                self.n_rows = Some(len);
                Ok(())
            }
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn factor(&self, name: &str) -> anyhow::Result<&[String]> {
        self.factors
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MetroplotError::UnknownColumn(name.to_string()).into())
    }

    pub fn numeric(&self, name: &str) -> anyhow::Result<ArrayView1<'_, f64>> {
        self.numerics
            .get(name)
            .map(|column| column.view())
            .ok_or_else(|| MetroplotError::UnknownColumn(name.to_string()).into())
    }

    /// Distinct values of a factor column, in order of first appearance.
    pub fn levels(&self, factor: &str) -> anyhow::Result<Vec<String>> {
        Ok(crate::testing::utils::unique_in_order(self.factor(factor)?))
    }
}
